//! Coastline geometry
//!
//! A coarse outline of the continents and larger islands ships with the crate
//! so a plot always has geographic context. For publication-quality maps a
//! GeoJSON file (for example Natural Earth's `ne_110m_coastline`) can be
//! loaded instead.

use crate::errors::{ClimError, Result};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Polylines of (lon, lat) vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Coastlines {
    lines: Vec<Vec<(f64, f64)>>,
}

impl Default for Coastlines {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Coastlines {
    pub fn new(lines: Vec<Vec<(f64, f64)>>) -> Self {
        Self { lines }
    }

    /// The bundled low-resolution outline
    pub fn builtin() -> Self {
        Self {
            lines: BUILTIN
                .iter()
                .map(|outline| {
                    outline
                        .iter()
                        .map(|&(lon, lat)| (f64::from(lon), f64::from(lat)))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn lines(&self) -> &[Vec<(f64, f64)>] {
        &self.lines
    }

    /// Load line work from a GeoJSON file
    pub fn from_geojson_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let coastlines = Self::from_geojson_str(&text)?;
        info!(
            path = %path.display(),
            lines = coastlines.lines.len(),
            "Loaded coastlines"
        );
        Ok(coastlines)
    }

    /// Parse a GeoJSON FeatureCollection, Feature, or bare geometry.
    ///
    /// LineString and MultiLineString geometries are used as-is; polygon rings
    /// become closed lines. Points are ignored.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        let mut lines = Vec::new();
        collect_object(&root, &mut lines)?;
        Ok(Self { lines })
    }
}

fn collect_object(value: &Value, lines: &mut Vec<Vec<(f64, f64)>>) -> Result<()> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ClimError::InvalidGeometry("FeatureCollection without features".to_string())
                })?;
            for feature in features {
                collect_object(feature, lines)?;
            }
            Ok(())
        }
        Some("Feature") => match value.get("geometry") {
            Some(Value::Null) | None => Ok(()),
            Some(geometry) => collect_object(geometry, lines),
        },
        Some("GeometryCollection") => {
            for geometry in value
                .get("geometries")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                collect_object(geometry, lines)?;
            }
            Ok(())
        }
        Some(kind) => {
            let coords = value
                .get("coordinates")
                .ok_or_else(|| ClimError::InvalidGeometry(format!("{kind} without coordinates")))?;
            match kind {
                "LineString" => lines.push(positions(coords)?),
                "MultiLineString" | "Polygon" => {
                    for ring in array(coords)? {
                        lines.push(positions(ring)?);
                    }
                }
                "MultiPolygon" => {
                    for polygon in array(coords)? {
                        for ring in array(polygon)? {
                            lines.push(positions(ring)?);
                        }
                    }
                }
                "Point" | "MultiPoint" => {}
                other => {
                    return Err(ClimError::InvalidGeometry(format!(
                        "unsupported geometry type '{other}'"
                    )))
                }
            }
            Ok(())
        }
        None => Err(ClimError::InvalidGeometry(
            "GeoJSON object without a type".to_string(),
        )),
    }
}

fn array(value: &Value) -> Result<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| ClimError::InvalidGeometry(format!("expected an array, got {value}")))
}

fn positions(value: &Value) -> Result<Vec<(f64, f64)>> {
    array(value)?
        .iter()
        .map(|position| {
            let pair = array(position)?;
            match (pair.first().and_then(Value::as_f64), pair.get(1).and_then(Value::as_f64)) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(ClimError::InvalidGeometry(format!(
                    "invalid position {position}"
                ))),
            }
        })
        .collect()
}

/// Coarse (lon, lat) outlines, roughly 2-5 degree resolution
const BUILTIN: &[&[(f32, f32)]] = &[
    // North America
    &[
        (-166.0, 68.0), (-156.0, 71.3), (-141.0, 69.6), (-128.0, 70.0), (-110.0, 68.0),
        (-95.0, 68.0), (-85.0, 69.0), (-80.0, 63.0), (-93.0, 59.0), (-92.0, 57.0),
        (-82.0, 55.0), (-79.0, 52.0), (-77.0, 60.0), (-70.0, 61.0), (-64.0, 60.0),
        (-56.0, 52.0), (-60.0, 47.0), (-66.0, 45.0), (-70.0, 42.0), (-74.0, 40.5),
        (-76.0, 35.0), (-81.0, 31.0), (-80.0, 25.0), (-82.0, 27.0), (-84.0, 30.0),
        (-89.0, 30.0), (-94.0, 29.5), (-97.0, 26.0), (-97.5, 22.0), (-95.0, 19.0),
        (-91.0, 19.0), (-87.0, 21.5), (-88.0, 16.0), (-83.0, 15.0), (-83.5, 11.0),
        (-79.5, 9.0), (-77.0, 8.5), (-80.0, 7.5), (-83.0, 8.5), (-86.0, 12.0),
        (-92.0, 14.5), (-96.0, 16.0), (-105.0, 19.5), (-106.0, 23.0), (-109.0, 23.0),
        (-110.0, 27.0), (-112.5, 31.5), (-114.5, 30.0), (-117.0, 32.5), (-120.5, 34.5),
        (-124.0, 40.0), (-124.0, 46.0), (-123.0, 49.0), (-130.0, 54.5), (-136.0, 58.0),
        (-146.0, 60.5), (-152.0, 59.0), (-156.0, 57.0), (-162.0, 55.0), (-158.0, 58.0),
        (-162.0, 60.0), (-166.0, 62.0), (-165.0, 64.5), (-166.0, 68.0),
    ],
    // South America
    &[
        (-77.0, 8.5), (-72.0, 12.0), (-63.0, 10.5), (-57.0, 6.0), (-51.0, 4.0),
        (-50.0, 0.0), (-44.0, -2.5), (-35.0, -5.0), (-35.0, -9.0), (-39.0, -14.0),
        (-39.0, -18.0), (-41.0, -22.0), (-48.0, -26.0), (-49.0, -29.0), (-53.0, -33.5),
        (-58.0, -34.5), (-57.0, -38.0), (-62.0, -39.0), (-65.0, -42.0), (-67.0, -46.0),
        (-69.0, -51.0), (-68.5, -54.0), (-72.0, -54.0), (-75.0, -50.0), (-74.0, -44.0),
        (-73.5, -37.0), (-71.5, -30.0), (-70.0, -18.5), (-76.0, -14.0), (-81.0, -6.0),
        (-80.0, -2.0), (-80.0, 1.0), (-77.5, 4.0), (-77.0, 8.5),
    ],
    // Africa
    &[
        (-6.0, 35.8), (10.0, 37.0), (11.0, 33.0), (20.0, 30.5), (25.0, 32.0),
        (32.0, 31.0), (34.0, 28.0), (38.0, 22.0), (43.0, 12.5), (51.0, 12.0),
        (51.0, 10.5), (47.0, 4.5), (40.0, -3.0), (39.0, -8.0), (40.5, -15.0),
        (35.0, -20.0), (35.5, -24.0), (32.5, -28.5), (27.0, -34.0), (20.0, -35.0),
        (18.0, -32.0), (15.0, -27.0), (12.0, -18.0), (13.5, -11.0), (12.0, -5.0),
        (9.0, -1.0), (9.5, 4.0), (6.0, 4.3), (1.0, 6.0), (-4.0, 5.0),
        (-7.5, 4.5), (-13.0, 8.0), (-16.5, 12.5), (-17.0, 15.0), (-16.0, 20.0),
        (-17.0, 21.0), (-13.0, 27.5), (-10.0, 30.0), (-9.5, 32.5), (-6.0, 35.8),
    ],
    // Eurasia
    &[
        (-5.6, 36.0), (-9.5, 37.0), (-9.0, 43.0), (-2.0, 43.5), (-1.5, 46.5),
        (-4.5, 48.5), (1.5, 50.5), (4.0, 51.5), (8.0, 54.0), (8.5, 57.0),
        (10.5, 57.5), (10.0, 55.0), (12.5, 54.5), (14.0, 54.0), (19.0, 54.5),
        (21.0, 56.5), (24.0, 57.5), (23.5, 59.5), (29.0, 60.0), (22.5, 60.5),
        (21.5, 63.0), (25.0, 65.0), (21.5, 65.5), (17.5, 62.5), (18.5, 60.0),
        (16.0, 56.3), (12.8, 55.5), (11.0, 59.0), (7.0, 58.0), (5.0, 60.0),
        (5.0, 62.0), (10.0, 63.5), (15.0, 68.0), (20.0, 70.0), (28.0, 71.0),
        (33.0, 69.5), (41.0, 67.0), (39.5, 65.0), (44.0, 66.2), (44.0, 68.5),
        (53.0, 68.5), (60.0, 69.5), (68.0, 69.0), (73.0, 72.5), (80.0, 73.5),
        (87.0, 75.0), (98.0, 76.5), (104.0, 77.7), (113.0, 73.5), (127.0, 73.5),
        (140.0, 72.5), (150.0, 71.5), (160.0, 70.0), (170.0, 70.0), (180.0, 69.0),
        (-172.0, 67.0), (-170.0, 66.0), (-174.0, 64.5), (180.0, 65.0), (172.0, 61.0),
        (163.0, 60.0), (160.0, 54.0), (156.5, 51.0), (156.0, 57.0), (150.0, 59.5),
        (143.0, 59.0), (137.0, 54.0), (141.0, 52.0), (140.0, 48.0), (135.0, 43.5),
        (130.0, 42.5), (129.0, 35.5), (126.5, 34.5), (126.0, 37.7), (124.5, 40.0),
        (121.5, 39.0), (121.0, 40.8), (118.0, 39.0), (122.0, 37.0), (119.0, 35.0),
        (121.7, 31.0), (122.0, 29.8), (119.5, 25.0), (114.0, 22.3), (110.0, 21.0),
        (108.0, 21.5), (106.5, 20.0), (106.0, 18.0), (109.0, 15.0), (109.0, 11.5),
        (105.0, 8.6), (104.5, 10.5), (102.0, 12.5), (100.0, 13.5), (99.0, 10.0),
        (100.5, 7.0), (103.5, 1.5), (101.0, 3.0), (98.5, 8.0), (98.5, 13.0),
        (97.5, 16.5), (94.5, 16.0), (92.0, 21.0), (90.0, 22.0), (87.0, 21.5),
        (86.5, 20.0), (80.0, 15.5), (80.0, 10.0), (77.5, 8.0), (76.5, 9.0),
        (73.0, 17.0), (72.5, 21.0), (70.0, 22.5), (67.0, 24.8), (62.0, 25.2),
        (57.0, 25.7), (56.0, 26.5), (51.0, 30.0), (48.0, 30.0), (50.0, 26.7),
        (51.5, 24.0), (56.0, 24.5), (56.5, 26.2), (59.5, 22.5), (55.0, 17.0),
        (52.0, 16.0), (45.0, 13.0), (43.0, 13.0), (39.0, 21.5), (35.0, 28.0),
        (34.5, 29.5), (32.5, 30.0), (34.0, 31.5), (35.0, 33.0), (36.0, 35.5),
        (36.0, 36.8), (33.0, 36.0), (28.0, 36.7), (26.5, 39.5), (26.0, 40.8),
        (23.0, 40.0), (22.5, 36.5), (20.5, 39.5), (19.5, 42.0), (13.5, 45.5),
        (12.3, 45.2), (14.0, 42.0), (16.0, 41.0), (18.5, 40.0), (16.0, 38.0),
        (15.6, 38.2), (12.5, 41.0), (10.0, 44.0), (7.5, 43.8), (3.0, 43.3),
        (3.2, 42.0), (0.5, 40.5), (-0.5, 38.0), (-2.0, 36.7), (-5.6, 36.0),
    ],
    // Australia
    &[
        (114.0, -22.0), (114.0, -26.0), (115.0, -34.0), (118.0, -35.0), (124.0, -33.8),
        (129.0, -31.6), (132.0, -32.0), (135.0, -34.7), (138.0, -35.5), (140.0, -38.0),
        (144.0, -38.2), (147.0, -38.0), (150.0, -37.5), (151.5, -33.0), (153.5, -28.0),
        (153.0, -25.0), (150.5, -22.5), (146.0, -19.0), (145.5, -15.0), (142.5, -10.7),
        (141.5, -13.0), (141.0, -17.0), (139.0, -17.0), (136.0, -15.5), (137.0, -12.0),
        (133.0, -11.5), (130.0, -12.0), (129.5, -15.0), (126.0, -14.0), (122.0, -17.5),
        (121.0, -19.5), (117.0, -20.7), (114.0, -22.0),
    ],
    // Greenland
    &[
        (-73.0, 78.0), (-66.0, 81.0), (-50.0, 82.5), (-30.0, 83.5), (-20.0, 82.0),
        (-18.0, 77.0), (-20.0, 70.0), (-25.0, 68.5), (-33.0, 68.0), (-40.0, 65.0),
        (-43.0, 60.0), (-48.0, 61.0), (-51.0, 64.0), (-53.0, 67.0), (-54.0, 70.0),
        (-57.0, 74.0), (-66.0, 76.0), (-73.0, 78.0),
    ],
    // Antarctica
    &[
        (-180.0, -78.0), (-160.0, -78.0), (-150.0, -77.0), (-140.0, -75.0), (-120.0, -74.0),
        (-100.0, -73.0), (-80.0, -73.0), (-68.0, -70.0), (-60.0, -64.0), (-58.0, -63.0),
        (-62.0, -66.0), (-62.0, -72.0), (-60.0, -75.0), (-45.0, -78.0), (-30.0, -78.0),
        (-20.0, -74.0), (-10.0, -71.0), (0.0, -70.0), (20.0, -70.0), (40.0, -69.0),
        (60.0, -67.0), (80.0, -67.0), (90.0, -66.0), (110.0, -66.0), (130.0, -66.0),
        (150.0, -68.0), (165.0, -71.0), (170.0, -73.0), (165.0, -78.0), (180.0, -78.0),
    ],
    // Great Britain
    &[
        (-5.7, 50.0), (1.4, 51.2), (1.7, 52.7), (0.0, 53.5), (-1.5, 55.0),
        (-2.0, 56.0), (-3.5, 58.5), (-5.0, 58.6), (-6.0, 56.5), (-5.0, 55.0),
        (-3.0, 54.0), (-4.5, 52.5), (-5.2, 51.7), (-3.0, 51.4), (-5.7, 50.0),
    ],
    // Ireland
    &[
        (-6.0, 52.0), (-6.0, 54.3), (-7.5, 55.3), (-10.0, 54.0), (-10.3, 51.8),
        (-8.0, 51.6), (-6.0, 52.0),
    ],
    // Iceland
    &[
        (-24.0, 65.5), (-22.0, 66.4), (-16.0, 66.5), (-14.5, 65.3), (-15.0, 64.3),
        (-18.0, 63.4), (-22.5, 63.8), (-24.0, 65.5),
    ],
    // Honshu, Kyushu, Shikoku
    &[
        (130.0, 31.0), (131.5, 31.5), (132.0, 33.8), (135.0, 33.5), (136.8, 34.3),
        (140.0, 35.2), (141.0, 38.0), (142.0, 39.5), (141.4, 41.4), (140.0, 40.5),
        (139.8, 38.5), (138.5, 37.3), (137.0, 36.9), (136.0, 35.6), (132.5, 35.4),
        (131.0, 34.5), (130.0, 33.2), (130.0, 31.0),
    ],
    // Hokkaido
    &[
        (140.0, 41.5), (141.5, 42.5), (143.3, 42.0), (145.5, 43.3), (144.0, 44.0),
        (141.8, 45.4), (141.4, 43.2), (140.0, 42.5), (140.0, 41.5),
    ],
    // Madagascar
    &[
        (49.3, -12.0), (50.5, -15.5), (49.5, -17.0), (47.2, -24.8), (45.0, -25.5),
        (43.7, -22.0), (44.3, -20.0), (44.0, -17.0), (46.3, -15.7), (48.0, -13.5),
        (49.3, -12.0),
    ],
    // New Zealand, North Island
    &[
        (172.7, -34.4), (174.5, -36.0), (176.0, -37.6), (178.5, -37.7), (177.0, -39.2),
        (176.8, -40.0), (175.2, -41.6), (174.7, -41.3), (175.0, -40.0), (173.8, -39.2),
        (174.6, -38.0), (174.5, -37.0), (172.7, -34.4),
    ],
    // New Zealand, South Island
    &[
        (172.7, -40.5), (174.3, -41.7), (173.0, -43.7), (171.2, -44.5), (170.6, -45.9),
        (169.0, -46.6), (166.5, -46.0), (168.3, -44.0), (170.5, -43.0), (172.0, -41.5),
        (172.7, -40.5),
    ],
    // Borneo
    &[
        (109.0, 1.5), (111.0, 1.5), (113.0, 3.2), (115.5, 5.4), (117.0, 7.0),
        (119.0, 5.0), (118.0, 2.5), (117.5, 0.5), (116.0, -3.5), (114.5, -3.8),
        (111.0, -3.0), (110.0, -1.5), (109.0, 1.5),
    ],
    // Sumatra
    &[
        (95.3, 5.6), (97.5, 5.2), (100.5, 2.2), (104.0, -1.0), (106.0, -3.0),
        (105.8, -5.8), (104.5, -5.9), (101.0, -2.5), (99.0, 0.0), (95.3, 5.6),
    ],
    // Java
    &[
        (105.5, -6.8), (108.0, -6.3), (111.0, -6.5), (114.5, -7.8), (114.5, -8.7),
        (111.0, -8.2), (106.5, -7.4), (105.5, -6.8),
    ],
    // New Guinea
    &[
        (131.0, -1.3), (135.0, -3.3), (138.0, -1.6), (141.0, -2.6), (145.5, -4.3),
        (148.0, -8.0), (150.5, -10.5), (147.0, -10.2), (144.0, -7.7), (142.5, -9.3),
        (141.0, -9.0), (139.0, -8.1), (137.8, -5.3), (134.0, -4.0), (132.0, -2.8),
        (131.0, -1.3),
    ],
    // Cuba
    &[
        (-85.0, 21.9), (-82.0, 23.1), (-77.0, 22.0), (-74.2, 20.2), (-77.7, 19.9),
        (-79.0, 21.6), (-83.0, 21.8), (-85.0, 21.9),
    ],
];
