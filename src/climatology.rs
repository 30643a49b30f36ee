//! Seasonal climatology reduction
//!
//! Groups the time steps of a variable by meteorological season and averages
//! each group, the way a `groupby("time.season").mean("time")` would. The
//! source variable's attributes are carried through unchanged.

use crate::data_array::DataArray;
use crate::errors::{ClimError, Result};
use crate::season::Season;
use crate::time::decode_months;
use ndarray::{Array2, ArrayView1, Axis, Ix2, Zip};
use tracing::{debug, info};

/// Name of the dimension that replaces time after the reduction
pub const SEASON_DIM: &str = "season";

const LAT_NAMES: [&str; 3] = ["lat", "latitude", "nav_lat"];
const LON_NAMES: [&str; 3] = ["lon", "longitude", "nav_lon"];

/// Seasonal means of a variable
#[derive(Debug, Clone)]
pub struct Climatology {
    /// Seasons present, in the order of the `season` axis
    pub seasons: Vec<Season>,
    /// Reduced array; its time dimension is replaced by `season`
    pub array: DataArray,
}

/// One season's 2-D field, oriented (lat, lon)
#[derive(Debug, Clone)]
pub struct SeasonSlice {
    pub season: Season,
    pub data: Array2<f64>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub units: Option<String>,
}

impl Climatology {
    pub fn units(&self) -> Option<&str> {
        self.array.units()
    }

    /// Select the spatial field of one season.
    ///
    /// # Errors
    ///
    /// Fails with [`ClimError::SeasonNotFound`] if the season has no data,
    /// and with a dimension or coordinate error if the remaining dimensions
    /// are not a latitude/longitude pair with coordinates.
    pub fn sel(&self, season: Season) -> Result<SeasonSlice> {
        let index = self
            .seasons
            .iter()
            .position(|&s| s == season)
            .ok_or_else(|| ClimError::SeasonNotFound {
                season: season.to_string(),
            })?;

        let season_axis = self.array.axis_of(SEASON_DIM)?;
        let field = self.array.data.index_axis(Axis(season_axis), index);
        let spatial_dims: Vec<&str> = self
            .array
            .dims
            .iter()
            .filter(|d| d.as_str() != SEASON_DIM)
            .map(String::as_str)
            .collect();

        if spatial_dims.len() != 2 {
            return Err(ClimError::ShapeMismatch(format!(
                "expected two spatial dimensions besides '{SEASON_DIM}', found {spatial_dims:?}"
            )));
        }

        let lat_dim = find_dim(&spatial_dims, &LAT_NAMES, "degrees_north", &self.array)?;
        let lon_dim = find_dim(&spatial_dims, &LON_NAMES, "degrees_east", &self.array)?;

        let field = field.into_dimensionality::<Ix2>()?;
        let data = if spatial_dims[0] == lat_dim {
            field.to_owned()
        } else {
            field.t().to_owned()
        };

        Ok(SeasonSlice {
            season,
            data,
            lat: self.array.coord(lat_dim)?.values.clone(),
            lon: self.array.coord(lon_dim)?.values.clone(),
            units: self.units().map(str::to_string),
        })
    }
}

/// Identify a spatial dimension by name, falling back to its coordinate units
fn find_dim<'a>(
    dims: &[&'a str],
    names: &[&str],
    units: &str,
    array: &DataArray,
) -> Result<&'a str> {
    dims.iter()
        .copied()
        .find(|d| names.contains(&d.to_ascii_lowercase().as_str()))
        .or_else(|| {
            dims.iter().copied().find(|d| {
                array
                    .coords
                    .get(*d)
                    .and_then(|c| c.attr_str("units"))
                    .is_some_and(|u| u == units)
            })
        })
        .ok_or_else(|| ClimError::DimensionNotFound {
            var: array.name.clone(),
            dim: names[0].to_string(),
        })
}

/// Average a variable over `time_dim` within each season.
///
/// The time coordinate must carry CF `units` and may carry `calendar`.
/// NaN values are skipped; a cell with no valid values in a season is NaN.
/// Seasons with no time steps are left out of the result.
pub fn seasonal_mean(array: &DataArray, time_dim: &str) -> Result<Climatology> {
    let time_axis = array.axis_of(time_dim)?;
    let time = array.coord(time_dim)?;
    let units = time.attr_str("units").ok_or_else(|| ClimError::AttributeNotFound {
        attr: "units".to_string(),
        owner: format!("coordinate '{time_dim}'"),
    })?;
    let months = decode_months(&time.values, units, time.attr_str("calendar"))?;

    let mut seasons = Vec::new();
    let mut means = Vec::new();

    for season in Season::ALL {
        let indices: Vec<usize> = months
            .iter()
            .enumerate()
            .filter(|(_, &m)| Season::from_month(m) == Some(season))
            .map(|(i, _)| i)
            .collect();

        if indices.is_empty() {
            debug!(season = %season, "No time steps for season");
            continue;
        }

        debug!(
            season = %season,
            steps = indices.len(),
            threads = rayon::current_num_threads(),
            "Averaging season"
        );

        let group = array.data.select(Axis(time_axis), &indices);
        let mean = Zip::from(group.lanes(Axis(time_axis))).par_map_collect(nan_mean);
        seasons.push(season);
        means.push(mean.insert_axis(Axis(time_axis)));
    }

    if means.is_empty() {
        return Err(ClimError::ShapeMismatch(format!(
            "variable '{}' has no time steps to average",
            array.name
        )));
    }

    let views: Vec<_> = means.iter().map(|m| m.view()).collect();
    let data = ndarray::concatenate(Axis(time_axis), &views)?;

    let mut dims = array.dims.clone();
    dims[time_axis] = SEASON_DIM.to_string();

    let mut coords = array.coords.clone();
    coords.remove(time_dim);

    info!(
        variable = %array.name,
        seasons = ?seasons.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        "Computed seasonal climatology"
    );

    Ok(Climatology {
        seasons,
        array: DataArray {
            name: array.name.clone(),
            dims,
            data,
            attrs: array.attrs.clone(),
            coords,
        },
    })
}

fn nan_mean(lane: ArrayView1<'_, f64>) -> f64 {
    let (sum, count) = lane
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0_f64, 0_usize), |(sum, count), &v| (sum + v, count + 1));

    if count > 0 {
        sum / count as f64
    } else {
        f64::NAN
    }
}
