//! Plate Carrée map projection and grid sampling
//!
//! Projected coordinates are in degrees: x is longitude relative to the
//! central meridian in [-180, 180), y is latitude.

/// Equirectangular projection with a configurable central meridian
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCarree {
    pub central_longitude: f64,
}

impl PlateCarree {
    pub fn new(central_longitude: f64) -> Self {
        Self { central_longitude }
    }

    /// Projected extent as (x_min, x_max, y_min, y_max)
    pub const EXTENT: (f64, f64, f64, f64) = (-180.0, 180.0, -90.0, 90.0);

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (wrap_180(lon - self.central_longitude), lat)
    }

    /// Project a segment between two (lon, lat) points, taking the shorter
    /// way round. A segment crossing the map edge comes back as two pieces
    /// meeting the left and right edges at the interpolated latitude.
    pub fn project_segment(&self, a: (f64, f64), b: (f64, f64)) -> Vec<[(f64, f64); 2]> {
        let (ax, ay) = self.project(a.0, a.1);
        let (bx, by) = self.project(b.0, b.1);
        if (ax - bx).abs() <= 180.0 {
            return vec![[(ax, ay), (bx, by)]];
        }

        // Edge on the side of `a`, and `b` unwrapped beyond it
        let (edge, bx_unwrapped) = if ax > bx {
            (180.0, bx + 360.0)
        } else {
            (-180.0, bx - 360.0)
        };
        let t = (edge - ax) / (bx_unwrapped - ax);
        let y = ay + t * (by - ay);
        vec![[(ax, ay), (edge, y)], [(-edge, y), (bx, by)]]
    }

    /// Longitude in [0, 360) and latitude for a projected point
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        ((x + self.central_longitude).rem_euclid(360.0), y)
    }
}

/// Wrap a longitude difference into [-180, 180)
pub fn wrap_180(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Bilinear sampler over a regular (lat, lon) grid.
///
/// Latitudes may be stored in either order and longitudes in either the
/// [-180, 180) or [0, 360) convention; both are normalised on construction.
/// Points outside the grid's latitude range, or outside its longitude range
/// for regional grids, sample as `None`, as do cells touching a NaN.
#[derive(Debug, Clone)]
pub struct GridSampler {
    lat: Vec<f64>,
    lon: Vec<f64>,
    /// Row-major (lat, lon) values matching the normalised axes
    values: Vec<f64>,
    periodic: bool,
}

impl GridSampler {
    pub fn new(data: &ndarray::Array2<f64>, lat: &[f64], lon: &[f64]) -> Self {
        let mut lat_order: Vec<usize> = (0..lat.len()).collect();
        lat_order.sort_by(|&a, &b| lat[a].total_cmp(&lat[b]));

        let lon_norm: Vec<f64> = lon.iter().map(|l| l.rem_euclid(360.0)).collect();
        let mut lon_order: Vec<usize> = (0..lon.len()).collect();
        lon_order.sort_by(|&a, &b| lon_norm[a].total_cmp(&lon_norm[b]));

        let mut values = Vec::with_capacity(lat.len() * lon.len());
        for &i in &lat_order {
            for &j in &lon_order {
                values.push(data[[i, j]]);
            }
        }

        let sorted_lon: Vec<f64> = lon_order.iter().map(|&j| lon_norm[j]).collect();
        let periodic = is_periodic(&sorted_lon);

        Self {
            lat: lat_order.iter().map(|&i| lat[i]).collect(),
            lon: sorted_lon,
            values,
            periodic,
        }
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.lon.len() + j]
    }

    /// Interpolated value at a longitude (any convention) and latitude
    pub fn sample(&self, lon: f64, lat: f64) -> Option<f64> {
        let (i0, i1, fy) = bracket(&self.lat, lat)?;
        let (j0, j1, fx) = self.lon_bracket(lon.rem_euclid(360.0))?;

        let v00 = self.at(i0, j0);
        let v01 = self.at(i0, j1);
        let v10 = self.at(i1, j0);
        let v11 = self.at(i1, j1);
        if [v00, v01, v10, v11].iter().any(|v| v.is_nan()) {
            return None;
        }

        let top = v00 * (1.0 - fx) + v01 * fx;
        let bottom = v10 * (1.0 - fx) + v11 * fx;
        Some(top * (1.0 - fy) + bottom * fy)
    }

    fn lon_bracket(&self, lon: f64) -> Option<(usize, usize, f64)> {
        if let Some(found) = bracket(&self.lon, lon) {
            return Some(found);
        }
        if !self.periodic {
            return None;
        }

        // Across the seam between the last column and the first + 360
        let last = self.lon.len() - 1;
        let first = self.lon[0] + 360.0;
        let lon = if lon < self.lon[0] { lon + 360.0 } else { lon };
        let span = first - self.lon[last];
        let f = if span > 0.0 {
            (lon - self.lon[last]) / span
        } else {
            0.0
        };
        Some((last, 0, f.clamp(0.0, 1.0)))
    }
}

/// Indices and fraction of the interval of ascending `axis` containing `x`
fn bracket(axis: &[f64], x: f64) -> Option<(usize, usize, f64)> {
    let n = axis.len();
    if n == 0 || x.is_nan() || x < axis[0] || x > axis[n - 1] {
        return None;
    }
    if n == 1 {
        return Some((0, 0, 0.0));
    }

    let upper = axis.partition_point(|&a| a < x).clamp(1, n - 1);
    let lower = upper - 1;
    let span = axis[upper] - axis[lower];
    let f = if span > 0.0 {
        (x - axis[lower]) / span
    } else {
        0.0
    };
    Some((lower, upper, f))
}

/// A longitude axis wraps if it is evenly spaced around the whole globe
fn is_periodic(sorted_lon: &[f64]) -> bool {
    if sorted_lon.len() < 2 {
        return false;
    }
    let step = (sorted_lon[sorted_lon.len() - 1] - sorted_lon[0]) / (sorted_lon.len() - 1) as f64;
    let gap = sorted_lon[0] + 360.0 - sorted_lon[sorted_lon.len() - 1];
    step > 0.0 && (gap - step).abs() <= step * 0.5
}
