//! Creates a sample precipitation NetCDF file for trying out plot-pr-climatology.
//!
//! The file mimics a monthly CMIP-style `pr` variable: ten years of monthly
//! means on a 2.5 degree global grid, with a wet band that follows the sun
//! between the hemispheres.

use ndarray::{Array1, Array3};
use netcdf::create;
use std::path::Path;

const YEARS: usize = 10;
const NLAT: usize = 72;
const NLON: usize = 144;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = Path::new("pr_test_data.nc");

    println!("🔨 Creating test precipitation file: {}", output_path.display());

    if output_path.exists() {
        std::fs::remove_file(output_path)?
    }

    let mut file = create(output_path)?;

    file.add_attribute("title", "Synthetic precipitation")?;
    file.add_attribute("source_id", "SYNTH-1")?;
    file.add_attribute("created_by", "create_test_pr_netcdf.rs")?;

    let ntime = YEARS * 12;
    file.add_dimension("time", ntime)?;
    file.add_dimension("lat", NLAT)?;
    file.add_dimension("lon", NLON)?;

    // Mid-month time stamps in a 365-day calendar
    let month_days = [31.0, 28.0, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0];
    let mut time_data = Vec::with_capacity(ntime);
    let mut start = 0.0;
    for _ in 0..YEARS {
        for days in month_days {
            time_data.push(start + days / 2.0);
            start += days;
        }
    }

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "days since 1850-01-01")?;
        time_var.put_attribute("calendar", "noleap")?;
        time_var.put_attribute("standard_name", "time")?;
        time_var.put(Array1::from(time_data).view(), ..)?;
    }

    let lats: Vec<f64> = (0..NLAT).map(|i| -88.75 + i as f64 * 2.5).collect();
    let lons: Vec<f64> = (0..NLON).map(|i| 1.25 + i as f64 * 2.5).collect();

    {
        let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put_attribute("standard_name", "latitude")?;
        lat_var.put(Array1::from(lats.clone()).view(), ..)?;
    }

    {
        let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put_attribute("standard_name", "longitude")?;
        lon_var.put(Array1::from(lons.clone()).view(), ..)?;
    }

    {
        let mut pr_var = file.add_variable::<f32>("pr", &["time", "lat", "lon"])?;
        pr_var.put_attribute("units", "kg m-2 s-1")?;
        pr_var.put_attribute("standard_name", "precipitation_flux")?;
        pr_var.put_attribute("long_name", "Precipitation")?;
        pr_var.put_attribute("_FillValue", 1.0e20f32)?;

        let pr = Array3::from_shape_fn((ntime, NLAT, NLON), |(t, i, j)| {
            let month = (t % 12) as f64;
            // Rain band peaks near 10N in July and 10S in January
            let centre = -10.0 * (month * std::f64::consts::PI / 6.0).cos();
            let band = (-((lats[i] - centre) / 12.0).powi(2)).exp();
            let zonal = 1.0 + 0.3 * (lons[j].to_radians() * 3.0).sin();
            let mm_per_day = 1.0 + 11.0 * band * zonal;
            (mm_per_day / 86_400.0) as f32
        });
        pr_var.put(pr.view(), ..)?;
    }

    println!("✅ Successfully created test precipitation file with:");
    println!("   📏 Dimensions: time({ntime}), lat({NLAT}), lon({NLON})");
    println!("   📈 Variables: time, lat, lon, pr");
    println!("\n🧪 Plot it with:");
    println!("   cargo run -- pr_test_data.nc JJA pr_jja.png --gridlines");

    Ok(())
}
