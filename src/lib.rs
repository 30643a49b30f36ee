//! pr_climatology: seasonal precipitation climatology maps from NetCDF
//!
//! Reads a gridded precipitation variable (`pr`, kg m-2 s-1) from a NetCDF
//! file, averages it by meteorological season, converts it to mm/day and
//! renders one season as a filled-contour world map.
//!
//! ## Module Organization
//!
//! - [`netcdf_io`]: NetCDF loading with CF mask-and-scale decoding
//! - [`data_array`]: labelled in-memory arrays
//! - [`time`]: CF time coordinate decoding across calendars
//! - [`season`]: meteorological seasons
//! - [`climatology`]: seasonal mean reduction
//! - [`units`]: precipitation unit conversion
//! - [`plot`]: map rendering and image output
//! - [`pipeline`]: the end-to-end run
//! - [`parallel`]: parallel processing configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pr_climatology::prelude::*;
//!
//! let dataset = Dataset::open("pr_Amon_model_historical.nc").unwrap();
//! let model = dataset.attr_str("source_id").unwrap();
//! let pr = dataset.variable("pr").unwrap();
//!
//! let clim = convert_pr_units(seasonal_mean(&pr, "time").unwrap());
//! let figure = create_plot(&clim, &model, Season::Djf, &PlotOptions::default()).unwrap();
//! figure.save(std::path::Path::new("pr_djf.png")).unwrap();
//! ```

pub mod cli;
pub mod climatology;
pub mod data_array;
pub mod errors;
pub mod netcdf_io;
pub mod parallel;
pub mod pipeline;
pub mod plot;
pub mod season;
pub mod time;
pub mod units;

pub use errors::{ClimError, Result};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::climatology::{seasonal_mean, Climatology, SeasonSlice};
    pub use crate::data_array::{AttrValue, Coordinate, DataArray};
    pub use crate::errors::{ClimError, Result};
    pub use crate::netcdf_io::Dataset;
    pub use crate::parallel::ParallelConfig;
    pub use crate::pipeline::{run, PipelineConfig};
    pub use crate::plot::{create_plot, default_levels, Figure, FigureStyle, PlotOptions};
    pub use crate::season::Season;
    pub use crate::units::convert_pr_units;
}
