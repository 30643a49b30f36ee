//! Defines command-line interface options using `clap`.

use crate::season::Season;
use clap::Parser;
use std::path::PathBuf;

/// Plot the precipitation climatology for a given season.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "plot-pr-climatology",
    version,
    about = "Plot the precipitation climatology for a given season."
)]
pub struct Args {
    /// Precipitation data file
    pub pr_file: PathBuf,

    /// Season to plot
    #[arg(value_enum)]
    pub season: Season,

    /// Output file name
    pub output_file: PathBuf,

    /// Include gridlines on the plot
    #[arg(long, default_value_t = false)]
    pub gridlines: bool,

    /// List of levels / tick marks to appear on the colorbar
    #[arg(long = "cbar_levels", num_args = 0.., allow_negative_numbers = true)]
    pub cbar_levels: Option<Vec<f64>>,

    /// TrueType font for titles and labels. Defaults to a system font.
    #[arg(long, env = "PR_CLIM_FONT")]
    pub font: Option<PathBuf>,

    /// GeoJSON coastline file. Defaults to a built-in coarse outline.
    #[arg(long)]
    pub coastlines: Option<PathBuf>,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
