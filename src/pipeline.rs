//! The end-to-end run: load, reduce, convert, plot, save.

use crate::cli::Args;
use crate::climatology::seasonal_mean;
use crate::errors::Result;
use crate::netcdf_io::Dataset;
use crate::parallel::ParallelConfig;
use crate::plot::{create_plot, Coastlines, Figure, FigureStyle, PlotOptions, TextPainter};
use crate::season::Season;
use crate::units::convert_pr_units;
use std::path::PathBuf;
use tracing::info;

/// Precipitation variable read from the input file
pub const PR_VARIABLE: &str = "pr";
/// Global attribute naming the model
pub const MODEL_ATTRIBUTE: &str = "source_id";
/// Dimension averaged over
pub const TIME_DIM: &str = "time";

/// Everything a run needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub pr_file: PathBuf,
    pub season: Season,
    pub output_file: PathBuf,
    pub gridlines: bool,
    pub cbar_levels: Option<Vec<f64>>,
    pub font: Option<PathBuf>,
    pub coastlines: Option<PathBuf>,
    pub parallel: ParallelConfig,
}

impl PipelineConfig {
    pub fn new(
        pr_file: impl Into<PathBuf>,
        season: Season,
        output_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pr_file: pr_file.into(),
            season,
            output_file: output_file.into(),
            gridlines: false,
            cbar_levels: None,
            font: None,
            coastlines: None,
            parallel: ParallelConfig::default(),
        }
    }
}

impl From<&Args> for PipelineConfig {
    fn from(args: &Args) -> Self {
        Self {
            pr_file: args.pr_file.clone(),
            season: args.season,
            output_file: args.output_file.clone(),
            gridlines: args.gridlines,
            cbar_levels: args.cbar_levels.clone(),
            font: args.font.clone(),
            coastlines: args.coastlines.clone(),
            parallel: ParallelConfig::new(args.threads),
        }
    }
}

/// Build the figure style: coastlines from file or built in, and a font if
/// one can be found.
pub fn figure_style(config: &PipelineConfig) -> Result<FigureStyle> {
    let coastlines = match &config.coastlines {
        Some(path) => Coastlines::from_geojson_file(path)?,
        None => Coastlines::builtin(),
    };

    Ok(FigureStyle {
        coastlines,
        text: TextPainter::discover(config.font.as_deref())?,
        ..FigureStyle::default()
    })
}

/// Run the pipeline and write the image. Returns the rendered figure.
pub fn run(config: &PipelineConfig) -> Result<Figure> {
    config.parallel.setup_global_pool()?;

    let (model, pr) = {
        let dataset = Dataset::open(&config.pr_file)?;
        let model = dataset.attr_str(MODEL_ATTRIBUTE)?;
        (model, dataset.variable(PR_VARIABLE)?)
    };

    let clim = seasonal_mean(&pr, TIME_DIM)?;
    let clim = convert_pr_units(clim);

    let options = PlotOptions {
        gridlines: config.gridlines,
        levels: config.cbar_levels.clone(),
        style: figure_style(config)?,
    };
    let figure = create_plot(&clim, &model, config.season, &options)?;
    figure.save(&config.output_file)?;

    info!(
        model = %model,
        season = %config.season,
        output = %config.output_file.display(),
        "Finished"
    );

    Ok(figure)
}
