pub mod basemap;
pub mod config;
pub mod pipeline;
pub mod scenes;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use sarveil_core::catalog::session::{init_session, session};
use sarveil_core::catalog::{Catalog, LocalCatalog};
use sarveil_core::change::ChangeMode;
use sarveil_core::pipeline::config::DateRangeConfig;
use sarveil_core::pipeline::PipelineConfig;
use tracing::debug;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Primary,
    Secondary,
}

impl From<ModeArg> for ChangeMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Primary => ChangeMode::Primary,
            ModeArg::Secondary => ChangeMode::Secondary,
        }
    }
}

/// Point of interest, catalog and date range shared by every search command.
#[derive(Args)]
pub struct PoiArgs {
    /// Local catalog directory (holds catalog.json)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Pipeline config file (TOML); overrides the POI flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Point of interest name
    #[arg(long, default_value = "poi")]
    pub name: String,

    /// Latitude of the point of interest
    #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
    pub lat: Option<f64>,

    /// Longitude of the point of interest
    #[arg(long, allow_negative_numbers = true, required_unless_present = "config")]
    pub lon: Option<f64>,

    /// First acquisition day (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last acquisition day (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Lookback in days when no range is given
    #[arg(long, default_value = "14")]
    pub days: i64,

    /// Change highlight formula
    #[arg(long, value_enum, default_value = "primary")]
    pub mode: ModeArg,

    /// Buffer radius around the point in meters
    #[arg(long, default_value = "3000")]
    pub buffer: f64,
}

impl PoiArgs {
    /// Config file contents when given, otherwise defaults with the flags applied.
    pub fn load_config(&self, output: &Path) -> Result<PipelineConfig> {
        if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: PipelineConfig =
                toml::from_str(&contents).context("Invalid pipeline config")?;
            debug!(path = %path.display(), poi = %config.poi.name, "Loaded pipeline config");
            return Ok(config);
        }

        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            anyhow::bail!("--lat and --lon are required without --config");
        };
        let mut config = PipelineConfig::for_poi(&self.name, lat, lon, output.to_path_buf());
        config.mode = self.mode.into();
        config.default_window_days = self.days;
        config.region.buffer_radius_meters = self.buffer;
        if let (Some(from), Some(to)) = (self.from, self.to) {
            config.window = Some(DateRangeConfig { from, to });
        }
        Ok(config)
    }

    /// Open the local catalog and install it as the process session.
    pub fn open_catalog(&self) -> Result<Arc<dyn Catalog>> {
        let catalog = LocalCatalog::open(&self.catalog)
            .with_context(|| format!("Failed to open catalog {}", self.catalog.display()))?;
        init_session(Arc::new(catalog))?;
        Ok(session()?)
    }
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
