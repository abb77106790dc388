use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::change::ChangeMode;
use crate::consts::{
    DEFAULT_BASEMAP_SEARCH_DAYS, DEFAULT_BUFFER_RADIUS_METERS, DEFAULT_CLOUDY_PIXEL_THRESHOLD,
    DEFAULT_FPS, DEFAULT_FRAME_DIMENSION, DEFAULT_FRAME_HALF_WIDTH_DEGREES,
    DEFAULT_GRIDLINE_INTERVAL_DEGREES, DEFAULT_HEADER_HEIGHT, DEFAULT_OVERLAY_MASK_THRESHOLD,
    DEFAULT_WINDOW_DAYS,
};
use crate::error::{Result, SarveilError};
use crate::geo::DateWindow;
use crate::render::VisParams;
use crate::sequence::LoopCount;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub poi: PoiConfig,
    /// Explicit acquisition range. When absent, the last `default_window_days` days are used.
    #[serde(default)]
    pub window: Option<DateRangeConfig>,
    #[serde(default = "default_window_days")]
    pub default_window_days: i64,
    #[serde(default)]
    pub mode: ChangeMode,
    /// Keep only the most recent N scenes.
    #[serde(default)]
    pub max_frames: Option<usize>,
    /// Root directory for frames and the animation.
    pub output: PathBuf,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub basemap: BasemapConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl PipelineConfig {
    /// Defaults for a single point of interest, writing under `output`.
    pub fn for_poi(name: &str, lat: f64, lon: f64, output: PathBuf) -> Self {
        Self {
            poi: PoiConfig {
                name: name.to_string(),
                lat,
                lon,
            },
            window: None,
            default_window_days: DEFAULT_WINDOW_DAYS,
            mode: ChangeMode::default(),
            max_frames: None,
            output,
            region: RegionConfig::default(),
            basemap: BasemapConfig::default(),
            render: RenderConfig::default(),
            animation: AnimationConfig::default(),
        }
    }

    /// The SAR acquisition window for this run.
    pub fn date_window(&self, today: NaiveDate) -> Result<DateWindow> {
        match self.window {
            Some(ref range) => DateWindow::from_dates(range.from, range.to),
            None => DateWindow::recent(today, self.default_window_days),
        }
    }

    /// Reject settings no stage could work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(SarveilError::InvalidConfig(msg.to_string()));

        if self.poi.name.trim().is_empty() {
            return invalid("poi.name must not be empty");
        }
        if self.default_window_days < 0 {
            return invalid("default_window_days must not be negative");
        }
        if self.max_frames == Some(0) {
            return invalid("max_frames must be at least 1");
        }
        if self.basemap.enabled {
            if self.basemap.search_days.is_empty() {
                return invalid("basemap.search_days must list at least one window");
            }
            if self.basemap.search_days.iter().any(|&d| d <= 0) {
                return invalid("basemap.search_days must be positive");
            }
            if self.basemap.search_days.windows(2).any(|w| w[0] >= w[1]) {
                return invalid("basemap.search_days must be strictly increasing");
            }
            if !self.basemap.cloudy_pixel_threshold.is_finite()
                || self.basemap.cloudy_pixel_threshold <= 0.0
            {
                return invalid("basemap.cloudy_pixel_threshold must be positive");
            }
        }
        if self.render.width == 0 || self.render.map_height == 0 {
            return invalid("render.width and render.map_height must be positive");
        }
        if let Some(interval) = self.render.gridline_interval_degrees {
            if !interval.is_finite() || interval <= 0.0 {
                return invalid("render.gridline_interval_degrees must be positive");
            }
        }
        for (name, style) in [
            ("render.basemap_style", &self.render.basemap_style),
            ("render.overlay_style", &self.render.overlay_style),
            (
                "render.overlay_with_basemap_style",
                &self.render.overlay_with_basemap_style,
            ),
        ] {
            style
                .validate()
                .map_err(|msg| SarveilError::InvalidConfig(format!("{name}: {msg}")))?;
        }
        if self.animation.fps == 0 {
            return invalid("animation.fps must be at least 1");
        }
        Ok(())
    }
}

/// Named point of interest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoiConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Inclusive range of acquisition days.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DateRangeConfig {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegionConfig {
    pub buffer_radius_meters: f64,
    pub frame_half_width_degrees: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            buffer_radius_meters: DEFAULT_BUFFER_RADIUS_METERS,
            frame_half_width_degrees: DEFAULT_FRAME_HALF_WIDTH_DEGREES,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BasemapConfig {
    /// Search for an optical background at all.
    pub enabled: bool,
    /// Abort the run when no basemap is found instead of rendering overlay-only.
    pub required: bool,
    /// Maximum accepted cloudy pixel percentage (exclusive).
    pub cloudy_pixel_threshold: f64,
    /// Lookback windows in days, tried in order.
    pub search_days: Vec<i64>,
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            required: false,
            cloudy_pixel_threshold: DEFAULT_CLOUDY_PIXEL_THRESHOLD,
            search_days: DEFAULT_BASEMAP_SEARCH_DAYS.to_vec(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Height of the map area in pixels.
    pub map_height: u32,
    /// Height of the annotation strip above the map.
    pub header_height: u32,
    /// Dotted gridline spacing; `None` disables gridlines.
    pub gridline_interval_degrees: Option<f64>,
    /// Canvas color behind all layers.
    pub background: [u8; 3],
    pub basemap_style: VisParams,
    /// Overlay style when no basemap is drawn.
    pub overlay_style: VisParams,
    /// Overlay style on top of a basemap.
    pub overlay_with_basemap_style: VisParams,
    /// Extra directories scanned for annotation fonts.
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_DIMENSION,
            map_height: DEFAULT_FRAME_DIMENSION,
            header_height: DEFAULT_HEADER_HEIGHT,
            gridline_interval_degrees: Some(DEFAULT_GRIDLINE_INTERVAL_DEGREES),
            background: [0, 0, 0],
            basemap_style: VisParams {
                gamma: 3.0,
                ..VisParams::default()
            },
            overlay_style: VisParams {
                gamma: 0.9,
                ..VisParams::default()
            },
            overlay_with_basemap_style: VisParams {
                min: 0.25,
                max: 1.0,
                gamma: 1.0,
                opacity: 0.8,
                mask_threshold: Some(DEFAULT_OVERLAY_MASK_THRESHOLD),
            },
            font_dirs: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub fps: u32,
    pub loop_count: LoopCount,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            loop_count: LoopCount::Infinite,
        }
    }
}

impl fmt::Display for AnimationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fps, {}", self.fps, self.loop_count)
    }
}
