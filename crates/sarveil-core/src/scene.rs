use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ndarray::Array2;

use crate::catalog::SceneDescriptor;
use crate::consts::{PROP_ORBIT_PASS, PROP_PLATFORM_NUMBER};
use crate::error::{Result, SarveilError};
use crate::geo::BoundingBox;

/// Three co-registered rasters drawn as red, green and blue.
#[derive(Clone, Debug, PartialEq)]
pub struct BandTriple {
    pub red: Array2<f32>,
    pub green: Array2<f32>,
    pub blue: Array2<f32>,
}

impl BandTriple {
    /// Build a triple, rejecting empty or mismatched rasters.
    pub fn new(red: Array2<f32>, green: Array2<f32>, blue: Array2<f32>) -> Result<Self> {
        let (h, w) = red.dim();
        if h == 0 || w == 0 || green.dim() != (h, w) || blue.dim() != (h, w) {
            return Err(SarveilError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok(Self { red, green, blue })
    }

    /// (rows, cols) shared by all three channels.
    pub fn dim(&self) -> (usize, usize) {
        self.red.dim()
    }
}

/// One satellite observation flowing through the pipeline.
#[derive(Clone, Debug)]
pub struct SceneRecord {
    pub id: String,
    pub timestamp_millis: i64,
    acquired: DateTime<Utc>,
    /// Geographic bounds covered by the rasters.
    pub footprint: BoundingBox,
    /// Platform letter, e.g. `A` for Sentinel-1A.
    pub platform: Option<String>,
    /// Orbit pass direction, e.g. `ASCENDING`.
    pub orbit_pass: Option<String>,
    pub raw_bands: BTreeMap<String, Array2<f32>>,
    /// Change highlight triple, filled in by [`crate::change::annotate_scene`].
    pub derived_bands: Option<BandTriple>,
    /// Position in time-ascending order; contiguous from 0 within a run.
    pub sequence_index: usize,
}

impl SceneRecord {
    /// Fails with `InvalidTimestamp` when the acquisition time is outside chrono's range.
    pub fn from_descriptor(descriptor: SceneDescriptor, sequence_index: usize) -> Result<Self> {
        let SceneDescriptor { metadata, bands } = descriptor;
        let acquired = DateTime::from_timestamp_millis(metadata.timestamp_millis).ok_or_else(
            || SarveilError::InvalidTimestamp {
                scene_id: metadata.id.clone(),
                timestamp_millis: metadata.timestamp_millis,
            },
        )?;
        let platform = metadata.text(PROP_PLATFORM_NUMBER).map(str::to_string);
        let orbit_pass = metadata.text(PROP_ORBIT_PASS).map(str::to_string);
        Ok(Self {
            id: metadata.id,
            timestamp_millis: metadata.timestamp_millis,
            acquired,
            footprint: metadata.footprint,
            platform,
            orbit_pass,
            raw_bands: bands,
            derived_bands: None,
            sequence_index,
        })
    }

    pub fn band(&self, name: &str) -> Result<&Array2<f32>> {
        self.raw_bands
            .get(name)
            .ok_or_else(|| SarveilError::MissingBand {
                scene_id: self.id.clone(),
                band: name.to_string(),
            })
    }

    pub fn acquired(&self) -> DateTime<Utc> {
        self.acquired
    }

    /// UTC acquisition date as `YYYY-MM-DD`.
    pub fn date_label(&self) -> String {
        self.acquired().format("%Y-%m-%d").to_string()
    }

    /// Platform and pass label, e.g. `S-1A / ASCENDING`, when the catalog provided both parts.
    pub fn platform_label(&self) -> Option<String> {
        match (&self.platform, &self.orbit_pass) {
            (Some(platform), Some(pass)) => Some(format!("S-1{platform} / {pass}")),
            (Some(platform), None) => Some(format!("S-1{platform}")),
            (None, Some(pass)) => Some(pass.clone()),
            (None, None) => None,
        }
    }
}

/// The optical scene chosen as static background for every frame.
#[derive(Clone, Debug)]
pub struct BasemapRecord {
    pub scene: SceneRecord,
    /// Lookback (days) of the window in which the scene was found.
    pub search_window_days: i64,
    pub cloud_percentage: Option<f64>,
}
