use thiserror::Error;

use crate::pipeline::PipelineStage;

#[derive(Error, Debug)]
pub enum SarveilError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate { lat: f64, lon: f64, reason: String },

    #[error("Invalid date window: {from} is not before {to}")]
    InvalidDateWindow { from: String, to: String },

    #[error("No cloud-free basemap found in {windows_tried} search window(s) below {threshold}% cloud cover")]
    BasemapUnavailable { windows_tried: usize, threshold: f64 },

    #[error("No SAR scenes found between {window} ({query})")]
    NoScenesFound { window: String, query: String },

    #[error("Empty frame set: nothing to assemble")]
    EmptyFrameSet,

    #[error("Frame order violated at position {position}: expected sequence index {expected}, found {found}")]
    FrameOrder {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("Scene {scene_id} is missing band {band}")]
    MissingBand { scene_id: String, band: String },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Scene {scene_id} has an unrepresentable timestamp {timestamp_millis} ms")]
    InvalidTimestamp {
        scene_id: String,
        timestamp_millis: i64,
    },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Catalog query failed during {stage}: {message} [{query}]")]
    UpstreamQueryFailed {
        stage: PipelineStage,
        query: String,
        message: String,
    },

    #[error("Catalog session has not been initialized")]
    CatalogNotInitialized,

    #[error("Catalog session is already initialized")]
    CatalogAlreadyInitialized,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Catalog manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, SarveilError>;
