//! Frame rendering: rasterize band layers, composite them over the frame extent
//! and annotate the result.

pub mod annotate;
pub mod compose;
pub mod frame;
pub mod rasterize;

pub use annotate::{Annotator, HeaderText};
pub use compose::{draw_progress_bar, MapArea, ProgressBarGeometry};
pub use frame::{output_identifier, progress_fraction, FrameArtifact, FrameRenderer, LayerKind};
pub use rasterize::{LayerBands, LayerRasterizer, LayerRequest, LinearRasterizer, VisParams};
