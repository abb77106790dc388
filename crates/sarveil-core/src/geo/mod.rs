pub mod region;
pub mod window;

pub use region::{resolve_region, BoundingBox, FrameExtent, Region};
pub use window::DateWindow;
