//! Catalog searches: the widening basemap cascade and the SAR scene sequence.

pub mod basemap;
pub mod scenes;

pub use basemap::{basemap_query, find_basemap};
pub use scenes::{find_scenes, scene_query};
