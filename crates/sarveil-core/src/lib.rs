pub mod catalog;
pub mod change;
pub mod consts;
pub mod error;
pub mod geo;
pub mod io;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod search;
pub mod sequence;
