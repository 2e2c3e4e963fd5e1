//! Rasterizes render primitives into PNG images.

pub mod raster;
pub mod types;

pub use raster::{rasterize, render_view_to_png};
pub use types::{RenderedGraph, MAX_IMAGE_DIMENSION};
