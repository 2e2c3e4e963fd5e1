/// Rendered graph output types.

/// Largest accepted image width or height in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// Paths are clipped this many pixels outside the image before rasterizing.
pub const CLIP_MARGIN_PX: f64 = 16.0;
/// Remaining coordinates (triangle corners) are clamped to this range.
pub const MAX_OVERDRAW_PX: f64 = 1_000_000.0;

/// A rendered graph image.
#[derive(Debug, Clone)]
pub struct RenderedGraph {
    pub png_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Text primitives that could not be drawn.
    pub skipped_text: usize,
}
