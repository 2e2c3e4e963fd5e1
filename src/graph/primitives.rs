//! Draw primitives handed to the host canvas.

use crate::graph::transform::ScreenPoint;

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

/// One drawable unit. Later primitives paint over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPrimitive {
    /// Straight stroke: grid lines, axes, ticks.
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
        width: f64,
    },
    /// Connected stroke through `points`, one per continuous curve piece.
    Polyline {
        points: Vec<ScreenPoint>,
        color: Color,
        width: f64,
    },
    /// Text anchored at its top-left corner.
    Text {
        position: ScreenPoint,
        text: String,
        color: Color,
        size: f64,
        bold: bool,
    },
    /// Filled triangle (axis arrowheads).
    Triangle { points: [ScreenPoint; 3], color: Color },
}

impl RenderPrimitive {
    pub fn is_polyline(&self) -> bool {
        matches!(self, RenderPrimitive::Polyline { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RenderPrimitive::Text { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            RenderPrimitive::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
