//! Mapping between math coordinates and screen pixels.
//!
//! Screen y grows downward, math y grows upward. The math origin sits at the
//! viewport center shifted by the pan offsets.

use crate::graph::state::ViewState;

/// Drawable canvas size in pixels, supplied by the host on every render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the host has laid the canvas out yet.
    pub fn is_sized(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A point in math space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in screen space (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Math-space rectangle currently mapped onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Transform for one render: a view state paired with a viewport.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    viewport: Viewport,
}

impl Transform {
    pub fn new(state: &ViewState, viewport: Viewport) -> Self {
        Self {
            scale: state.scale(),
            offset_x: state.offset_x,
            offset_y: state.offset_y,
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Map a math point to screen pixels.
    pub fn to_screen(&self, point: Point) -> ScreenPoint {
        ScreenPoint::new(
            self.viewport.width / 2.0 + self.offset_x + point.x * self.scale,
            self.viewport.height / 2.0 + self.offset_y - point.y * self.scale,
        )
    }

    /// Inverse of [`Transform::to_screen`].
    pub fn to_math(&self, point: ScreenPoint) -> Point {
        Point::new(
            (point.x - self.viewport.width / 2.0 - self.offset_x) / self.scale,
            (self.viewport.height / 2.0 + self.offset_y - point.y) / self.scale,
        )
    }

    /// Screen position of the math origin.
    pub fn origin(&self) -> ScreenPoint {
        self.to_screen(Point::new(0.0, 0.0))
    }

    /// Inverse image of the viewport rectangle.
    pub fn visible_range(&self) -> VisibleRange {
        let half_w = self.viewport.width / 2.0;
        let half_h = self.viewport.height / 2.0;
        VisibleRange {
            x_min: -(half_w + self.offset_x) / self.scale,
            x_max: (half_w - self.offset_x) / self.scale,
            y_min: -(half_h - self.offset_y) / self.scale,
            y_max: (half_h + self.offset_y) / self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panned_state(scale: f64, dx: f64, dy: f64) -> ViewState {
        let mut state = ViewState::with_scale(scale).unwrap();
        state.pan_by(dx, dy);
        state
    }

    #[test]
    fn test_origin_is_viewport_center_by_default() {
        let t = Transform::new(&ViewState::default(), Viewport::new(800.0, 600.0));
        assert_eq!(t.origin(), ScreenPoint::new(400.0, 300.0));
        assert_eq!(t.to_screen(Point::new(1.0, 1.0)), ScreenPoint::new(450.0, 250.0));
    }

    #[test]
    fn test_roundtrip() {
        let cases = [
            (50.0, 0.0, 0.0, 1.5, -2.25),
            (0.37, 1234.0, -87.5, -300.0, 42.0),
            (1e6, -3.0, 9.0, 1e-4, -7e-5),
            (12.5, -1e5, 1e5, 8000.0, -8000.0),
        ];
        for (scale, dx, dy, x, y) in cases {
            let t = Transform::new(&panned_state(scale, dx, dy), Viewport::new(1024.0, 768.0));
            let back = t.to_math(t.to_screen(Point::new(x, y)));
            let tol = 1e-9 * (1.0 + x.abs().max(y.abs()));
            assert!((back.x - x).abs() < tol, "x: {} vs {}", back.x, x);
            assert!((back.y - y).abs() < tol, "y: {} vs {}", back.y, y);
        }
    }

    #[test]
    fn test_visible_range_maps_to_viewport_corners() {
        let t = Transform::new(&panned_state(40.0, 30.0, -20.0), Viewport::new(800.0, 600.0));
        let r = t.visible_range();
        let top_left = t.to_screen(Point::new(r.x_min, r.y_max));
        let bottom_right = t.to_screen(Point::new(r.x_max, r.y_min));
        assert!(top_left.x.abs() < 1e-9 && top_left.y.abs() < 1e-9);
        assert!((bottom_right.x - 800.0).abs() < 1e-9);
        assert!((bottom_right.y - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_panning_right_reveals_negative_x() {
        let t = Transform::new(&panned_state(50.0, 100.0, 0.0), Viewport::new(800.0, 600.0));
        let r = t.visible_range();
        assert_eq!(r.x_min, -10.0);
        assert_eq!(r.x_max, 6.0);
    }

    #[test]
    fn test_unsized_viewports() {
        assert!(Viewport::new(800.0, 600.0).is_sized());
        assert!(!Viewport::new(0.0, 600.0).is_sized());
        assert!(!Viewport::new(800.0, -1.0).is_sized());
        assert!(!Viewport::new(f64::NAN, 600.0).is_sized());
    }
}
