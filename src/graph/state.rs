//! View transform parameters, display toggles and the active expressions
//! of one graph view.

/// Pixels per math unit after a reset.
pub const DEFAULT_SCALE: f64 = 50.0;
/// Expression shown in a fresh view.
pub const DEFAULT_EXPRESSION: &str = "x**2";
/// Smallest scale `zoom_by` will produce.
pub const MIN_SCALE: f64 = 1e-9;
/// Largest scale `zoom_by` will produce.
pub const MAX_SCALE: f64 = 1e12;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Always finite and > 0.
    scale: f64,
    /// Pixel translation of the origin from the viewport center.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Insertion order, no duplicates.
    expressions: Vec<String>,
    pub show_minor_grid: bool,
    pub dark_mode: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
            expressions: vec![DEFAULT_EXPRESSION.to_string()],
            show_minor_grid: true,
            dark_mode: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default state at a custom scale. `None` unless `scale` is finite and positive.
    pub fn with_scale(scale: f64) -> Option<Self> {
        if scale.is_finite() && scale > 0.0 {
            Some(Self {
                scale,
                ..Self::default()
            })
        } else {
            None
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiply the scale by `factor` (> 1 zooms in). Factors that are not
    /// finite and positive are ignored; the result is kept within
    /// [`MIN_SCALE`, `MAX_SCALE`]. Returns whether the factor was applied.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("ignoring zoom factor {}", factor);
            return false;
        }
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        true
    }

    /// Restore scale and offsets. Expressions and toggles are kept.
    pub fn reset(&mut self) {
        self.scale = DEFAULT_SCALE;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Append `expr` unless an identical string is already present.
    /// Blank input is ignored. Returns whether the list changed.
    pub fn add_expression(&mut self, expr: &str) -> bool {
        if expr.trim().is_empty() || self.contains_expression(expr) {
            return false;
        }
        self.expressions.push(expr.to_string());
        true
    }

    /// Remove `expr` by string equality. Returns whether it was present.
    pub fn remove_expression(&mut self, expr: &str) -> bool {
        let before = self.expressions.len();
        self.expressions.retain(|e| e != expr);
        self.expressions.len() != before
    }

    /// Replace all expressions with `expr`. Blank input is ignored.
    pub fn set_expression(&mut self, expr: &str) -> bool {
        if expr.trim().is_empty() {
            return false;
        }
        self.expressions = vec![expr.to_string()];
        true
    }

    pub fn contains_expression(&self, expr: &str) -> bool {
        self.expressions.iter().any(|e| e == expr)
    }

    pub fn toggle_minor_grid(&mut self) {
        self.show_minor_grid = !self.show_minor_grid;
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }
}
