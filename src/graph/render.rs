//! Builds the draw primitives for one frame of the graph.
//!
//! Paint order: major grid, minor grid, axes, arrowheads, axis labels, ticks
//! with their labels, then one polyline per continuous piece of each curve.

use std::ops::RangeInclusive;

use crate::graph::primitives::{Color, RenderPrimitive};
use crate::graph::state::ViewState;
use crate::graph::theme::Theme;
use crate::graph::transform::{Point, ScreenPoint, Transform, Viewport};
use crate::lang::PointEvaluator;

/// Samples taken across the visible x-range for every curve.
pub const DEFAULT_SAMPLES: usize = 400;
/// Lines further than this outside the viewport are culled.
pub const CULL_MARGIN_PX: f64 = 10.0;
/// Desired on-screen distance between numeric axis labels.
pub const TARGET_LABEL_SPACING_PX: f64 = 80.0;
/// Grid lines packed tighter than this are not drawn at all.
pub const MIN_GRID_SPACING_PX: f64 = 4.0;

const AXIS_WIDTH: f64 = 2.0;
const TICK_WIDTH: f64 = 1.0;
const TICK_HALF_LENGTH: f64 = 5.0;
const CURVE_WIDTH: f64 = 3.0;
const ARROW_SIZE: f64 = 10.0;
const AXIS_LABEL_SIZE: f64 = 12.0;
const TICK_LABEL_SIZE: f64 = 10.0;

/// Largest integer grid coordinate iterated exactly.
const MAX_GRID_COORD: f64 = 9_007_199_254_740_992.0; // 2^53

/// Spacing in math units between numeric axis labels at `scale`.
///
/// Starts at 2 and escalates 2 → 5 → 10 → 20 → 30 → ... until neighbouring
/// labels are at least [`TARGET_LABEL_SPACING_PX`] apart.
pub fn label_interval(scale: f64) -> f64 {
    let fits = |interval: f64| interval * scale >= TARGET_LABEL_SPACING_PX;
    for interval in [2.0, 5.0, 10.0] {
        if fits(interval) {
            return interval;
        }
    }
    // Past 10 the interval grows in steps of ten: jump to the first that fits
    let mut tens = (TARGET_LABEL_SPACING_PX / (10.0 * scale)).ceil().max(2.0);
    while !fits(tens * 10.0) {
        tens += 1.0;
    }
    tens * 10.0
}

/// `count` evenly spaced values from `min` to `max`, both ends included.
pub fn sample_points(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Stateless frame builder; holds only drawing parameters.
#[derive(Debug, Clone)]
pub struct GraphRenderer {
    samples: usize,
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(samples: usize) -> Self {
        Self { samples }
    }

    /// Produce every primitive for `state` drawn into `viewport`.
    ///
    /// An unsized viewport yields nothing. With `skip_curves` the grid,
    /// axes and labels are still built but no expression is evaluated.
    pub fn render(
        &self,
        state: &ViewState,
        viewport: Viewport,
        skip_curves: bool,
        evaluator: &mut dyn PointEvaluator,
    ) -> Vec<RenderPrimitive> {
        if !viewport.is_sized() {
            log::debug!(
                "skipping render into unsized viewport {}x{}",
                viewport.width,
                viewport.height
            );
            return Vec::new();
        }

        let theme = Theme::for_mode(state.dark_mode);
        let transform = Transform::new(state, viewport);
        let mut out = Vec::new();

        self.draw_grid(&transform, &theme, state.show_minor_grid, &mut out);
        self.draw_axes(&transform, &theme, &mut out);
        self.draw_ticks(&transform, &theme, &mut out);
        if !skip_curves {
            self.draw_curves(state, &transform, &theme, evaluator, &mut out);
        }
        out
    }

    fn draw_grid(
        &self,
        transform: &Transform,
        theme: &Theme,
        show_minor: bool,
        out: &mut Vec<RenderPrimitive>,
    ) {
        let viewport = transform.viewport();
        let visible = transform.visible_range();
        let scale = transform.scale();

        // One unit of padding on each side
        let (Some(xs), Some(ys)) = (
            padded_units(visible.x_min, visible.x_max),
            padded_units(visible.y_min, visible.y_max),
        ) else {
            return;
        };

        let mut passes = Vec::with_capacity(2);
        if 2.0 * scale >= MIN_GRID_SPACING_PX {
            passes.push((0, theme.grid, theme.grid_width));
        }
        if show_minor && scale >= MIN_GRID_SPACING_PX {
            passes.push((1, theme.minor_grid, theme.minor_grid_width));
        }

        for (parity, color, width) in passes {
            for x in units_with_parity(xs.clone(), parity) {
                let sx = transform.to_screen(Point::new(x as f64, 0.0)).x;
                if in_bounds(sx, viewport.width) {
                    out.push(RenderPrimitive::Line {
                        from: ScreenPoint::new(sx, 0.0),
                        to: ScreenPoint::new(sx, viewport.height),
                        color,
                        width,
                    });
                }
            }
            for y in units_with_parity(ys.clone(), parity) {
                let sy = transform.to_screen(Point::new(0.0, y as f64)).y;
                if in_bounds(sy, viewport.height) {
                    out.push(RenderPrimitive::Line {
                        from: ScreenPoint::new(0.0, sy),
                        to: ScreenPoint::new(viewport.width, sy),
                        color,
                        width,
                    });
                }
            }
        }
    }

    fn draw_axes(&self, transform: &Transform, theme: &Theme, out: &mut Vec<RenderPrimitive>) {
        let viewport = transform.viewport();
        let origin = transform.origin();
        let (cx, cy) = (origin.x, origin.y);

        out.push(RenderPrimitive::Line {
            from: ScreenPoint::new(0.0, cy),
            to: ScreenPoint::new(viewport.width, cy),
            color: theme.axis,
            width: AXIS_WIDTH,
        });
        out.push(RenderPrimitive::Line {
            from: ScreenPoint::new(cx, 0.0),
            to: ScreenPoint::new(cx, viewport.height),
            color: theme.axis,
            width: AXIS_WIDTH,
        });

        // Arrowheads sit at the viewport edge, not at any math coordinate
        let half = ARROW_SIZE / 2.0;
        let x_tip = ScreenPoint::new(viewport.width - 10.0, cy);
        out.push(RenderPrimitive::Triangle {
            points: [
                ScreenPoint::new(x_tip.x - ARROW_SIZE, cy - half),
                x_tip,
                ScreenPoint::new(x_tip.x - ARROW_SIZE, cy + half),
            ],
            color: theme.axis,
        });
        let y_tip = ScreenPoint::new(cx, 2.0);
        out.push(RenderPrimitive::Triangle {
            points: [
                ScreenPoint::new(cx - half, y_tip.y + ARROW_SIZE),
                y_tip,
                ScreenPoint::new(cx + half, y_tip.y + ARROW_SIZE),
            ],
            color: theme.axis,
        });

        out.push(text(
            ScreenPoint::new(x_tip.x - ARROW_SIZE - 15.0, cy - 15.0),
            "x",
            theme.text,
            AXIS_LABEL_SIZE,
            true,
        ));
        out.push(text(
            ScreenPoint::new(cx + 5.0, y_tip.y - 10.0),
            "y",
            theme.text,
            AXIS_LABEL_SIZE,
            true,
        ));
        out.push(text(
            ScreenPoint::new(cx - 10.0, cy + 10.0),
            "0",
            theme.text,
            TICK_LABEL_SIZE,
            false,
        ));
    }

    fn draw_ticks(&self, transform: &Transform, theme: &Theme, out: &mut Vec<RenderPrimitive>) {
        let viewport = transform.viewport();
        let visible = transform.visible_range();
        let origin = transform.origin();
        let interval = label_interval(transform.scale());

        if let Some(steps) = interval_steps(visible.x_min, visible.x_max, interval) {
            for n in steps.filter(|n| *n != 0) {
                let value = n as f64 * interval;
                let sx = transform.to_screen(Point::new(value, 0.0)).x;
                if !in_bounds(sx, viewport.width) {
                    continue;
                }
                out.push(RenderPrimitive::Line {
                    from: ScreenPoint::new(sx, origin.y - TICK_HALF_LENGTH),
                    to: ScreenPoint::new(sx, origin.y + TICK_HALF_LENGTH),
                    color: theme.axis,
                    width: TICK_WIDTH,
                });
                out.push(text(
                    ScreenPoint::new(sx - 5.0, origin.y + 10.0),
                    &format_label(value),
                    theme.text,
                    TICK_LABEL_SIZE,
                    false,
                ));
            }
        }

        if let Some(steps) = interval_steps(visible.y_min, visible.y_max, interval) {
            for n in steps.filter(|n| *n != 0) {
                let value = n as f64 * interval;
                let sy = transform.to_screen(Point::new(0.0, value)).y;
                if !in_bounds(sy, viewport.height) {
                    continue;
                }
                out.push(RenderPrimitive::Line {
                    from: ScreenPoint::new(origin.x - TICK_HALF_LENGTH, sy),
                    to: ScreenPoint::new(origin.x + TICK_HALF_LENGTH, sy),
                    color: theme.axis,
                    width: TICK_WIDTH,
                });
                out.push(text(
                    ScreenPoint::new(origin.x - 20.0, sy + 5.0),
                    &format_label(value),
                    theme.text,
                    TICK_LABEL_SIZE,
                    false,
                ));
            }
        }
    }

    fn draw_curves(
        &self,
        state: &ViewState,
        transform: &Transform,
        theme: &Theme,
        evaluator: &mut dyn PointEvaluator,
        out: &mut Vec<RenderPrimitive>,
    ) {
        let visible = transform.visible_range();
        let xs = sample_points(visible.x_min, visible.x_max, self.samples);

        for (index, expr) in state.expressions().iter().enumerate() {
            let ys = match evaluator.evaluate_points(expr, &xs) {
                Ok(ys) => ys,
                Err(err) => {
                    log::warn!("skipping curve {:?}: {}", expr, err);
                    continue;
                }
            };

            let color = theme.series_color(index);
            for points in split_segments(transform, &xs, &ys) {
                out.push(RenderPrimitive::Polyline {
                    points,
                    color,
                    width: CURVE_WIDTH,
                });
            }
        }
    }
}

/// Split samples at undefined values into continuous screen-space runs.
fn split_segments(
    transform: &Transform,
    xs: &[f64],
    ys: &[Option<f64>],
) -> Vec<Vec<ScreenPoint>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for (&x, y) in xs.iter().zip(ys) {
        let projected = y
            .filter(|y| y.is_finite())
            .map(|y| transform.to_screen(Point::new(x, y)))
            .filter(|p| p.x.is_finite() && p.y.is_finite());
        match projected {
            Some(p) => current.push(p),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Integer grid coordinates covering `[min, max]` plus one unit each side.
fn padded_units(min: f64, max: f64) -> Option<RangeInclusive<i64>> {
    let lo = min.floor() - 1.0;
    let hi = max.ceil() + 1.0;
    if !lo.is_finite() || !hi.is_finite() || lo.abs() > MAX_GRID_COORD || hi.abs() > MAX_GRID_COORD
    {
        return None;
    }
    Some(lo as i64..=hi as i64)
}

/// Multiples `n` of `interval` with `n * interval` spanning `[min, max]`.
fn interval_steps(min: f64, max: f64, interval: f64) -> Option<RangeInclusive<i64>> {
    let lo = (min / interval).floor();
    let hi = (max / interval).ceil();
    if !lo.is_finite() || !hi.is_finite() || lo.abs() > MAX_GRID_COORD || hi.abs() > MAX_GRID_COORD
    {
        return None;
    }
    Some(lo as i64..=hi as i64)
}

/// Even (`parity == 0`) or odd (`parity == 1`) members of `range`.
fn units_with_parity(range: RangeInclusive<i64>, parity: i64) -> impl Iterator<Item = i64> {
    let (lo, hi) = range.into_inner();
    let start = if lo.rem_euclid(2) == parity { lo } else { lo + 1 };
    (start..=hi).step_by(2)
}

fn in_bounds(pos: f64, extent: f64) -> bool {
    (-CULL_MARGIN_PX..=extent + CULL_MARGIN_PX).contains(&pos)
}

fn format_label(value: f64) -> String {
    format!("{}", value.round() as i64)
}

fn text(position: ScreenPoint, content: &str, color: Color, size: f64, bold: bool) -> RenderPrimitive {
    RenderPrimitive::Text {
        position,
        text: content.to_string(),
        color,
        size,
        bold,
    }
}
