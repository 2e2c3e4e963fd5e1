//! Host input events and the view that applies them.

use crate::graph::primitives::RenderPrimitive;
use crate::graph::render::GraphRenderer;
use crate::graph::state::ViewState;
use crate::graph::transform::Viewport;
use crate::lang::Evaluator;
use crate::persistence::config::Config;

/// One user intent, already decoded from the host's raw input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pointer pressed on the canvas.
    PanStart,
    /// Pointer moved by `(dx, dy)` pixels since the last update.
    PanUpdate { dx: f64, dy: f64 },
    /// Pointer released.
    PanEnd,
    /// Scroll wheel; negative `delta_y` zooms in.
    Scroll { delta_y: f64 },
    SetExpression(String),
    AddExpression(String),
    RemoveExpression(String),
    ToggleMinorGrid,
    ToggleDarkMode,
    Reset,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    ZoomIn,
    ZoomOut,
}

/// Step sizes and factors used when applying commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub pan_step: f64,
    pub zoom_in: f64,
    pub zoom_out: f64,
    pub scroll_zoom_in: f64,
    pub scroll_zoom_out: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Controls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pan_step: config.pan_step,
            zoom_in: config.zoom_in,
            zoom_out: config.zoom_out,
            scroll_zoom_in: config.scroll_zoom_in,
            scroll_zoom_out: config.scroll_zoom_out,
        }
    }
}

/// A graph view: state, renderer, compiled-expression cache and drag tracking.
pub struct GraphView {
    state: ViewState,
    renderer: GraphRenderer,
    evaluator: Evaluator,
    controls: Controls,
    dragging: bool,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphView {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        let mut state = ViewState::new();
        state.show_minor_grid = config.show_minor_grid;
        state.dark_mode = config.dark_mode;
        Self {
            state,
            renderer: GraphRenderer::with_samples(config.samples),
            evaluator: Evaluator::with_capacity(config.cache_capacity),
            controls: Controls::from_config(config),
            dragging: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Apply one command to the view state.
    pub fn dispatch(&mut self, command: Command) {
        log::trace!("dispatch {:?}", command);
        let step = self.controls.pan_step;
        match command {
            Command::PanStart => self.dragging = true,
            Command::PanUpdate { dx, dy } => self.state.pan_by(dx, dy),
            Command::PanEnd => self.dragging = false,
            Command::Scroll { delta_y } => {
                let factor = if delta_y < 0.0 {
                    self.controls.scroll_zoom_in
                } else {
                    self.controls.scroll_zoom_out
                };
                self.state.zoom_by(factor);
            }
            Command::SetExpression(expr) => {
                self.state.set_expression(&expr);
            }
            Command::AddExpression(expr) => {
                self.state.add_expression(&expr);
            }
            Command::RemoveExpression(expr) => {
                self.state.remove_expression(&expr);
            }
            Command::ToggleMinorGrid => self.state.toggle_minor_grid(),
            Command::ToggleDarkMode => self.state.toggle_dark_mode(),
            Command::Reset => self.state.reset(),
            Command::PanUp => self.state.pan_by(0.0, step),
            Command::PanDown => self.state.pan_by(0.0, -step),
            Command::PanLeft => self.state.pan_by(-step, 0.0),
            Command::PanRight => self.state.pan_by(step, 0.0),
            Command::ZoomIn => {
                self.state.zoom_by(self.controls.zoom_in);
            }
            Command::ZoomOut => {
                self.state.zoom_by(self.controls.zoom_out);
            }
        }
    }

    /// Primitives for the current state. Curves are left out mid-drag.
    pub fn render(&mut self, viewport: Viewport) -> Vec<RenderPrimitive> {
        self.renderer
            .render(&self.state, viewport, self.dragging, &mut self.evaluator)
    }
}
