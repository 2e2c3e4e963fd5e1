//! Graph view: state, coordinate transform, render primitives and the
//! command dispatcher tying them to host input.

pub mod command;
pub mod primitives;
pub mod render;
pub mod state;
pub mod theme;
pub mod transform;

pub use command::{Command, Controls, GraphView};
pub use primitives::{Color, RenderPrimitive};
pub use render::{label_interval, GraphRenderer};
pub use state::ViewState;
pub use theme::Theme;
pub use transform::{Point, ScreenPoint, Transform, Viewport, VisibleRange};
