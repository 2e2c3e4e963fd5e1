//! Integration tests: command dispatch → render → rasterize, through the
//! public API only.

use graphcalc::export::{rasterize, render_view_to_png};
use graphcalc::graph::{
    label_interval, Command, GraphRenderer, GraphView, Point, RenderPrimitive, Theme, Transform,
    ViewState, Viewport,
};
use graphcalc::lang::{evaluate, Evaluator, PointEvaluator};

fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0)
}

fn curves(prims: &[RenderPrimitive]) -> usize {
    prims.iter().filter(|p| p.is_polyline()).count()
}

#[test]
fn test_evaluate_samples() {
    assert_eq!(
        evaluate("x**2", &[-2.0, -1.0, 0.0, 1.0, 2.0]),
        vec![Some(4.0), Some(1.0), Some(0.0), Some(1.0), Some(4.0)]
    );
    assert_eq!(evaluate("1/x", &[-1.0, 0.0, 1.0]), vec![Some(-1.0), None, Some(1.0)]);
    assert_eq!(evaluate("sqrt(x)", &[-1.0, 0.0, 4.0]), vec![None, Some(0.0), Some(2.0)]);
    assert_eq!(evaluate("import os", &[1.0, 2.0]), vec![None, None]);
}

#[test]
fn test_evaluator_trait_object() {
    let mut evaluator = Evaluator::new();
    let dyn_eval: &mut dyn PointEvaluator = &mut evaluator;
    assert_eq!(
        dyn_eval.evaluate_points("2x + 1", &[0.0, 1.0]).unwrap(),
        vec![Some(1.0), Some(3.0)]
    );
    assert!(dyn_eval.evaluate_points("__import__('os')", &[0.0]).is_err());
}

#[test]
fn test_label_intervals() {
    assert_eq!(label_interval(50.0), 2.0);
    assert_eq!(label_interval(5.0), 20.0);
}

#[test]
fn test_transform_roundtrip_after_commands() {
    let mut view = GraphView::new();
    for command in [
        Command::ZoomIn,
        Command::PanLeft,
        Command::Scroll { delta_y: 3.0 },
        Command::PanStart,
        Command::PanUpdate { dx: -17.0, dy: 44.0 },
        Command::PanEnd,
    ] {
        view.dispatch(command);
    }
    let t = Transform::new(view.state(), viewport());
    let p = Point::new(3.25, -1.5);
    let back = t.to_math(t.to_screen(p));
    assert!((back.x - p.x).abs() < 1e-9);
    assert!((back.y - p.y).abs() < 1e-9);
}

#[test]
fn test_pan_is_invertible_through_commands() {
    let mut view = GraphView::new();
    view.dispatch(Command::PanUpdate { dx: 42.0, dy: -8.0 });
    view.dispatch(Command::PanUpdate { dx: -42.0, dy: 8.0 });
    view.dispatch(Command::PanUp);
    view.dispatch(Command::PanDown);
    view.dispatch(Command::PanLeft);
    view.dispatch(Command::PanRight);
    assert_eq!((view.state().offset_x, view.state().offset_y), (0.0, 0.0));
}

#[test]
fn test_multiple_expressions_render_in_order() {
    let mut view = GraphView::new();
    view.dispatch(Command::AddExpression("sin(x)".into()));
    view.dispatch(Command::AddExpression("np.cos(x)".into()));
    view.dispatch(Command::AddExpression("not valid (".into()));
    let prims = view.render(viewport());
    assert_eq!(curves(&prims), 3);

    let theme = Theme::light();
    let colors: Vec<_> = prims
        .iter()
        .filter_map(|p| match p {
            RenderPrimitive::Polyline { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(
        colors,
        vec![theme.series_color(0), theme.series_color(1), theme.series_color(2)]
    );
}

#[test]
fn test_failing_expression_keeps_grid() {
    let state = {
        let mut s = ViewState::new();
        s.set_expression("undefined_fn(x)");
        s
    };
    let prims = GraphRenderer::new().render(&state, viewport(), false, &mut Evaluator::new());
    assert_eq!(curves(&prims), 0);
    assert!(prims
        .iter()
        .any(|p| matches!(p, RenderPrimitive::Line { .. })));
    assert!(prims.iter().any(|p| p.text() == Some("x")));
}

#[test]
fn test_unsized_view_renders_nothing() {
    let mut view = GraphView::new();
    assert!(view.render(Viewport::new(0.0, 0.0)).is_empty());
    let png = rasterize(&view.render(Viewport::new(0.0, 0.0)), 10, 10, Theme::light().background)
        .unwrap();
    assert_eq!(&png.png_bytes[1..4], b"PNG");
}

#[test]
fn test_export_png() {
    let mut view = GraphView::new();
    view.dispatch(Command::SetExpression("sin(x) * 3".into()));
    view.dispatch(Command::ToggleDarkMode);
    let graph = render_view_to_png(&mut view, 320, 240).unwrap();
    assert_eq!((graph.width, graph.height), (320, 240));
    assert_eq!(&graph.png_bytes[1..4], b"PNG");
}
