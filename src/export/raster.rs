/// Rasterizing pipeline: render primitives → RGB buffer → PNG bytes via plotters.

use crate::export::types::*;
use crate::graph::command::GraphView;
use crate::graph::primitives::{Color, RenderPrimitive};
use crate::graph::theme::Theme;
use crate::graph::transform::{ScreenPoint, Viewport};
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::Color as _;

/// Paint `primitives` in order onto a `width`×`height` canvas filled with
/// `background` and encode the result as PNG.
///
/// Text needs a font backend, which this build leaves out; text primitives
/// are counted in [`RenderedGraph::skipped_text`] instead of drawn.
pub fn rasterize(
    primitives: &[RenderPrimitive],
    width: u32,
    height: u32,
    background: Color,
) -> Result<RenderedGraph, String> {
    if width == 0 || height == 0 {
        return Err(format!("cannot rasterize an empty {}x{} image", width, height));
    }
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(format!(
            "image size {}x{} exceeds {}x{}",
            width, height, MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION
        ));
    }
    let mut buf = vec![0u8; (width as usize) * (height as usize) * 3];
    let mut skipped_text = 0;
    let (width_f, height_f) = (width as f64, height as f64);

    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        root.fill(&to_rgb(background))
            .map_err(|e| format!("fill: {}", e))?;

        for prim in primitives {
            match prim {
                RenderPrimitive::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    for path in clip_path(&[*from, *to], width_f, height_f) {
                        root.draw(&PathElement::new(path, stroke(*color, *width)))
                            .map_err(|e| format!("draw line: {}", e))?;
                    }
                }
                RenderPrimitive::Polyline {
                    points,
                    color,
                    width,
                } => {
                    for path in clip_path(points, width_f, height_f) {
                        root.draw(&PathElement::new(path, stroke(*color, *width)))
                            .map_err(|e| format!("draw polyline: {}", e))?;
                    }
                }
                RenderPrimitive::Triangle { points, color } => {
                    let coords: Vec<(i32, i32)> = points.iter().copied().map(to_px).collect();
                    root.draw(&Polygon::new(coords, to_rgba(*color).filled()))
                        .map_err(|e| format!("draw triangle: {}", e))?;
                }
                RenderPrimitive::Text { .. } => skipped_text += 1,
            }
        }

        root.present().map_err(|e| format!("present: {}", e))?;
    }

    if skipped_text > 0 {
        log::debug!("rasterize: skipped {} text primitives", skipped_text);
    }

    // Encode RGB buffer to PNG
    let png_bytes = encode_rgb_to_png(&buf, width, height)?;

    Ok(RenderedGraph {
        png_bytes,
        width,
        height,
        skipped_text,
    })
}

/// Render the current frame of `view` and rasterize it with its theme's background.
pub fn render_view_to_png(
    view: &mut GraphView,
    width: u32,
    height: u32,
) -> Result<RenderedGraph, String> {
    let primitives = view.render(Viewport::new(width as f64, height as f64));
    let background = Theme::for_mode(view.state().dark_mode).background;
    rasterize(&primitives, width, height, background)
}

/// Clip a connected path to the canvas plus [`CLIP_MARGIN_PX`], splitting it
/// where it leaves and re-enters.
fn clip_path(points: &[ScreenPoint], width: f64, height: f64) -> Vec<Vec<(i32, i32)>> {
    let bounds = (
        -CLIP_MARGIN_PX,
        -CLIP_MARGIN_PX,
        width + CLIP_MARGIN_PX,
        height + CLIP_MARGIN_PX,
    );
    let mut paths = Vec::new();
    let mut current: Vec<ScreenPoint> = Vec::new();

    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], bounds) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    flush_path(&mut current, &mut paths);
                    current.push(a);
                }
                current.push(b);
            }
            None => flush_path(&mut current, &mut paths),
        }
    }
    flush_path(&mut current, &mut paths);
    paths
}

fn flush_path(current: &mut Vec<ScreenPoint>, paths: &mut Vec<Vec<(i32, i32)>>) {
    if current.len() >= 2 {
        paths.push(current.iter().copied().map(to_px).collect());
    }
    current.clear();
}

/// Liang-Barsky clip of segment `p`-`q` to `(x_min, y_min, x_max, y_max)`.
fn clip_segment(
    p: ScreenPoint,
    q: ScreenPoint,
    (x_min, y_min, x_max, y_max): (f64, f64, f64, f64),
) -> Option<(ScreenPoint, ScreenPoint)> {
    let (dx, dy) = (q.x - p.x, q.y - p.y);
    if !(dx.is_finite() && dy.is_finite()) {
        return None;
    }
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (denom, dist) in [
        (-dx, p.x - x_min),
        (dx, x_max - p.x),
        (-dy, p.y - y_min),
        (dy, y_max - p.y),
    ] {
        if denom == 0.0 {
            if dist < 0.0 {
                return None;
            }
        } else {
            let t = dist / denom;
            if denom < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| {
        if t == 0.0 {
            p
        } else if t == 1.0 {
            q
        } else {
            ScreenPoint::new(p.x + t * dx, p.y + t * dy)
        }
    };
    Some((at(t0), at(t1)))
}

fn to_px(point: ScreenPoint) -> (i32, i32) {
    let clamp = |v: f64| {
        if v.is_nan() {
            0
        } else {
            v.clamp(-MAX_OVERDRAW_PX, MAX_OVERDRAW_PX).round() as i32
        }
    };
    (clamp(point.x), clamp(point.y))
}

fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn to_rgba(color: Color) -> RGBAColor {
    to_rgb(color).mix(color.a as f64 / 255.0)
}

fn stroke(color: Color, width: f64) -> ShapeStyle {
    to_rgba(color).stroke_width(width.round().max(1.0) as u32)
}

/// Encode a raw RGB pixel buffer to PNG.
fn encode_rgb_to_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, String> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder
        .write_image(rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| format!("PNG encode: {}", e))?;
    Ok(png)
}
