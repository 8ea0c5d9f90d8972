// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared drawing routines for series and bars.

use crate::math::to_px;
use crate::{BoundedValuesProvider, Bounds, Range, Renderer, Style, ValuesProvider};

/// Fills and strokes the outline of `b`.
pub fn draw_box(r: &mut dyn Renderer, b: Bounds, style: &Style) {
    style.write_drawing_to_renderer(r);
    r.move_to(b.left, b.top);
    r.line_to(b.right, b.top);
    r.line_to(b.right, b.bottom);
    r.line_to(b.left, b.bottom);
    r.line_to(b.left, b.top);
    r.close();
    r.fill_stroke();
}

/// Draws a chart title centered horizontally, with its top edge at `top`.
pub(crate) fn draw_title(r: &mut dyn Renderer, title: &str, style: &Style, chart_width: i32, top: i32) {
    style.write_text_to_renderer(r);
    let tb = r.measure_text(title);
    let x = (chart_width >> 1) - (tb.width() >> 1);
    r.text(title, x, top + tb.height());
}

fn point(canvas: Bounds, x: &Range, y: &Range, vx: f64, vy: f64) -> (i32, i32) {
    (canvas.left + x.translate(vx), canvas.bottom - y.translate(vy))
}

/// Draws a polyline through `vs`, with an optional area fill down to zero
/// and optional dots.
///
/// The fill is drawn only when the style also has a visible stroke.
pub fn draw_line_series(
    r: &mut dyn Renderer,
    canvas: Bounds,
    x: &Range,
    y: &Range,
    style: &Style,
    vs: &dyn ValuesProvider,
) {
    if vs.is_empty() {
        return;
    }
    let points: Vec<(i32, i32)> = (0..vs.len())
        .map(|i| {
            let (vx, vy) = vs.values(i);
            point(canvas, x, y, vx, vy)
        })
        .collect();
    let (x0, y0) = points[0];

    if style.should_draw_stroke() && style.should_draw_fill() {
        let floor = canvas.bottom.min(canvas.bottom - y.translate(0.0));
        let fill = Style {
            fill_color: style.fill_color,
            ..Style::default()
        };
        fill.write_drawing_to_renderer(r);
        r.move_to(x0, y0);
        for &(px, py) in &points[1..] {
            r.line_to(px, py);
        }
        let (xn, _) = points[points.len() - 1];
        r.line_to(xn, floor);
        r.line_to(x0, floor);
        r.line_to(x0, y0);
        r.fill();
    }

    if style.should_draw_stroke() {
        style.write_stroke_to_renderer(r);
        r.move_to(x0, y0);
        for &(px, py) in &points[1..] {
            r.line_to(px, py);
        }
        r.stroke();
    }

    if style.should_draw_dot() {
        let dots = Style {
            stroke_color: style.dot_color,
            fill_color: style.dot_color,
            stroke_width: Some(1.0),
            ..Style::default()
        };
        dots.write_drawing_to_renderer(r);
        let radius = style.dot_width.unwrap_or_default();
        for &(px, py) in &points {
            r.circle(radius, px, py);
            r.fill_stroke();
        }
    }
}

/// Draws a closed ribbon along the upper values then back along the lower.
///
/// Indexes up to `draw_offset` are skipped on the upper edge and excluded
/// from the lower edge, which hides a warm-up window.
pub fn draw_bounded_series(
    r: &mut dyn Renderer,
    canvas: Bounds,
    x: &Range,
    y: &Range,
    style: &Style,
    bvs: &dyn BoundedValuesProvider,
    draw_offset: usize,
) {
    if bvs.is_empty() {
        return;
    }
    let triples: Vec<(f64, f64, f64)> = (0..bvs.len()).map(|i| bvs.bounded_values(i)).collect();

    style.write_drawing_to_renderer(r);
    let (v0x, v0y1, _) = triples[0];
    let (x0, y0) = point(canvas, x, y, v0x, v0y1);
    r.move_to(x0, y0);
    for (i, &(vx, vy1, _)) in triples.iter().enumerate().skip(1) {
        let (px, py) = point(canvas, x, y, vx, vy1);
        if i > draw_offset {
            r.line_to(px, py);
        } else {
            r.move_to(px, py);
        }
    }
    let start = draw_offset.min(triples.len() - 1);
    for &(vx, _, vy2) in triples[start..].iter().rev() {
        let (px, py) = point(canvas, x, y, vx, vy2);
        r.line_to(px, py);
    }
    r.close();
    r.fill_stroke();
}

/// Draws one bar per value, from zero to the value, centered on its x.
///
/// Bars default to the canvas width divided by the number of values.
pub fn draw_histogram_series(
    r: &mut dyn Renderer,
    canvas: Bounds,
    x: &Range,
    y: &Range,
    style: &Style,
    vs: &dyn ValuesProvider,
    bar_width: Option<i32>,
) {
    if vs.is_empty() {
        return;
    }
    let width = bar_width.unwrap_or_else(|| to_px((f64::from(x.domain()) / vs.len() as f64).floor()));
    let half = width >> 1;
    let y0 = y.translate(0.0);
    for i in 0..vs.len() {
        let (vx, vy) = vs.values(i);
        let px = canvas.left + x.translate(vx);
        let b = Bounds::new(canvas.bottom - y0, px - half, px + half, canvas.bottom - y.translate(vy));
        draw_box(r, b, style);
    }
}
