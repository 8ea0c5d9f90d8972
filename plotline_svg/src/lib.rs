// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An SVG backend for Plotline charts.
//!
//! [`SvgRenderer`] accumulates the primitives a chart issues into SVG
//! elements and writes one standalone `<svg>` document on `save`. Paths are
//! built with [`kurbo`], so arcs are flattened into cubic Béziers the same way
//! any other kurbo consumer would see them. Text is measured through a
//! [`TextMeasurer`], which keeps layout and output in agreement.

use core::fmt::Write as _;
use std::io;

use kurbo::{Arc, BezPath, Circle, Point, Shape, Vec2};
use peniko::Color;
use plotline_charts::{Bounds, ChartError, DEFAULT_DPI, FontFamily, Renderer, radians_to_degrees};
use plotline_text::{TextMeasurer, TextStyle};
use tracing::debug;

/// Flattening tolerance for arcs and circles, in pixels.
const TOLERANCE: f64 = 0.1;

/// Returns a provider that creates [`SvgRenderer`]s measuring text with
/// `measurer`.
///
/// Creating a renderer fails for non-positive sizes.
pub fn svg_provider<M: TextMeasurer + Clone>(
    measurer: M,
) -> impl Fn(i32, i32) -> Result<SvgRenderer<M>, ChartError> {
    move |width, height| SvgRenderer::new(width, height, measurer.clone())
}

/// A [`Renderer`] that writes SVG.
pub struct SvgRenderer<M> {
    width: i32,
    height: i32,
    dpi: f64,
    measurer: M,
    path: BezPath,
    stroke_color: Color,
    stroke_width: f64,
    stroke_dash_array: Vec<f64>,
    fill_color: Color,
    font: FontFamily,
    font_size: f64,
    font_color: Color,
    text_rotation: Option<f64>,
    body: String,
}

impl<M> core::fmt::Debug for SvgRenderer<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SvgRenderer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dpi", &self.dpi)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

impl<M: TextMeasurer> SvgRenderer<M> {
    /// Creates an empty drawing of the given size.
    pub fn new(width: i32, height: i32, measurer: M) -> Result<Self, ChartError> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::Renderer(format!(
                "invalid svg size {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            dpi: DEFAULT_DPI,
            measurer,
            path: BezPath::new(),
            stroke_color: Color::TRANSPARENT,
            stroke_width: 0.0,
            stroke_dash_array: Vec::new(),
            fill_color: Color::TRANSPARENT,
            font: FontFamily::default(),
            font_size: 10.0,
            font_color: Color::TRANSPARENT,
            text_rotation: None,
            body: String::new(),
        })
    }

    /// The complete document for everything drawn so far.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 160);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        out.push('\n');
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    /// Font size in pixels after DPI scaling.
    fn scaled_font_size(&self) -> f64 {
        self.font_size * self.dpi / DEFAULT_DPI
    }

    fn text_style(&self) -> TextStyle {
        TextStyle::new(self.scaled_font_size()).with_family(self.font.clone())
    }

    fn flush_path(&mut self, fill: bool, stroke: bool) {
        if self.path.elements().is_empty() {
            return;
        }
        let _ = write!(self.body, r#"<path d="{}""#, self.path.to_svg());
        if fill {
            write_paint_attr(&mut self.body, "fill", self.fill_color);
        } else {
            self.body.push_str(r#" fill="none""#);
        }
        if stroke && self.stroke_width > 0.0 {
            write_paint_attr(&mut self.body, "stroke", self.stroke_color);
            let _ = write!(self.body, r#" stroke-width="{}""#, self.stroke_width);
            if !self.stroke_dash_array.is_empty() {
                let dashes: Vec<String> =
                    self.stroke_dash_array.iter().map(f64::to_string).collect();
                let _ = write!(self.body, r#" stroke-dasharray="{}""#, dashes.join(" "));
            }
        }
        self.body.push_str("/>\n");
        self.path = BezPath::new();
    }
}

impl<M: TextMeasurer> Renderer for SvgRenderer<M> {
    fn reset_style(&mut self) {
        self.stroke_color = Color::TRANSPARENT;
        self.stroke_width = 0.0;
        self.stroke_dash_array.clear();
        self.fill_color = Color::TRANSPARENT;
        self.font_color = Color::TRANSPARENT;
        self.text_rotation = None;
    }

    fn dpi(&self) -> f64 {
        self.dpi
    }

    fn set_dpi(&mut self, dpi: f64) {
        self.dpi = dpi;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width;
    }

    fn set_stroke_dash_array(&mut self, dashes: &[f64]) {
        self.stroke_dash_array = dashes.to_vec();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.path.move_to((f64::from(x), f64::from(y)));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.path.line_to((f64::from(x), f64::from(y)));
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, sweep_angle: f64) {
        if ![rx, ry, start_angle, sweep_angle].iter().all(|v| v.is_finite()) {
            return;
        }
        let arc = Arc {
            center: Point::new(f64::from(cx), f64::from(cy)),
            radii: Vec2::new(rx, ry),
            start_angle,
            sweep_angle,
            x_rotation: 0.0,
        };
        let start = Point::new(
            arc.center.x + rx * start_angle.cos(),
            arc.center.y + ry * start_angle.sin(),
        );
        if self.path.elements().is_empty() {
            self.path.move_to(start);
        } else {
            self.path.line_to(start);
        }
        self.path.extend(arc.append_iter(TOLERANCE));
    }

    fn close(&mut self) {
        self.path.close_path();
    }

    fn stroke(&mut self) {
        self.flush_path(false, true);
    }

    fn fill(&mut self) {
        self.flush_path(true, false);
    }

    fn fill_stroke(&mut self) {
        self.flush_path(true, true);
    }

    fn circle(&mut self, radius: f64, x: i32, y: i32) {
        let circle = Circle::new((f64::from(x), f64::from(y)), radius);
        self.path.extend(circle.path_elements(TOLERANCE));
    }

    fn set_font(&mut self, font: &FontFamily) {
        self.font = font.clone();
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn set_font_color(&mut self, color: Color) {
        self.font_color = color;
    }

    fn set_text_rotation(&mut self, radians: f64) {
        self.text_rotation = Some(radians);
    }

    fn clear_text_rotation(&mut self) {
        self.text_rotation = None;
    }

    fn text(&mut self, body: &str, x: i32, y: i32) {
        let _ = write!(
            self.body,
            r#"<text x="{x}" y="{y}" font-family="{}" font-size="{}""#,
            escape_xml(self.font.as_css_family()),
            self.scaled_font_size(),
        );
        write_paint_attr(&mut self.body, "fill", self.font_color);
        if let Some(radians) = self.text_rotation {
            let _ = write!(
                self.body,
                r#" transform="rotate({} {x} {y})""#,
                radians_to_degrees(radians)
            );
        }
        self.body.push('>');
        self.body.push_str(&escape_xml(body));
        self.body.push_str("</text>\n");
    }

    fn measure_text(&mut self, body: &str) -> Bounds {
        let (w, h) = self.measurer.measure(body, &self.text_style()).pixel_extent();
        Bounds::from_size(w, h)
    }

    fn save(&mut self, w: &mut dyn io::Write) -> Result<(), ChartError> {
        let out = self.to_svg_string();
        debug!(width = self.width, height = self.height, bytes = out.len(), "writing svg");
        w.write_all(out.as_bytes())?;
        Ok(())
    }
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let rgba = color.to_rgba8();
    if rgba.a == 0 {
        let _ = write!(out, r#" {name}="none""#);
        return;
    }
    let _ = write!(
        out,
        r##" {name}="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    );
    if rgba.a != 255 {
        let _ = write!(out, r#" {name}-opacity="{}""#, f64::from(rgba.a) / 255.0);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;
    use plotline_charts::{BarChart, ChartError, LinearProgressBar, PieChart, Value};
    use plotline_text::HeuristicTextMeasurer;

    use super::*;

    fn renderer(width: i32, height: i32) -> SvgRenderer<HeuristicTextMeasurer> {
        SvgRenderer::new(width, height, HeuristicTextMeasurer).unwrap()
    }

    #[test]
    fn rejects_empty_canvases() {
        let provider = svg_provider(HeuristicTextMeasurer);
        assert!(matches!(provider(0, 10), Err(ChartError::Renderer(_))));
        assert!(provider(10, 10).is_ok());
    }

    #[test]
    fn measurement_follows_dpi() {
        let mut r = renderer(100, 100);
        r.set_font_size(10.0);
        let b = r.measure_text("abc");
        assert_eq!((b.width(), b.height()), (18, 10));
        r.set_dpi(DEFAULT_DPI * 2.0);
        let b = r.measure_text("abc");
        assert_eq!((b.width(), b.height()), (36, 20));
    }

    #[test]
    fn paths_carry_paint_and_reset() {
        let mut r = renderer(100, 100);
        r.set_fill_color(css::RED);
        r.set_stroke_color(css::BLUE);
        r.set_stroke_width(2.0);
        r.set_stroke_dash_array(&[3.0, 3.0]);
        r.move_to(0, 0);
        r.line_to(10, 10);
        r.close();
        r.fill_stroke();
        // Nothing left to emit.
        r.stroke();

        let svg = r.to_svg_string();
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r##"stroke="#0000ff""##));
        assert!(svg.contains(r#"stroke-width="2""#));
        assert!(svg.contains(r#"stroke-dasharray="3 3""#));
    }

    #[test]
    fn strokes_leave_paths_unfilled() {
        let mut r = renderer(100, 100);
        r.set_stroke_color(css::BLACK);
        r.set_stroke_width(1.0);
        r.arc_to(50, 50, 20.0, 20.0, 0.0, core::f64::consts::PI);
        r.stroke();
        let svg = r.to_svg_string();
        assert!(svg.contains(r#"fill="none""#));
        // The arc starts at 3 o'clock and is flattened into curves.
        assert!(svg.contains("M70"));
        assert!(svg.contains('C'));
    }

    #[test]
    fn non_finite_arcs_are_skipped() {
        let mut r = renderer(100, 100);
        r.set_stroke_width(1.0);
        r.arc_to(50, 50, 20.0, 20.0, 0.0, f64::INFINITY);
        r.arc_to(50, 50, f64::NAN, 20.0, 0.0, 1.0);
        r.stroke();
        assert!(!r.to_svg_string().contains("<path"));
    }

    #[test]
    fn text_is_escaped_and_rotated() {
        let mut r = renderer(100, 100);
        r.set_font_color(css::BLACK);
        r.set_text_rotation(core::f64::consts::FRAC_PI_2);
        r.text("<a & b>", 5, 6);
        r.clear_text_rotation();
        r.text("plain", 1, 2);
        let svg = r.to_svg_string();
        assert!(svg.contains("&lt;a &amp; b&gt;"));
        assert!(svg.contains(r#"transform="rotate(9"#));
        assert!(svg.contains(r#" 5 6)""#));
        assert_eq!(svg.matches("transform").count(), 1);
        assert!(svg.contains(r#"font-family="sans-serif""#));
    }

    #[test]
    fn translucent_paint_gets_opacity() {
        let mut out = String::new();
        write_paint_attr(&mut out, "fill", css::RED.with_alpha(0.5));
        assert!(out.starts_with(r##" fill="#ff0000" fill-opacity=""##));
        let mut out = String::new();
        write_paint_attr(&mut out, "stroke", Color::TRANSPARENT);
        assert_eq!(out, r#" stroke="none""#);
    }

    #[test]
    fn charts_save_complete_documents() {
        let provider = svg_provider(HeuristicTextMeasurer);

        let mut out = Vec::new();
        BarChart::new(vec![Value::new(1.0, "one"), Value::new(3.0, "three")])
            .with_title("Bars")
            .with_size(400, 300)
            .render(&provider, &mut out)
            .unwrap();
        let svg = String::from_utf8(out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains(">three</text>"));
        assert!(svg.contains(r#"width="400" height="300""#));

        let mut out = Vec::new();
        PieChart::new(vec![Value::new(1.0, "a"), Value::new(1.0, "b")])
            .render(&provider, &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("<path"));

        let mut out = Vec::new();
        LinearProgressBar::new(200, 20)
            .with_progress(0.5)
            .with_label("50%")
            .render(&provider, &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains(">50%</text>"));
    }

    #[test]
    fn empty_pies_write_nothing() {
        let provider = svg_provider(HeuristicTextMeasurer);
        let mut out = Vec::new();
        let err = PieChart::new(vec![]).render(&provider, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "please provide at least one value");
        assert!(out.is_empty());
    }
}
