// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stacked bar chart orchestrator.
//!
//! Every bar is normalized to its own total, so the value axis always reads
//! 0% to 100%.

use core::fmt;
use std::io;

use plotline_text::FontFamily;
use tracing::debug;

use crate::defaults::scaled_font_size;
use crate::draw::{draw_box, draw_title};
use crate::math::{ceil_px, to_px};
use crate::style::{TextHorizontalAlign, TextVerticalAlign, TextWrap};
use crate::text::{draw_text, draw_within, measure_lines, measure_text, wrap_fit};
use crate::{
    Bounds, ChartError, Defaults, Palette, Renderable, Renderer, RendererProvider, Style, Value,
    normalize_values,
};

/// Background padding stacked bar charts use when none is set.
const STACKED_BAR_PADDING: Bounds = Bounds::new(20, 20, 10, 50);
/// Stroke width of segment outlines.
const SEGMENT_STROKE_WIDTH: f64 = 3.0;
/// Number of steps on the percent axis.
const PERCENT_STEPS: i32 = 5;

/// One stacked bar.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackedBar {
    /// Category label.
    pub name: String,
    /// Bar width; the default bar width when unset.
    pub width: Option<i32>,
    /// Segments, drawn from the far end of the bar toward the axis.
    pub values: Vec<Value>,
}

impl StackedBar {
    /// Creates a bar from its segments.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            width: None,
            values,
        }
    }

    /// Returns a copy with a width.
    #[must_use]
    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }
}

/// Bars split into segments proportional to their share of the bar total.
#[derive(Clone, Default)]
pub struct StackedBarChart {
    /// Title drawn centered at the top; empty for none.
    pub title: String,
    /// Title style.
    pub title_style: Style,
    /// Font used wherever a style does not name one.
    pub font: Option<FontFamily>,
    /// Width in pixels.
    pub width: Option<i32>,
    /// Height in pixels.
    pub height: Option<i32>,
    /// Output resolution.
    pub dpi: Option<f64>,
    /// Background style. Its padding insets the canvas.
    pub background: Style,
    /// Canvas style.
    pub canvas: Style,
    /// Colors for chrome and segments.
    pub palette: Palette,
    /// Style of the axis below the canvas.
    pub x_axis: Style,
    /// Style of the axis beside the canvas.
    pub y_axis: Style,
    /// Space between bars.
    pub bar_spacing: Option<i32>,
    /// Stack segments left to right instead of top to bottom.
    pub horizontal: bool,
    /// Bars, in category order.
    pub bars: Vec<StackedBar>,
    /// Overlays drawn last.
    pub elements: Vec<Renderable>,
    /// Layout constants.
    pub defaults: Defaults,
}

impl fmt::Debug for StackedBarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackedBarChart")
            .field("title", &self.title)
            .field("horizontal", &self.horizontal)
            .field("bar_spacing", &self.bar_spacing)
            .field("bars", &self.bars)
            .field("elements", &self.elements.len())
            .finish_non_exhaustive()
    }
}

impl StackedBarChart {
    /// Creates a chart over `bars` with default settings.
    pub fn new(bars: Vec<StackedBar>) -> Self {
        Self {
            bars,
            ..Self::default()
        }
    }

    /// Returns a copy with a title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns a copy with a size in pixels.
    #[must_use]
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Returns a copy with horizontal bars.
    #[must_use]
    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Returns a copy with axis styles.
    #[must_use]
    pub fn with_axes(mut self, x_axis: Style, y_axis: Style) -> Self {
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self
    }

    /// Returns a copy with an extra overlay.
    #[must_use]
    pub fn with_element(mut self, element: Renderable) -> Self {
        self.elements.push(element);
        self
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width.unwrap_or(self.defaults.width)
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height.unwrap_or(self.defaults.height)
    }

    /// Output resolution.
    #[must_use]
    pub fn dpi(&self) -> f64 {
        self.dpi.unwrap_or(self.defaults.dpi)
    }

    /// The chart area inset by the background padding.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let pad = self.background.padding_or(STACKED_BAR_PADDING);
        Bounds::new(
            pad.top,
            pad.left,
            self.width() - pad.right,
            self.height() - pad.bottom,
        )
    }

    fn bar_spacing(&self) -> i32 {
        self.bar_spacing.unwrap_or(self.defaults.bar_spacing)
    }

    fn bar_width(&self, bar: &StackedBar) -> i32 {
        bar.width.unwrap_or(self.defaults.bar_width)
    }

    fn total_length(&self) -> i32 {
        self.bars
            .iter()
            .map(|b| self.bar_width(b) + self.bar_spacing())
            .sum()
    }

    /// Validates the chart and draws it with a renderer from `provider`,
    /// then saves the drawing to `w`.
    pub fn render<P: RendererProvider>(
        &self,
        provider: &P,
        w: &mut dyn io::Write,
    ) -> Result<(), ChartError> {
        if self.bars.is_empty() {
            return Err(ChartError::NoBars);
        }
        let mut r = provider.create(self.width(), self.height())?;
        self.draw(&mut r);
        r.save(w)
    }

    fn draw(&self, r: &mut dyn Renderer) {
        r.set_dpi(self.dpi());
        draw_box(
            r,
            Bounds::from_size(self.width(), self.height()),
            &self.background.inherit_from(&self.background_defaults()),
        );

        let canvas = if self.horizontal {
            self.horizontal_adjusted_canvas(r, self.bounds())
        } else {
            self.adjusted_canvas(r, self.bounds())
        };
        debug!(%canvas, horizontal = self.horizontal, "stacked bar canvas adjusted");
        draw_box(r, canvas, &self.canvas.inherit_from(&self.canvas_defaults()));

        if self.horizontal {
            let mut y = canvas.top;
            for bar in &self.bars {
                self.draw_horizontal_bar(r, canvas, y, bar);
                y += self.bar_spacing() + self.bar_width(bar);
            }
            self.draw_percent_x_axis(r, canvas);
            self.draw_category_y_axis(r, canvas);
        } else {
            let mut x = canvas.left;
            for bar in &self.bars {
                self.draw_bar(r, canvas, x, bar);
                x += self.bar_spacing() + self.bar_width(bar);
            }
            self.draw_category_x_axis(r, canvas);
            self.draw_percent_y_axis(r, canvas);
        }

        if !self.title.is_empty() && !self.title_style.hidden {
            let style = self.title_style.inherit_from(&Style {
                font: Some(self.font.clone().unwrap_or_default()),
                font_color: Some(self.palette.text),
                font_size: Some(self.defaults.title_font_size),
                ..Style::default()
            });
            let top = self
                .title_style
                .padding
                .map_or(self.defaults.title_top, |p| p.top);
            draw_title(r, &self.title, &style, self.width(), top);
        }

        let element_defaults = Style {
            font: self.font.clone(),
            ..Style::default()
        };
        for element in &self.elements {
            element(r, canvas, &element_defaults);
        }
    }

    fn adjusted_canvas(&self, r: &mut dyn Renderer, canvas: Bounds) -> Bounds {
        let right = canvas.left + self.total_length();
        if self.x_axis.hidden {
            return Bounds::new(canvas.top, canvas.left, right, canvas.bottom);
        }
        let style = self.axis_style(&self.x_axis, TextVerticalAlign::Top);
        let mut axis_height = self.defaults.vertical_tick_height;
        for bar in self.bars.iter().filter(|b| !b.name.is_empty()) {
            let lines = wrap_fit(r, &bar.name, self.bar_width(bar) + self.bar_spacing(), &style);
            let block = measure_lines(r, &lines, &style);
            axis_height = axis_height.max(block.height() + 2 * self.defaults.x_axis_margin);
        }
        let bottom = canvas.bottom.min(self.height() - axis_height);
        Bounds::new(canvas.top, canvas.left, right, bottom)
    }

    fn horizontal_adjusted_canvas(&self, r: &mut dyn Renderer, canvas: Bounds) -> Bounds {
        let bottom = canvas.top + self.total_length();
        if self.y_axis.hidden {
            return Bounds::new(canvas.top, canvas.left, canvas.right, bottom);
        }
        let style = self.axis_style(&self.y_axis, TextVerticalAlign::Middle);
        let mut axis_width = self.defaults.horizontal_tick_width;
        for bar in self.bars.iter().filter(|b| !b.name.is_empty()) {
            let tb = measure_text(r, &bar.name, &style);
            axis_width = axis_width.max(tb.width() + 2 * self.defaults.y_axis_margin);
        }
        Bounds::new(canvas.top, canvas.left + axis_width, canvas.right, bottom)
    }

    /// Draws segments top to bottom, then their labels on top.
    fn draw_bar(&self, r: &mut dyn Renderer, canvas: Bounds, x: i32, bar: &StackedBar) {
        let left = x + (self.bar_spacing() >> 1);
        let right = left + self.bar_width(bar);
        let segments = normalize_values(&bar.values);
        let height = f64::from(canvas.height());

        let mut y = canvas.top;
        for (i, segment) in segments.iter().enumerate() {
            let h = ceil_px(segment.value * height).min(canvas.height());
            // Keep segments off the canvas edge.
            let bottom = (y + h).min(canvas.bottom - 1);
            draw_box(
                r,
                Bounds::new(y, left, right, bottom),
                &segment.style.inherit_from(&self.segment_defaults(i)),
            );
            y += h;
        }

        let mut y = canvas.top;
        for (i, segment) in segments.iter().enumerate() {
            let h = ceil_px(segment.value * height).min(canvas.height());
            if !segment.label.is_empty() {
                let cx = left + ((right - left) / 2);
                let cy = y + (h / 2);
                self.draw_segment_label(r, segment, i, cx, cy);
            }
            y += h;
        }
    }

    /// Draws segments from the right edge leftward, then their labels.
    fn draw_horizontal_bar(&self, r: &mut dyn Renderer, canvas: Bounds, y: i32, bar: &StackedBar) {
        let top = y + (self.bar_spacing() >> 1);
        let bottom = top + self.bar_width(bar);
        let segments = normalize_values(&bar.values);
        let width = f64::from(canvas.width());

        let mut x = canvas.right;
        for (i, segment) in segments.iter().enumerate() {
            let w = to_px((segment.value * width).floor()).min(canvas.width());
            let left = (x - w).max(canvas.left + 1);
            draw_box(
                r,
                Bounds::new(top, left, x, bottom),
                &segment.style.inherit_from(&self.segment_defaults(i)),
            );
            x -= w;
        }

        let mut x = canvas.right;
        for (i, segment) in segments.iter().enumerate() {
            let w = ceil_px(segment.value * width).min(canvas.width());
            if !segment.label.is_empty() {
                let cx = x - (w / 2);
                let cy = top + ((bottom - top) / 2);
                self.draw_segment_label(r, segment, i, cx, cy);
            }
            x -= w;
        }
    }

    fn draw_segment_label(&self, r: &mut dyn Renderer, segment: &Value, index: usize, cx: i32, cy: i32) {
        let style = segment.style.inherit_from(&self.segment_defaults(index));
        let tb = measure_text(r, &segment.label, &style);
        let x = (cx - (tb.width() >> 1)).max(0);
        let y = (cy + (tb.height() >> 1)).max(0);
        draw_text(r, &segment.label, x, y, &style);
    }

    fn draw_category_x_axis(&self, r: &mut dyn Renderer, canvas: Bounds) {
        if self.x_axis.hidden {
            return;
        }
        let style = self.axis_style(&self.x_axis, TextVerticalAlign::Top);
        let tick_bottom = canvas.bottom + self.defaults.vertical_tick_height;
        style.write_stroke_to_renderer(r);
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.right, canvas.bottom);
        r.stroke();
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.left, tick_bottom);
        r.stroke();

        let mut cursor = canvas.left;
        for bar in &self.bars {
            let slot = Bounds::new(
                canvas.bottom + self.defaults.x_axis_margin,
                cursor,
                cursor + self.bar_width(bar) + self.bar_spacing(),
                self.height(),
            );
            if !bar.name.is_empty() {
                draw_within(r, &bar.name, slot, &style);
            }
            style.write_stroke_to_renderer(r);
            r.move_to(slot.right, canvas.bottom);
            r.line_to(slot.right, tick_bottom);
            r.stroke();
            cursor = slot.right;
        }
    }

    fn draw_category_y_axis(&self, r: &mut dyn Renderer, canvas: Bounds) {
        if self.y_axis.hidden {
            return;
        }
        let style = self.axis_style(&self.y_axis, TextVerticalAlign::Middle);
        let tick_left = canvas.left - self.defaults.horizontal_tick_width;
        style.write_stroke_to_renderer(r);
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.left, canvas.top);
        r.stroke();
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(tick_left, canvas.bottom);
        r.stroke();

        let mut cursor = canvas.top;
        for bar in &self.bars {
            let slot = Bounds::new(
                cursor,
                0,
                canvas.left - self.defaults.y_axis_margin,
                cursor + self.bar_width(bar) + self.bar_spacing(),
            );
            if !bar.name.is_empty() {
                draw_within(r, &bar.name, slot, &style);
            }
            style.write_stroke_to_renderer(r);
            r.move_to(canvas.left, slot.bottom);
            r.line_to(tick_left, slot.bottom);
            r.stroke();
            cursor = slot.bottom;
        }
    }

    fn draw_percent_y_axis(&self, r: &mut dyn Renderer, canvas: Bounds) {
        if self.y_axis.hidden {
            return;
        }
        let style = self.axis_style(&self.y_axis, TextVerticalAlign::Top);
        let tick_right = canvas.right + self.defaults.horizontal_tick_width;
        style.write_stroke_to_renderer(r);
        r.move_to(canvas.right, canvas.top);
        r.line_to(canvas.right, canvas.bottom);
        r.stroke();
        r.move_to(canvas.right, canvas.bottom);
        r.line_to(tick_right, canvas.bottom);
        r.stroke();

        for (t, label) in percent_ticks() {
            let ty = canvas.bottom - to_px(t * f64::from(canvas.height()));
            style.write_stroke_to_renderer(r);
            r.move_to(canvas.right, ty);
            r.line_to(tick_right, ty);
            r.stroke();

            let tb = measure_text(r, &label, &style);
            let x = canvas.right + self.defaults.y_axis_margin + 5;
            draw_text(r, &label, x, ty + (tb.height() >> 1), &style);
        }
    }

    fn draw_percent_x_axis(&self, r: &mut dyn Renderer, canvas: Bounds) {
        if self.x_axis.hidden {
            return;
        }
        let style = self.axis_style(&self.x_axis, TextVerticalAlign::Top);
        let tick_bottom = canvas.bottom + self.defaults.vertical_tick_height;
        style.write_stroke_to_renderer(r);
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.right, canvas.bottom);
        r.stroke();
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.left, tick_bottom);
        r.stroke();

        let last = percent_ticks().len() - 1;
        for (i, (t, label)) in percent_ticks().into_iter().enumerate() {
            let tx = canvas.left + to_px(t * f64::from(canvas.width()));
            style.write_stroke_to_renderer(r);
            r.move_to(tx, canvas.bottom);
            r.line_to(tx, tick_bottom);
            r.stroke();

            let tb = measure_text(r, &label, &style);
            let x = if i == last {
                canvas.right - tb.width()
            } else {
                tx - (tb.width() >> 1)
            };
            let y = canvas.bottom + self.defaults.x_axis_margin + 10;
            draw_text(r, &label, x, y, &style);
        }
    }

    fn axis_style(&self, axis: &Style, vertical: TextVerticalAlign) -> Style {
        axis.inherit_from(
            &Style {
                font: self.font.clone(),
                font_size: Some(self.defaults.axis_font_size),
                font_color: Some(self.palette.axis_stroke),
                stroke_color: Some(self.palette.axis_stroke),
                stroke_width: Some(self.defaults.axis_line_width),
                ..Style::default()
            }
            .with_text_layout(TextHorizontalAlign::Center, vertical, TextWrap::Word),
        )
    }

    fn segment_defaults(&self, index: usize) -> Style {
        let color = self.palette.series_color(index);
        Style {
            stroke_color: Some(color),
            stroke_width: Some(SEGMENT_STROKE_WIDTH),
            fill_color: Some(color),
            font: self.font.clone(),
            font_size: Some(scaled_font_size(self.width(), self.height())),
            font_color: Some(self.palette.text),
            ..Style::default()
        }
    }

    fn background_defaults(&self) -> Style {
        Style {
            fill_color: Some(self.palette.background),
            stroke_color: Some(self.palette.background_stroke),
            stroke_width: Some(self.defaults.background_stroke_width),
            ..Style::default()
        }
    }

    fn canvas_defaults(&self) -> Style {
        Style {
            fill_color: Some(self.palette.canvas),
            stroke_color: Some(self.palette.canvas_stroke),
            stroke_width: Some(self.defaults.canvas_stroke_width),
            ..Style::default()
        }
    }
}

/// `0%` to `100%` in steps of 20%.
fn percent_ticks() -> Vec<(f64, String)> {
    (0..=PERCENT_STEPS)
        .map(|i| {
            let t = f64::from(i) / f64::from(PERCENT_STEPS);
            (t, format!("{:.0}%", t * 100.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{Op, RecordingRenderer, counting_provider};

    fn text_at(r: &RecordingRenderer, wanted: &str) -> Option<(i32, i32)> {
        r.ops.iter().find_map(|op| match op {
            Op::Text { body, x, y, .. } if body == wanted => Some((*x, *y)),
            _ => None,
        })
    }

    fn halves() -> StackedBar {
        StackedBar::new("first", vec![Value::new(1.0, "a"), Value::new(1.0, "b")])
    }

    #[test]
    fn no_bars_is_an_error() {
        let saves = Rc::new(Cell::new(0));
        let result = StackedBarChart::default().render(&counting_provider(saves.clone()), &mut io::sink());
        assert!(matches!(result, Err(ChartError::NoBars)));
        assert_eq!(saves.get(), 0);
    }

    #[test]
    fn renders_and_saves_once() {
        let saves = Rc::new(Cell::new(0));
        let chart = StackedBarChart::new(vec![halves(), StackedBar::new("second", vec![Value::new(3.0, "c")])])
            .with_title("Stacks");
        let result = chart.render(&counting_provider(saves.clone()), &mut io::sink());
        assert!(result.is_ok(), "{result:?}");
        assert_eq!(saves.get(), 1);
    }

    #[test]
    fn segments_split_the_canvas_height() {
        let chart = StackedBarChart::new(vec![halves()])
            .with_size(400, 250)
            .with_axes(Style::hidden(), Style::hidden());
        let mut r = RecordingRenderer::new(400, 250);
        chart.draw(&mut r);

        // Canvas (20, 20) to (170, 200); each half is 90px tall.
        assert_eq!(r.ops[7], Op::MoveTo(20, 20));
        assert_eq!(r.ops[9], Op::LineTo(170, 200));
        assert_eq!(r.ops[14], Op::MoveTo(70, 20));
        assert_eq!(r.ops[16], Op::LineTo(120, 110));
        assert_eq!(r.ops[21], Op::MoveTo(70, 110));
        assert_eq!(r.ops[23], Op::LineTo(120, 199));

        // Labels are centered in their segment.
        assert_eq!(text_at(&r, "a"), Some((92, 70)));
        assert_eq!(r.texts(), vec!["a", "b"]);
    }

    #[test]
    fn cancelling_values_fill_the_bar_with_the_positive_part() {
        let bar = StackedBar::new("q1", vec![Value::new(5.0, "up"), Value::new(-5.0, "down")]);
        let chart = StackedBarChart::new(vec![bar])
            .with_size(400, 250)
            .with_axes(Style::hidden(), Style::hidden());
        let mut r = RecordingRenderer::new(400, 250);
        chart.draw(&mut r);
        assert_eq!(r.ops[14], Op::MoveTo(70, 20));
        assert_eq!(r.ops[16], Op::LineTo(120, 199));
        assert_eq!(r.texts(), vec!["up"]);
    }

    #[test]
    fn bars_without_positive_values_draw_no_segments() {
        let saves = Rc::new(Cell::new(0));
        let bars = vec![
            StackedBar::new("q1", vec![Value::new(5.0, "a"), Value::new(-5.0, "b")]),
            StackedBar::new("q2", vec![Value::new(-1.0, "c"), Value::new(0.0, "d")]),
        ];
        for horizontal in [false, true] {
            let chart = StackedBarChart::new(bars.clone()).with_horizontal(horizontal);
            let result = chart.render(&counting_provider(saves.clone()), &mut io::sink());
            assert!(result.is_ok(), "{result:?}");
        }
        assert_eq!(saves.get(), 2);

        let chart = StackedBarChart::new(vec![bars[1].clone()])
            .with_size(400, 250)
            .with_axes(Style::hidden(), Style::hidden());
        let mut r = RecordingRenderer::new(400, 250);
        chart.draw(&mut r);
        // Background and canvas only.
        assert_eq!(r.count(&Op::FillStroke), 2);
        assert!(r.texts().is_empty());
    }

    #[test]
    fn vertical_axes_show_categories_and_percentages() {
        let chart = StackedBarChart::new(vec![halves()]).with_size(400, 300);
        let mut r = RecordingRenderer::new(400, 300);
        chart.draw(&mut r);
        let texts = r.texts();
        for label in ["first", "0%", "20%", "40%", "60%", "80%", "100%"] {
            assert!(texts.contains(&label), "{label} missing from {texts:?}");
        }
    }

    #[test]
    fn horizontal_percent_axis_pins_the_last_label() {
        let chart = StackedBarChart::new(vec![halves()])
            .with_size(400, 300)
            .with_horizontal(true);
        let mut r = RecordingRenderer::new(400, 300);
        chart.draw(&mut r);

        // "100%" at axis font size 10 is 24px wide; the canvas ends at 390.
        let (x, _) = text_at(&r, "100%").unwrap();
        assert_eq!(x, 390 - 24);
        assert!(r.texts().contains(&"first"));
    }

    #[test]
    fn percent_ticks_step_by_a_fifth() {
        let ticks = percent_ticks();
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[1].1, "20%");
        assert_eq!(ticks[5], (1.0, "100%".to_owned()));
    }
}
