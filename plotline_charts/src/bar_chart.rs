// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bar chart orchestrator.

use core::fmt;
use std::io;

use plotline_text::FontFamily;
use tracing::debug;

use crate::defaults::scaled_title_font_size;
use crate::draw::{draw_box, draw_title};
use crate::error::RangeAxis;
use crate::math::to_px;
use crate::style::{TextHorizontalAlign, TextVerticalAlign, TextWrap};
use crate::text::{draw_within, measure_lines, measure_text, wrap_fit};
use crate::tick::widen_to_ticks;
use crate::{
    Bounds, ChartError, Defaults, Palette, Range, Renderable, Renderer, RendererProvider, Style,
    Tick, Value, ValueFormatter, XAxis, YAxis,
};

/// One bar per [`Value`], labelled along the category axis.
///
/// Vertical charts put the categories below the canvas and the value axis
/// on the right. Horizontal charts put the categories on the left and the
/// value axis below.
#[derive(Clone, Default)]
pub struct BarChart {
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
    /// Colors for chrome and bars.
    pub palette: Palette,
    /// Category axis style.
    pub x_axis: Style,
    /// Value axis.
    pub y_axis: YAxis,
    /// Bar width before any shrinking.
    pub bar_width: Option<i32>,
    /// Space between bars before any shrinking.
    pub bar_spacing: Option<i32>,
    /// Lay bars out left to right from the category axis.
    pub horizontal: bool,
    /// Value bars grow from, instead of the canvas edge.
    pub base_value: Option<f64>,
    /// Bars, in category order.
    pub bars: Vec<Value>,
    /// Overlays drawn last.
    pub elements: Vec<Renderable>,
    /// Layout constants.
    pub defaults: Defaults,
}

impl fmt::Debug for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarChart")
            .field("title", &self.title)
            .field("horizontal", &self.horizontal)
            .field("bar_width", &self.bar_width)
            .field("bar_spacing", &self.bar_spacing)
            .field("base_value", &self.base_value)
            .field("bars", &self.bars)
            .field("elements", &self.elements.len())
            .finish_non_exhaustive()
    }
}

/// Ticks and range of the value axis, settled against the canvas.
#[derive(Clone, Debug)]
struct ValueAxis {
    range: Range,
    ticks: Vec<Tick>,
}

impl BarChart {
    /// Creates a chart over `bars` with default settings.
    pub fn new(bars: Vec<Value>) -> Self {
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

    /// Returns a copy with a value axis.
    #[must_use]
    pub fn with_y_axis(mut self, axis: YAxis) -> Self {
        self.y_axis = axis;
        self
    }

    /// Returns a copy with a category axis style.
    #[must_use]
    pub fn with_x_axis(mut self, style: Style) -> Self {
        self.x_axis = style;
        self
    }

    /// Returns a copy with bar width and spacing.
    #[must_use]
    pub fn with_bar_size(mut self, width: i32, spacing: i32) -> Self {
        self.bar_width = Some(width);
        self.bar_spacing = Some(spacing);
        self
    }

    /// Returns a copy with horizontal bars.
    #[must_use]
    pub fn with_horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = horizontal;
        self
    }

    /// Returns a copy whose bars grow from `base`.
    #[must_use]
    pub fn with_base_value(mut self, base: f64) -> Self {
        self.base_value = Some(base);
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
        let pad = self.background.padding_or(self.defaults.background_padding);
        Bounds::new(
            pad.top,
            pad.left,
            self.width() - pad.right,
            self.height() - pad.bottom,
        )
    }

    fn bar_width(&self) -> i32 {
        self.bar_width.unwrap_or(self.defaults.bar_width)
    }

    fn bar_spacing(&self) -> i32 {
        self.bar_spacing.unwrap_or(self.defaults.bar_spacing)
    }

    fn bar_count(&self) -> i32 {
        i32::try_from(self.bars.len()).unwrap_or(i32::MAX)
    }

    /// Validates the chart and draws it with a renderer from `provider`,
    /// then saves the drawing to `w`.
    pub fn render<P: RendererProvider>(
        &self,
        provider: &P,
        w: &mut dyn io::Write,
    ) -> Result<(), ChartError> {
        let (range, vf) = self.prepare()?;
        let mut r = provider.create(self.width(), self.height())?;
        self.draw(&mut r, range, &vf);
        r.save(w)
    }

    fn prepare(&self) -> Result<(Range, ValueFormatter), ChartError> {
        if self.bars.is_empty() {
            return Err(ChartError::NoBars);
        }
        let range = self.range();
        let delta = range.delta();
        if delta.is_infinite() {
            return Err(ChartError::InfiniteRangeDelta(RangeAxis::Y));
        }
        if delta.is_nan() {
            return Err(ChartError::NanRangeDelta(RangeAxis::Y));
        }
        if delta == 0.0 {
            return Err(ChartError::ZeroBarRange);
        }
        debug!(min = range.min(), max = range.max(), "bar chart range computed");
        let vf = self
            .y_axis
            .value_formatter
            .clone()
            .unwrap_or(ValueFormatter::Float);
        Ok((range, vf))
    }

    /// Explicit range, then explicit ticks, then the bar values.
    fn range(&self) -> Range {
        if let Some(range) = self.y_axis.range.filter(|r| !r.is_zero()) {
            return range;
        }
        let values: Vec<f64> = if self.y_axis.ticks.is_empty() {
            self.bars.iter().map(|b| b.value).collect()
        } else {
            self.y_axis.ticks.iter().map(|t| t.value).collect()
        };
        let (min, max) = values
            .iter()
            .fold((f64::MAX, -f64::MAX), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        Range::new(min, max)
    }

    fn with_domain(&self, range: Range, canvas: Bounds) -> Range {
        if self.horizontal {
            range.with_domain(canvas.width())
        } else {
            range.with_domain(canvas.height())
        }
    }

    /// The value axis laid out horizontally below the canvas.
    fn horizontal_value_axis(&self) -> XAxis {
        XAxis {
            name: self.y_axis.name.clone(),
            name_style: self.y_axis.name_style.clone(),
            style: self.y_axis.style.clone(),
            value_formatter: self.y_axis.value_formatter.clone(),
            range: self.y_axis.range,
            tick_style: self.y_axis.tick_style.clone(),
            ticks: self.y_axis.ticks.clone(),
            grid: self.y_axis.grid.clone(),
            ..XAxis::default()
        }
    }

    fn draw(&self, r: &mut dyn Renderer, range: Range, vf: &ValueFormatter) {
        r.set_dpi(self.dpi());
        draw_box(
            r,
            Bounds::from_size(self.width(), self.height()),
            &self.background.inherit_from(&self.background_defaults()),
        );

        let mut canvas = self.bounds();
        let mut axis = ValueAxis {
            range: self.with_domain(range, canvas),
            ticks: Vec::new(),
        };
        let horizontal_axis = self.horizontal_value_axis();
        let axis_defaults = self.axis_defaults();

        if !self.y_axis.is_hidden() {
            axis.ticks = if self.horizontal {
                horizontal_axis.ticks(r, &axis.range, &axis_defaults, vf, &self.defaults)
            } else {
                self.y_axis
                    .ticks(r, &axis.range, &axis_defaults, vf, &self.defaults)
            };
            axis.range = self.with_domain(widen_to_ticks(axis.range, &axis.ticks), canvas);
        }
        canvas = if self.horizontal {
            self.horizontal_adjusted_canvas(r, canvas, &axis, &horizontal_axis)
        } else {
            self.adjusted_canvas(r, canvas, &axis)
        };
        axis.range = self.with_domain(axis.range, canvas);
        debug!(%canvas, horizontal = self.horizontal, "bar chart canvas adjusted");

        draw_box(r, canvas, &self.canvas.inherit_from(&self.canvas_defaults()));
        if self.horizontal {
            self.draw_horizontal_bars(r, canvas, &axis.range);
            if !self.y_axis.is_hidden() {
                horizontal_axis.render(
                    r,
                    canvas,
                    &axis.range,
                    &axis_defaults,
                    &axis.ticks,
                    &self.defaults,
                );
            }
            self.draw_horizontal_categories(r, canvas);
        } else {
            self.draw_bars(r, canvas, &axis.range);
            self.draw_categories(r, canvas);
            if !self.y_axis.is_hidden() {
                self.y_axis.render(
                    r,
                    canvas,
                    &axis.range,
                    &axis_defaults,
                    &axis.ticks,
                    &self.defaults,
                );
            }
        }

        if !self.title.is_empty() && !self.title_style.hidden {
            let top = self
                .title_style
                .padding
                .map_or(self.defaults.title_top, |p| p.top);
            draw_title(r, &self.title, &self.title_text_style(), self.width(), top);
        }

        let element_defaults = Style {
            font: self.font.clone(),
            ..Style::default()
        };
        for element in &self.elements {
            element(r, canvas, &element_defaults);
        }
    }

    /// Bar size, spacing and total length along the category axis.
    ///
    /// When the configured bars overflow the canvas the spacing shrinks
    /// first, then the width. Neither goes below zero.
    fn scaled_sizes(&self, canvas: Bounds) -> (i32, i32, i32) {
        let n = self.bar_count();
        let length = if self.horizontal {
            canvas.height()
        } else {
            canvas.width()
        };
        let tick = self.defaults.horizontal_tick_width;
        let shrink = |slack: i32| {
            if slack > 0 {
                to_px((f64::from(slack) / f64::from(n)).ceil())
            } else {
                0
            }
        };

        let width = self.bar_width();
        let spacing = if n * (width + self.bar_spacing()) > length {
            shrink(length - n * width - tick)
        } else {
            self.bar_spacing()
        };
        let size = if n * (width + spacing) > length {
            shrink(length - n * spacing - tick)
        } else {
            width
        };
        (size, spacing, n * (size + spacing))
    }

    fn draw_bars(&self, r: &mut dyn Renderer, canvas: Bounds, range: &Range) {
        let (size, spacing, _) = self.scaled_sizes(canvas);
        let mut x = canvas.left;
        for (i, bar) in self.bars.iter().enumerate() {
            let style = bar.style.inherit_from(&self.bar_defaults(i));
            let stroke_width = style.stroke_width_or(0.0);
            let offset = to_px(stroke_width / 2.0);
            let height = match range.translate(bar.value) {
                0 => to_px(stroke_width),
                h => h,
            };
            let bottom = match self.base_value {
                Some(base) => canvas.bottom - range.translate(base) - offset,
                None => canvas.bottom - offset,
            };
            let left = x + (spacing >> 1);
            draw_box(
                r,
                Bounds::new(canvas.bottom - height, left, left + size, bottom),
                &style,
            );
            x += size + spacing;
        }
    }

    fn draw_horizontal_bars(&self, r: &mut dyn Renderer, canvas: Bounds, range: &Range) {
        let (size, spacing, total) = self.scaled_sizes(canvas);
        let mut y = canvas.bottom - total;
        for (i, bar) in self.bars.iter().enumerate() {
            let style = bar.style.inherit_from(&self.bar_defaults(i));
            let stroke_width = style.stroke_width_or(0.0);
            let offset = to_px(stroke_width / 2.0);
            let length = match range.translate(bar.value) {
                0 => to_px(stroke_width),
                l => l,
            };
            let left = match self.base_value {
                Some(base) => canvas.left + range.translate(base) - offset,
                None => canvas.left + offset,
            };
            let top = y + (spacing >> 1);
            draw_box(
                r,
                Bounds::new(top, left, canvas.left + length, top + size),
                &style,
            );
            y += size + spacing;
        }
    }

    fn category_style(&self) -> Style {
        self.x_axis.inherit_from(&self.axis_defaults().with_text_layout(
            TextHorizontalAlign::Center,
            TextVerticalAlign::Top,
            TextWrap::Word,
        ))
    }

    fn horizontal_category_style(&self) -> Style {
        self.x_axis.inherit_from(&self.axis_defaults().with_text_layout(
            TextHorizontalAlign::Right,
            TextVerticalAlign::Middle,
            TextWrap::Word,
        ))
    }

    fn adjusted_canvas(&self, r: &mut dyn Renderer, canvas: Bounds, axis: &ValueAxis) -> Bounds {
        let (size, spacing, total) = self.scaled_sizes(canvas);
        let mut outer = canvas;

        if !self.x_axis.hidden {
            let style = self.category_style();
            let mut axis_height = self.defaults.vertical_tick_height;
            for bar in self.bars.iter().filter(|b| !b.label.is_empty()) {
                let lines = wrap_fit(r, &bar.label, size + spacing, &style);
                let block = measure_lines(r, &lines, &style);
                axis_height = axis_height.max(block.height() + 2 * self.defaults.x_axis_margin);
            }
            outer = outer.grow(&Bounds::new(
                canvas.top,
                canvas.left,
                canvas.left + total,
                canvas.bottom + self.defaults.x_axis_margin + axis_height,
            ));
        }

        if !self.y_axis.is_hidden() {
            let b = self.y_axis.measure(
                r,
                canvas,
                &axis.range,
                &self.axis_defaults(),
                &axis.ticks,
                &self.defaults,
            );
            outer = outer.grow(&b);
        }

        canvas.outer_constrain(&self.bounds(), &outer)
    }

    fn horizontal_adjusted_canvas(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        axis: &ValueAxis,
        value_axis: &XAxis,
    ) -> Bounds {
        let mut outer = canvas;

        if !self.title.is_empty() && !self.title_style.hidden {
            let style = self.title_text_style();
            let tb = measure_text(r, &self.title, &style);
            let pad = self.title_style.padding.unwrap_or_default();
            outer = outer.grow(&Bounds::new(
                canvas.top - tb.height() - pad.top - pad.bottom,
                canvas.left,
                canvas.right,
                canvas.top,
            ));
        }

        if !self.x_axis.hidden {
            let style = self.horizontal_category_style();
            let mut axis_width = self.defaults.horizontal_tick_width;
            for bar in self.bars.iter().filter(|b| !b.label.is_empty()) {
                let tb = measure_text(r, &bar.label, &style);
                axis_width = axis_width.max(tb.width() + 2 * self.defaults.y_axis_margin);
            }
            outer = outer.grow(&Bounds::new(
                canvas.top,
                canvas.left - axis_width,
                canvas.right,
                canvas.bottom,
            ));
        }

        if !self.y_axis.is_hidden() {
            let b = value_axis.measure(
                r,
                canvas,
                &axis.range,
                &self.axis_defaults(),
                &axis.ticks,
                &self.defaults,
            );
            outer = outer.grow(&b);
        }

        canvas.outer_constrain(&self.bounds(), &outer)
    }

    /// Category labels centered under each bar slot, with a tick between
    /// slots.
    fn draw_categories(&self, r: &mut dyn Renderer, canvas: Bounds) {
        if self.x_axis.hidden {
            return;
        }
        let style = self.category_style();
        let (size, spacing, _) = self.scaled_sizes(canvas);
        let tick_bottom = canvas.bottom + self.defaults.vertical_tick_height;

        style.write_stroke_to_renderer(r);
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.right, canvas.bottom);
        r.stroke();
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.left, tick_bottom);
        r.stroke();

        let mut cursor = canvas.left;
        for (i, bar) in self.bars.iter().enumerate() {
            let slot = Bounds::new(
                canvas.bottom + self.defaults.x_axis_margin,
                cursor,
                cursor + size + spacing,
                self.height(),
            );
            if !bar.label.is_empty() {
                draw_within(r, &bar.label, slot, &style);
            }
            if i + 1 < self.bars.len() {
                style.write_stroke_to_renderer(r);
                r.move_to(slot.right, canvas.bottom);
                r.line_to(slot.right, tick_bottom);
                r.stroke();
            }
            cursor += size + spacing;
        }
    }

    /// Category labels right-aligned beside each bar, left of the canvas.
    fn draw_horizontal_categories(&self, r: &mut dyn Renderer, canvas: Bounds) {
        if self.x_axis.hidden {
            return;
        }
        let style = self.horizontal_category_style();
        let (size, spacing, total) = self.scaled_sizes(canvas);
        let margin = self.defaults.y_axis_margin;
        let mut cursor = canvas.bottom - total;

        style.write_stroke_to_renderer(r);
        r.move_to(canvas.left, cursor);
        r.line_to(canvas.left, canvas.bottom);
        r.stroke();

        for bar in &self.bars {
            style.write_stroke_to_renderer(r);
            r.move_to(canvas.left, cursor);
            r.line_to(canvas.left - self.defaults.horizontal_tick_width, cursor);
            r.stroke();

            if !bar.label.is_empty() {
                let tb = measure_text(r, &bar.label, &style);
                let top = cursor + (spacing >> 1);
                let slot = Bounds::new(
                    top,
                    canvas.left - tb.width() - 2 * margin,
                    canvas.left - margin,
                    top + size,
                );
                draw_within(r, &bar.label, slot, &style);
            }
            cursor += size + spacing;
        }
    }

    fn title_text_style(&self) -> Style {
        self.title_style.inherit_from(&Style {
            font: Some(self.font.clone().unwrap_or_default()),
            font_color: Some(self.palette.text),
            font_size: Some(scaled_title_font_size(self.width(), self.height())),
            ..Style::default()
        })
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

    fn bar_defaults(&self, index: usize) -> Style {
        let color = self.palette.series_color(index);
        Style {
            stroke_color: Some(color),
            fill_color: Some(color),
            ..Style::default()
        }
    }

    fn axis_defaults(&self) -> Style {
        Style {
            font: self.font.clone(),
            font_color: Some(self.palette.text),
            font_size: Some(self.defaults.axis_font_size),
            stroke_color: Some(self.palette.axis_stroke),
            stroke_width: Some(self.defaults.axis_line_width),
            ..Style::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{Op, RecordingRenderer, counting_provider};

    fn bars() -> Vec<Value> {
        vec![
            Value::new(1.0, "alpha"),
            Value::new(2.0, "beta"),
            Value::new(3.0, "gamma"),
        ]
    }

    fn render(chart: &BarChart) -> (Result<(), ChartError>, usize) {
        let saves = Rc::new(Cell::new(0));
        let result = chart.render(&counting_provider(saves.clone()), &mut io::sink());
        (result, saves.get())
    }

    fn recorded(chart: &BarChart) -> RecordingRenderer {
        let (range, vf) = chart.prepare().unwrap();
        let mut r = RecordingRenderer::new(chart.width(), chart.height());
        chart.draw(&mut r, range, &vf);
        r
    }

    #[test]
    fn no_bars_is_an_error() {
        let (result, saves) = render(&BarChart::default());
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "please provide at least one bar");
        assert_eq!(saves, 0);
    }

    #[test]
    fn equal_values_collapse_the_range() {
        let chart = BarChart::new(vec![Value::new(2.0, "a"), Value::new(2.0, "b")]);
        let (result, saves) = render(&chart);
        assert!(matches!(result, Err(ChartError::ZeroBarRange)));
        assert_eq!(saves, 0);
    }

    #[test]
    fn renders_labels_and_saves_once() {
        let chart = BarChart::new(bars()).with_size(600, 400).with_title("Bars");
        let (result, saves) = render(&chart);
        assert!(result.is_ok(), "{result:?}");
        assert_eq!(saves, 1);

        let r = recorded(&chart);
        let texts = r.texts();
        for label in ["alpha", "beta", "gamma", "Bars"] {
            assert!(texts.contains(&label), "{label} missing from {texts:?}");
        }
    }

    #[test]
    fn explicit_range_wins() {
        let chart = BarChart::new(bars()).with_y_axis(YAxis::primary().with_range(Range::new(0.0, 10.0)));
        let range = chart.range();
        assert_eq!((range.min(), range.max()), (0.0, 10.0));

        let ticked = BarChart::new(bars())
            .with_y_axis(YAxis::primary().with_ticks(vec![Tick::new(-1.0, "-1"), Tick::new(4.0, "4")]));
        let range = ticked.range();
        assert_eq!((range.min(), range.max()), (-1.0, 4.0));
    }

    #[test]
    fn sizes_shrink_only_when_bars_overflow() {
        let chart = BarChart::new(bars());
        assert_eq!(chart.scaled_sizes(Bounds::new(0, 0, 1000, 400)), (50, 100, 450));

        let many = BarChart::new((0..10).map(|i| Value::new(f64::from(i), "")).collect());
        assert_eq!(many.scaled_sizes(Bounds::new(0, 0, 500, 400)), (50, 0, 500));

        let crowded = BarChart::new((0..20).map(|i| Value::new(f64::from(i), "")).collect());
        assert_eq!(crowded.scaled_sizes(Bounds::new(0, 0, 500, 400)), (25, 0, 500));
    }

    #[test]
    fn bars_grow_up_from_the_canvas_bottom() {
        let chart = BarChart::new(bars())
            .with_size(600, 400)
            .with_x_axis(Style::hidden())
            .with_y_axis(YAxis::hidden());
        let r = recorded(&chart);
        // Background and canvas take seven ops each; the first bar sits on
        // the canvas floor.
        let canvas_bottom = 400 - 5;
        assert_eq!(r.ops[14], Op::MoveTo(5 + 50, canvas_bottom));
        assert_eq!(r.count(&Op::FillStroke), 2 + 3);
    }

    #[test]
    fn horizontal_bars_render_categories_on_the_left() {
        let chart = BarChart::new(bars())
            .with_size(600, 400)
            .with_horizontal(true)
            .with_title("Sideways");
        let r = recorded(&chart);
        let (x, _) = r
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Text { body, x, y, .. } if body == "alpha" => Some((*x, *y)),
                _ => None,
            })
            .unwrap();
        assert!(x < 100, "category label at {x}");
        assert!(r.texts().contains(&"Sideways"));
    }
}
