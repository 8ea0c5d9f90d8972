// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series legends drawn as chart elements.

use peniko::Color;
use peniko::color::palette::css;

use crate::draw::draw_box;
use crate::{Bounds, Chart, Palette, Renderer, Style};

/// Gap between a label and its swatch line.
const LINE_TEXT_GAP: i32 = 5;
/// Length of a swatch line.
const LINE_LENGTH_MINIMUM: i32 = 25;
/// Inner padding of stacked legends.
const LEGEND_PADDING: Bounds = Bounds::new(5, 5, 5, 5);
/// Inner padding of thin legends.
const THIN_LEGEND_PADDING: Bounds = Bounds::new(5, 7, 7, 5);

/// Where and how a [`Legend`] lays out its entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LegendKind {
    /// A stacked box in the top-left corner of the canvas.
    #[default]
    Standard,
    /// A single row centered in the space above the canvas, spanning the
    /// canvas width.
    Thin,
    /// A stacked box in the top-left corner of the chart.
    Left,
}

/// A legend listing every visible series that is not an annotation.
#[derive(Clone, Debug, Default)]
pub struct Legend {
    /// Layout.
    pub kind: LegendKind,
    /// Overrides for the legend box and label text.
    pub style: Style,
}

impl Legend {
    /// A stacked legend at the canvas corner.
    pub fn standard() -> Self {
        Self::default()
    }

    /// A one-row legend above the canvas.
    pub fn thin() -> Self {
        Self {
            kind: LegendKind::Thin,
            ..Self::default()
        }
    }

    /// A stacked legend at the chart corner.
    pub fn left() -> Self {
        Self {
            kind: LegendKind::Left,
            ..Self::default()
        }
    }

    /// Returns a copy with style overrides.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn defaults(&self) -> Style {
        Style {
            fill_color: Some(css::WHITE),
            font_color: Some(Palette::default().text),
            font_size: Some(8.0),
            stroke_color: Some(Color::from_rgb8(51, 51, 51)),
            stroke_width: Some(1.0),
            padding: (self.kind == LegendKind::Thin).then_some(THIN_LEGEND_PADDING),
            ..Style::default()
        }
    }

    /// Draws the legend for `chart` relative to `canvas`.
    pub fn render(&self, r: &mut dyn Renderer, canvas: Bounds, chart: &Chart, chart_defaults: &Style) {
        let legend_defaults = self.defaults();
        let style = self
            .style
            .inherit_from(&chart_defaults.inherit_from(&legend_defaults));
        let entries: Vec<(String, Style)> = chart
            .series
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.style().hidden && s.as_annotation().is_none())
            .map(|(i, s)| {
                (
                    s.name().to_owned(),
                    s.style().inherit_from(&chart.series_defaults(i)),
                )
            })
            .filter(|(name, _)| !name.is_empty())
            .collect();

        match self.kind {
            LegendKind::Standard => {
                stacked(r, Bounds::new(canvas.top, canvas.left, 0, 0), &style, &style, &entries, chart);
            }
            LegendKind::Left => {
                stacked(r, Bounds::new(5, 5, 0, 0), &style, &legend_defaults, &entries, chart);
            }
            LegendKind::Thin => thin(r, canvas, &style, &legend_defaults, &entries, chart),
        }
    }
}

fn draw_swatch(r: &mut dyn Renderer, line: &Style, from: i32, to: i32, y: i32) {
    line.write_stroke_to_renderer(r);
    r.move_to(from, y);
    r.line_to(to, y);
    r.stroke();
}

fn stacked(
    r: &mut dyn Renderer,
    origin: Bounds,
    text_style: &Style,
    box_style: &Style,
    entries: &[(String, Style)],
    chart: &Chart,
) {
    let spacing = chart.defaults.minimum_tick_vertical_spacing;
    let mut content = Bounds::new(
        origin.top + LEGEND_PADDING.top,
        origin.left + LEGEND_PADDING.left,
        origin.left + LEGEND_PADDING.left,
        origin.top + LEGEND_PADDING.top,
    );

    text_style.write_text_to_renderer(r);
    let measured: Vec<Bounds> = entries.iter().map(|(name, _)| r.measure_text(name)).collect();
    for (i, tb) in measured.iter().enumerate() {
        if i > 0 {
            content.bottom += spacing;
        }
        content.bottom += tb.height();
        content.right = content
            .right
            .max(content.left + tb.width() + LINE_TEXT_GAP + LINE_LENGTH_MINIMUM);
    }

    let outline = Bounds::new(
        origin.top,
        origin.left,
        content.right + LEGEND_PADDING.right,
        content.bottom + LEGEND_PADDING.bottom,
    );
    draw_box(r, outline, box_style);

    let mut cursor = content.top;
    for (i, ((name, line), tb)) in entries.iter().zip(&measured).enumerate() {
        if i > 0 {
            cursor += spacing;
        }
        let ty = cursor + tb.height();
        text_style.write_text_to_renderer(r);
        r.text(name, content.left, ty);
        let lx = content.left + tb.width() + LINE_TEXT_GAP;
        draw_swatch(r, line, lx, content.right - LEGEND_PADDING.right, ty - (tb.height() >> 1));
        cursor += tb.height();
    }
}

fn thin(
    r: &mut dyn Renderer,
    canvas: Bounds,
    text_style: &Style,
    box_style: &Style,
    entries: &[(String, Style)],
    chart: &Chart,
) {
    let pad = text_style.padding_or(THIN_LEGEND_PADDING);
    text_style.write_text_to_renderer(r);
    let measured: Vec<Bounds> = entries.iter().map(|(name, _)| r.measure_text(name)).collect();
    let text_height = measured.iter().map(Bounds::height).max().unwrap_or(0);

    let box_height = text_height + pad.top + pad.bottom;
    let margin = (canvas.top - box_height) >> 1;
    draw_box(
        r,
        Bounds::new(margin, canvas.left, canvas.right, margin + box_height),
        box_style,
    );

    let ty = margin + pad.top + text_height;
    let ly = ty - (text_height >> 1);
    let mut tx = canvas.left + pad.left;
    for ((name, line), tb) in entries.iter().zip(&measured) {
        text_style.write_text_to_renderer(r);
        r.text(name, tx, ty);
        let lx = tx + tb.width() + LINE_TEXT_GAP;
        draw_swatch(r, line, lx, lx + LINE_LENGTH_MINIMUM, ly);
        tx += tb.width()
            + chart.defaults.minimum_tick_horizontal_spacing
            + LINE_TEXT_GAP
            + LINE_LENGTH_MINIMUM;
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::testing::{Op, RecordingRenderer, linear_range};
    use crate::{AnnotationSeries, ContinuousSeries, SeriesRef, Value2};

    fn named(name: &str) -> SeriesRef {
        Rc::new(ContinuousSeries::new(linear_range(1, 3), linear_range(1, 3)).with_name(name))
    }

    fn text_at(r: &RecordingRenderer, wanted: &str) -> Option<(i32, i32)> {
        r.ops.iter().find_map(|op| match op {
            Op::Text { body, x, y, .. } if body == wanted => Some((*x, *y)),
            _ => None,
        })
    }

    #[test]
    fn standard_stacks_entries_at_the_canvas_corner() {
        let chart = Chart::new(vec![named("abc"), named("")]);
        let mut r = RecordingRenderer::new(400, 300);
        let canvas = Bounds::new(20, 30, 300, 200);
        Legend::standard().render(&mut r, canvas, &chart, &Style::default());

        // Outline: (20, 30) to (85, 38).
        assert_eq!(r.ops[0], Op::MoveTo(30, 20));
        assert_eq!(r.ops[2], Op::LineTo(85, 38));
        assert_eq!(text_at(&r, "abc"), Some((35, 33)));
        assert_eq!(r.count(&Op::MoveTo(55, 29)), 1);
        assert_eq!(r.count(&Op::LineTo(75, 29)), 1);
        assert_eq!(r.texts(), vec!["abc"]);
    }

    #[test]
    fn annotations_and_hidden_series_are_left_out() {
        let hidden: SeriesRef = Rc::new(
            ContinuousSeries::new(linear_range(1, 3), linear_range(1, 3))
                .with_name("hidden")
                .with_style(Style::hidden()),
        );
        let notes: SeriesRef = Rc::new(
            AnnotationSeries::new(vec![Value2::new(1.0, 1.0, "x")]).with_name("notes"),
        );
        let chart = Chart::new(vec![named("a"), hidden, notes, named("b")]);
        let mut r = RecordingRenderer::new(400, 300);
        Legend::left().render(&mut r, Bounds::new(50, 50, 300, 250), &chart, &Style::default());
        assert_eq!(r.texts(), vec!["a", "b"]);
        assert_eq!(r.ops[0], Op::MoveTo(5, 5));
        // Second label sits one label height plus the vertical spacing lower.
        let (_, ya) = text_at(&r, "a").unwrap();
        let (_, yb) = text_at(&r, "b").unwrap();
        assert_eq!(yb - ya, 8 + chart.defaults.minimum_tick_vertical_spacing);
    }

    #[test]
    fn thin_lays_entries_out_in_a_row() {
        let chart = Chart::new(vec![named("abc"), named("de")]);
        let mut r = RecordingRenderer::new(400, 300);
        Legend::thin().render(&mut r, Bounds::new(40, 20, 380, 280), &chart, &Style::default());
        // Box height 8 + 5 + 5, centered in the 40px above the canvas.
        assert_eq!(r.ops[0], Op::MoveTo(20, 11));
        assert_eq!(text_at(&r, "abc"), Some((27, 24)));
        let step = 15 + chart.defaults.minimum_tick_horizontal_spacing + 5 + 25;
        assert_eq!(text_at(&r, "de"), Some((27 + step, 24)));
    }
}
