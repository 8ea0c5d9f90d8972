// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie and donut charts.

use core::fmt;
use std::io;

use plotline_text::FontFamily;
use tracing::debug;

use crate::defaults::{scaled_font_size, scaled_title_font_size};
use crate::draw::draw_box;
use crate::math::{circle_point, percent_to_radians};
use crate::style::{TextHorizontalAlign, TextVerticalAlign, TextWrap};
use crate::text::{draw_text, draw_within, measure_text};
use crate::{
    Bounds, ChartError, Defaults, Palette, Renderable, Renderer, RendererProvider, Style, Value,
    normalize_values,
};

/// Stroke width of the separators between slices.
const SLICE_STROKE_WIDTH: f64 = 5.0;
/// Stroke width of the donut hole outline.
const HOLE_STROKE_WIDTH: f64 = 4.0;

/// Whether slices meet in the middle or leave a hole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PieShape {
    /// Slices meet at the center.
    #[default]
    Pie,
    /// Slices are drawn around a hole in the background color.
    Donut,
}

impl PieShape {
    fn name(self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Donut => "donut",
        }
    }
}

/// Radii derived from the canvas diameter.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Radii {
    slice: f64,
    label: f64,
    hole: Option<f64>,
}

impl Radii {
    fn new(shape: PieShape, diameter: i32) -> Self {
        let half = f64::from(diameter >> 1);
        match shape {
            PieShape::Pie => Self {
                slice: half,
                label: half * 2.0 / 3.0,
                hole: None,
            },
            PieShape::Donut => {
                let outer = half / 1.1;
                Self {
                    slice: outer / 1.25,
                    label: outer * 2.83 / 3.0,
                    hole: Some(outer / 3.5),
                }
            }
        }
    }
}

/// A pie or donut chart over labelled values.
///
/// Values are normalized to shares of their total; non-positive values are
/// dropped. Slices start at three o'clock and run clockwise.
#[derive(Clone, Default)]
pub struct PieChart {
    /// Title drawn centered at the top; empty for none.
    pub title: String,
    /// Title style.
    pub title_style: Style,
    /// Pie or donut.
    pub shape: PieShape,
    /// Font used wherever a style does not name one.
    pub font: Option<FontFamily>,
    /// Width in pixels.
    pub width: Option<i32>,
    /// Height in pixels; the width when unset.
    pub height: Option<i32>,
    /// Output resolution.
    pub dpi: Option<f64>,
    /// Background style. Its padding insets the canvas.
    pub background: Style,
    /// Canvas style.
    pub canvas: Style,
    /// Colors for chrome and slices.
    pub palette: Palette,
    /// Style every slice inherits from.
    pub slice_style: Style,
    /// Slices, clockwise.
    pub values: Vec<Value>,
    /// Overlays drawn last.
    pub elements: Vec<Renderable>,
    /// Layout constants.
    pub defaults: Defaults,
}

impl fmt::Debug for PieChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PieChart")
            .field("title", &self.title)
            .field("shape", &self.shape)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("values", &self.values)
            .field("elements", &self.elements.len())
            .finish_non_exhaustive()
    }
}

impl PieChart {
    /// Creates a pie chart over `values`.
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Creates a donut chart over `values`.
    pub fn donut(values: Vec<Value>) -> Self {
        Self {
            shape: PieShape::Donut,
            ..Self::new(values)
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

    /// Returns a copy with a slice style.
    #[must_use]
    pub fn with_slice_style(mut self, style: Style) -> Self {
        self.slice_style = style;
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
        self.height.unwrap_or(self.defaults.width)
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

    /// The largest square inside [`bounds`](Self::bounds), centered.
    #[must_use]
    pub fn canvas_bounds(&self) -> Bounds {
        let bounds = self.bounds();
        let diameter = bounds.width().min(bounds.height());
        bounds.fit(&Bounds::from_size(diameter, diameter))
    }

    /// Validates the chart and draws it with a renderer from `provider`,
    /// then saves the drawing to `w`.
    pub fn render<P: RendererProvider>(
        &self,
        provider: &P,
        w: &mut dyn io::Write,
    ) -> Result<(), ChartError> {
        let slices = self.slices()?;
        let mut r = provider.create(self.width(), self.height())?;
        self.draw(&mut r, &slices);
        r.save(w)
    }

    fn slices(&self) -> Result<Vec<Value>, ChartError> {
        if self.values.is_empty() {
            return Err(ChartError::NoValues);
        }
        let slices = normalize_values(&self.values);
        if slices.is_empty() {
            return Err(ChartError::NoNonZeroValues {
                kind: self.shape.name(),
            });
        }
        Ok(slices)
    }

    fn draw(&self, r: &mut dyn Renderer, slices: &[Value]) {
        r.set_dpi(self.dpi());
        let canvas = self.canvas_bounds();
        debug!(%canvas, shape = self.shape.name(), slices = slices.len(), "pie canvas fitted");

        draw_box(
            r,
            Bounds::from_size(self.width(), self.height()),
            &self.background.inherit_from(&Style {
                fill_color: Some(self.palette.background),
                stroke_color: Some(self.palette.background_stroke),
                stroke_width: Some(self.defaults.background_stroke_width),
                ..Style::default()
            }),
        );
        draw_box(
            r,
            canvas,
            &self.canvas.inherit_from(&Style {
                fill_color: Some(self.palette.canvas),
                stroke_color: Some(self.palette.canvas_stroke),
                stroke_width: Some(self.defaults.canvas_stroke_width),
                ..Style::default()
            }),
        );

        self.draw_slices(r, canvas, slices);

        if !self.title.is_empty() && !self.title_style.hidden {
            let style = self.title_style.inherit_from(
                &Style {
                    font: self.font.clone(),
                    font_color: Some(self.palette.text),
                    font_size: Some(scaled_title_font_size(self.width(), self.height())),
                    ..Style::default()
                }
                .with_text_layout(
                    TextHorizontalAlign::Center,
                    TextVerticalAlign::Top,
                    TextWrap::Word,
                ),
            );
            draw_within(r, &self.title, self.bounds(), &style);
        }

        let element_defaults = Style {
            font: self.font.clone(),
            ..Style::default()
        };
        for element in &self.elements {
            element(r, canvas, &element_defaults);
        }
    }

    fn draw_slices(&self, r: &mut dyn Renderer, canvas: Bounds, slices: &[Value]) {
        let (cx, cy) = canvas.center();
        let radii = Radii::new(self.shape, canvas.width().min(canvas.height()));

        if let [only] = slices {
            only.style
                .inherit_from(&self.slice_defaults(0))
                .write_drawing_to_renderer(r);
            r.circle(radii.slice, cx, cy);
            r.fill_stroke();
        } else {
            let mut total = 0.0;
            for (i, slice) in slices.iter().enumerate() {
                slice
                    .style
                    .inherit_from(&self.slice_defaults(i))
                    .write_drawing_to_renderer(r);
                r.move_to(cx, cy);
                r.arc_to(
                    cx,
                    cy,
                    radii.slice,
                    radii.slice,
                    percent_to_radians(total),
                    percent_to_radians(slice.value),
                );
                r.line_to(cx, cy);
                r.close();
                r.fill_stroke();
                total += slice.value;
            }
        }

        if let Some(hole) = radii.hole {
            let style = self.slice_style.inherit_from(&Style {
                stroke_color: Some(self.palette.background),
                stroke_width: Some(HOLE_STROKE_WIDTH),
                fill_color: Some(self.palette.background),
                ..Style::default()
            });
            style.write_drawing_to_renderer(r);
            r.circle(hole, cx, cy);
            r.fill_stroke();
        }

        let mut total = 0.0;
        for (i, slice) in slices.iter().enumerate() {
            if !slice.label.is_empty() {
                let style = slice.style.inherit_from(&self.slice_defaults(i));
                let theta = percent_to_radians(total + slice.value / 2.0);
                let (lx, ly) = circle_point(cx, cy, radii.label, theta);
                let tb = measure_text(r, &slice.label, &style);
                let x = (lx - (tb.width() >> 1)).max(0);
                let y = (ly + (tb.height() >> 1)).max(0);
                draw_text(r, &slice.label, x, y, &style);
            }
            total += slice.value;
        }
    }

    fn slice_defaults(&self, index: usize) -> Style {
        self.slice_style.inherit_from(&Style {
            stroke_color: Some(self.palette.background),
            stroke_width: Some(SLICE_STROKE_WIDTH),
            fill_color: Some(self.palette.series_color(index)),
            font: self.font.clone(),
            font_size: Some(scaled_font_size(self.width(), self.height())),
            font_color: Some(self.palette.text),
            ..Style::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{Op, RecordingRenderer, counting_provider};

    fn recorded(chart: &PieChart) -> RecordingRenderer {
        let slices = chart.slices().unwrap();
        let mut r = RecordingRenderer::new(chart.width(), chart.height());
        chart.draw(&mut r, &slices);
        r
    }

    fn arcs(r: &RecordingRenderer) -> Vec<(f64, f64, f64)> {
        r.ops
            .iter()
            .filter_map(|op| match op {
                Op::ArcTo {
                    rx, start, sweep, ..
                } => Some((*rx, *start, *sweep)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn configuration_errors_save_nothing() {
        let saves = Rc::new(Cell::new(0));
        let provider = counting_provider(saves.clone());

        let err = PieChart::default().render(&provider, &mut io::sink()).unwrap_err();
        assert_eq!(err.to_string(), "please provide at least one value");

        let zeros = vec![Value::new(0.0, "a"), Value::new(-1.0, "b")];
        let err = PieChart::new(zeros.clone())
            .render(&provider, &mut io::sink())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "pie chart must contain at least (1) non-zero value"
        );
        let err = PieChart::donut(zeros)
            .render(&provider, &mut io::sink())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "donut chart must contain at least (1) non-zero value"
        );
        assert_eq!(saves.get(), 0);
    }

    #[test]
    fn negative_values_leave_finite_slices() {
        let chart = PieChart::new(vec![
            Value::new(5.0, "a"),
            Value::new(3.0, "b"),
            Value::new(-8.0, "c"),
        ])
        .with_size(200, 200);
        let r = recorded(&chart);
        let arcs = arcs(&r);
        assert_eq!(arcs.len(), 2);
        assert!(arcs.iter().all(|(_, start, sweep)| start.is_finite() && *sweep > 0.0));
        let swept: f64 = arcs.iter().map(|(_, _, sweep)| sweep).sum();
        assert!((swept - percent_to_radians(1.0)).abs() < 1e-9, "{swept}");
        assert_eq!(r.texts(), vec!["a", "b"]);
    }

    #[test]
    fn default_size_is_square() {
        let chart = PieChart::new(vec![Value::new(1.0, "a")]);
        assert_eq!((chart.width(), chart.height()), (1024, 1024));
        let canvas = PieChart::new(vec![]).with_size(300, 200).canvas_bounds();
        assert_eq!(canvas.width(), canvas.height());
    }

    #[test]
    fn slices_sweep_their_share() {
        let chart = PieChart::new(vec![
            Value::new(1.0, ""),
            Value::new(1.0, ""),
            Value::new(2.0, ""),
        ])
        .with_size(200, 200);
        let r = recorded(&chart);
        let arcs = arcs(&r);
        assert_eq!(arcs.len(), 3);
        assert_eq!(arcs[0], (95.0, 0.0, percent_to_radians(0.25)));
        assert_eq!(arcs[1], (95.0, percent_to_radians(0.25), percent_to_radians(0.25)));
        assert_eq!(arcs[2], (95.0, percent_to_radians(0.5), percent_to_radians(0.5)));
        assert_eq!(r.count(&Op::MoveTo(100, 100)), 3);
    }

    #[test]
    fn single_value_is_a_circle() {
        let chart = PieChart::new(vec![Value::new(3.0, "all")]).with_size(200, 200);
        let r = recorded(&chart);
        assert!(arcs(&r).is_empty());
        assert_eq!(r.count(&Op::Circle(95.0, 100, 100)), 1);
        assert_eq!(r.texts(), vec!["all"]);
    }

    #[test]
    fn labels_sit_at_the_slice_middle() {
        let chart = PieChart::new(vec![Value::new(1.0, "abc"), Value::new(1.0, "")])
            .with_size(200, 200);
        let r = recorded(&chart);
        // Half way through the first slice is six o'clock.
        let label = r.ops.iter().find_map(|op| match op {
            Op::Text { body, x, y, .. } if body == "abc" => Some((*x, *y)),
            _ => None,
        });
        assert_eq!(label, Some((100 - 9, 100 + 63 + 5)));
    }

    #[test]
    fn donut_shrinks_slices_and_punches_a_hole() {
        let chart = PieChart::donut(vec![Value::new(1.0, "a"), Value::new(1.0, "b")])
            .with_size(200, 200);
        let r = recorded(&chart);
        let outer = 95.0 / 1.1;
        assert!(arcs(&r).iter().all(|(rx, ..)| *rx == outer / 1.25));
        assert_eq!(r.count(&Op::Circle(outer / 3.5, 100, 100)), 1);
        assert_eq!(r.texts(), vec!["a", "b"]);
    }

    #[test]
    fn renders_and_saves_once() {
        let saves = Rc::new(Cell::new(0));
        let chart = PieChart::new(vec![Value::new(1.0, "a"), Value::new(2.0, "b")])
            .with_title("Shares");
        let result = chart.render(&counting_provider(saves.clone()), &mut io::sink());
        assert!(result.is_ok(), "{result:?}");
        assert_eq!(saves.get(), 1);
    }
}
