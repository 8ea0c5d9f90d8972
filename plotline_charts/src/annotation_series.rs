// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callout labels pinned to data points.

use crate::math::to_px;
use crate::series::{first_values, last_values, y_formatter};
use crate::{
    Bounds, ChartError, Palette, Range, Renderer, Series, Style, Value2, ValueFormatter, YAxisType,
};

/// Horizontal run of the pointed end of an annotation.
pub const ANNOTATION_DELTA_WIDTH: i32 = 10;

/// Font size of annotations that do not set one.
pub const ANNOTATION_FONT_SIZE: f64 = 10.0;

/// Inner padding of annotations that do not set one.
pub const ANNOTATION_PADDING: Bounds = Bounds::new(5, 5, 5, 5);

/// A set of labelled points drawn as callouts pointing at their value.
///
/// Annotations are measured before the canvas settles, so the canvas shrinks
/// to keep them in view. They are left out of legends.
#[derive(Clone, Debug, Default)]
pub struct AnnotationSeries {
    /// Display name.
    pub name: String,
    /// Callout style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Labelled points.
    pub annotations: Vec<Value2>,
}

impl AnnotationSeries {
    /// Creates an unnamed series of `annotations`.
    pub fn new(annotations: Vec<Value2>) -> Self {
        Self {
            annotations,
            ..Self::default()
        }
    }

    /// Returns a copy with a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns a copy with a style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn style_defaults(defaults: &Style) -> Style {
        Style {
            font_color: Some(Palette::default().text),
            font: defaults.font.clone(),
            fill_color: Some(peniko::color::palette::css::WHITE),
            font_size: Some(ANNOTATION_FONT_SIZE),
            stroke_color: defaults.stroke_color,
            stroke_width: defaults.stroke_width,
            padding: Some(ANNOTATION_PADDING),
            ..Style::default()
        }
    }

    fn anchors<'a>(
        &'a self,
        canvas: Bounds,
        x: &'a Range,
        y: &'a Range,
        defaults: &Style,
    ) -> impl Iterator<Item = (i32, i32, Style, &'a str)> + 'a {
        let series_style = self.style.inherit_from(&Self::style_defaults(defaults));
        self.annotations.iter().map(move |a| {
            let lx = canvas.left + x.translate(a.x);
            let ly = canvas.bottom - y.translate(a.y);
            (lx, ly, a.style.inherit_from(&series_style), a.label.as_str())
        })
    }

    /// The box covering every callout, for canvas sizing.
    ///
    /// A hidden or empty series measures as an inverted box that any
    /// [`Bounds::grow`] ignores.
    pub fn measure(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        x: &Range,
        y: &Range,
        defaults: &Style,
    ) -> Bounds {
        let mut b = Bounds::new(i32::MAX, i32::MAX, 0, 0);
        if self.style.hidden {
            return b;
        }
        for (lx, ly, style, label) in self.anchors(canvas, x, y, defaults) {
            let ab = measure_annotation(r, &style, lx, ly, label);
            b.top = b.top.min(ab.top);
            b.left = b.left.min(ab.left);
            b.right = b.right.max(ab.right);
            b.bottom = b.bottom.max(ab.bottom);
        }
        b
    }
}

fn callout_geometry(r: &mut dyn Renderer, style: &Style, label: &str) -> (i32, i32, Bounds) {
    style.write_text_to_renderer(r);
    let text = r.measure_text(label);
    (
        text.width(),
        text.height() >> 1,
        style.padding_or(ANNOTATION_PADDING),
    )
}

fn measure_annotation(r: &mut dyn Renderer, style: &Style, lx: i32, ly: i32, label: &str) -> Bounds {
    let (tw, half_th, pad) = callout_geometry(r, style, label);
    r.reset_style();
    let stroke = to_px(style.stroke_width_or(0.0));
    Bounds::new(
        ly - (pad.top + half_th),
        lx,
        lx + pad.left + pad.right + tw + ANNOTATION_DELTA_WIDTH + stroke,
        ly + pad.bottom + half_th,
    )
}

fn draw_annotation(r: &mut dyn Renderer, style: &Style, lx: i32, ly: i32, label: &str) {
    let (tw, half_th, pad) = callout_geometry(r, style, label);
    let top = ly - (pad.top + half_th);
    let bottom = ly + pad.bottom + half_th;
    let right = lx + pad.left + pad.right + tw + ANNOTATION_DELTA_WIDTH;
    let notch = lx + ANNOTATION_DELTA_WIDTH;

    style.write_drawing_to_renderer(r);
    r.move_to(lx, ly);
    r.line_to(notch, top);
    r.line_to(right, top);
    r.line_to(right, bottom);
    r.line_to(notch, bottom);
    r.line_to(lx, ly);
    r.close();
    r.fill_stroke();

    style.write_text_to_renderer(r);
    r.text(label, lx + pad.left + ANNOTATION_DELTA_WIDTH, ly + half_th);
    r.reset_style();
}

impl Series for AnnotationSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn y_axis(&self) -> YAxisType {
        self.y_axis
    }

    fn validate(&self) -> Result<(), ChartError> {
        if self.annotations.is_empty() {
            return Err(ChartError::invalid_series(
                "annotation series requires annotations to be set and not empty",
            ));
        }
        Ok(())
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style) {
        if self.style.hidden {
            return;
        }
        for (lx, ly, style, label) in self.anchors(canvas, x, y, defaults) {
            draw_annotation(r, &style, lx, ly, label);
        }
    }

    fn as_annotation(&self) -> Option<&AnnotationSeries> {
        Some(self)
    }
}

fn label_formatter(series: &dyn Series, explicit: Option<ValueFormatter>) -> ValueFormatter {
    explicit
        .or_else(|| y_formatter(series))
        .unwrap_or(ValueFormatter::Float)
}

fn annotate(series: &dyn Series, suffix: &str, annotations: Vec<Value2>) -> AnnotationSeries {
    AnnotationSeries {
        name: format!("{} - {suffix}", series.name()),
        style: series.style().clone(),
        y_axis: series.y_axis(),
        annotations,
    }
}

/// Labels the first value of `series`.
///
/// The label uses `formatter`, else the series' own Y formatter, else
/// [`ValueFormatter::Float`].
pub fn first_value_annotation(
    series: &dyn Series,
    formatter: Option<ValueFormatter>,
) -> Result<AnnotationSeries, ChartError> {
    let (x, y) = first_values(series).ok_or(ChartError::NoValues)?;
    let vf = label_formatter(series, formatter);
    Ok(annotate(series, "First Value", vec![Value2::new(x, y, vf.format(y))]))
}

/// Labels the last value of `series`.
pub fn last_value_annotation(
    series: &dyn Series,
    formatter: Option<ValueFormatter>,
) -> Result<AnnotationSeries, ChartError> {
    let (x, y) = last_values(series).ok_or(ChartError::NoValues)?;
    let vf = label_formatter(series, formatter);
    Ok(annotate(series, "Last Value", vec![Value2::new(x, y, vf.format(y))]))
}

/// Labels both bounds of the last value of a bounded `series`.
pub fn bounded_last_values_annotation(
    series: &dyn Series,
    formatter: Option<ValueFormatter>,
) -> Result<AnnotationSeries, ChartError> {
    let (x, y1, y2) = series
        .as_bounded_last_values()
        .map(|b| b.bounded_last_values())
        .ok_or(ChartError::NoValues)?;
    let vf = label_formatter(series, formatter);
    Ok(annotate(
        series,
        "Last Values",
        vec![
            Value2::new(x, y1, vf.format(y1)),
            Value2::new(x, y2, vf.format(y2)),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::testing::{Op, RecordingRenderer, linear_range};
    use crate::{BollingerBandsSeries, ContinuousSeries};

    fn ranges() -> (Range, Range) {
        (
            Range::new(0.0, 10.0).with_domain(100),
            Range::new(0.0, 10.0).with_domain(100),
        )
    }

    fn defaults() -> Style {
        Style::default().with_stroke_width(1.0)
    }

    #[test]
    fn measure_covers_the_callout() {
        let (x, y) = ranges();
        let series = AnnotationSeries::new(vec![Value2::new(5.0, 5.0, "abc")]);
        let mut r = RecordingRenderer::new(100, 100);
        let b = series.measure(&mut r, Bounds::from_size(100, 100), &x, &y, &defaults());
        assert_eq!(b, Bounds::new(40, 50, 89, 60));
    }

    #[test]
    fn renders_a_pentagon_and_label() {
        let (x, y) = ranges();
        let series = AnnotationSeries::new(vec![Value2::new(5.0, 5.0, "abc")]);
        let mut r = RecordingRenderer::new(100, 100);
        series.render(&mut r, Bounds::from_size(100, 100), &x, &y, &defaults());
        assert_eq!(
            r.ops,
            vec![
                Op::MoveTo(50, 50),
                Op::LineTo(60, 40),
                Op::LineTo(88, 40),
                Op::LineTo(88, 60),
                Op::LineTo(60, 60),
                Op::LineTo(50, 50),
                Op::Close,
                Op::FillStroke,
                Op::Text {
                    body: "abc".into(),
                    x: 65,
                    y: 55,
                    rotation: None,
                    color: Palette::default().text,
                },
            ]
        );
    }

    #[test]
    fn hidden_measures_empty() {
        let (x, y) = ranges();
        let series =
            AnnotationSeries::new(vec![Value2::new(5.0, 5.0, "abc")]).with_style(Style::hidden());
        let mut r = RecordingRenderer::new(100, 100);
        let b = series.measure(&mut r, Bounds::from_size(100, 100), &x, &y, &defaults());
        assert_eq!(b, Bounds::new(i32::MAX, i32::MAX, 0, 0));
        series.render(&mut r, Bounds::from_size(100, 100), &x, &y, &defaults());
        assert!(r.ops.is_empty());
    }

    #[test]
    fn requires_annotations() {
        let err = AnnotationSeries::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "annotation series requires annotations to be set and not empty"
        );
    }

    #[test]
    fn value_helpers() {
        let inner = ContinuousSeries::new(linear_range(1, 5), linear_range(1, 5)).with_name("s");
        let first = first_value_annotation(&inner, None).unwrap();
        assert_eq!(first.name, "s - First Value");
        assert_eq!(first.annotations[0].label, "1.00");
        let last = last_value_annotation(&inner, Some(ValueFormatter::Int)).unwrap();
        assert_eq!(last.name, "s - Last Value");
        assert_eq!((last.annotations[0].x, last.annotations[0].label.as_str()), (5.0, "5"));
    }

    #[test]
    fn bounded_helper_labels_both_bands() {
        let inner = ContinuousSeries::new(linear_range(1, 30), linear_range(1, 30));
        let bands = BollingerBandsSeries::new(Rc::new(inner)).with_name("bb");
        let ann = bounded_last_values_annotation(&bands, None).unwrap();
        assert_eq!(ann.name, "bb - Last Values");
        assert_eq!(ann.annotations.len(), 2);
        assert!(ann.annotations[0].y > ann.annotations[1].y);
        let plain = ContinuousSeries::new(vec![1.0], vec![1.0]);
        assert!(bounded_last_values_annotation(&plain, None).is_err());
    }
}
