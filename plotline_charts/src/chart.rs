// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The line chart orchestrator.
//!
//! A [`Chart`] turns its series into ranges, settles the canvas against the
//! space its axes and annotations need, then draws everything in a fixed
//! order: background, canvas, axes, series, title and finally elements.

use core::fmt;
use std::borrow::Cow;
use std::io;
use std::rc::Rc;

use plotline_text::FontFamily;
use tracing::{debug, trace};

use crate::draw::{draw_box, draw_title};
use crate::error::RangeAxis;
use crate::math::{round_down, round_to, round_up};
use crate::tick::widen_to_ticks;
use crate::{
    Bounds, ChartError, Defaults, Legend, Palette, Range, Renderer, RendererProvider, SeriesRef,
    Style, Tick, ValueFormatter, XAxis, YAxis, YAxisType,
};

/// Font size series labels use when their style does not set one.
const SERIES_FONT_SIZE: f64 = 10.0;

/// A drawing callback run after everything else, with the final canvas and
/// the element default style.
pub type Renderable = Rc<dyn Fn(&mut dyn Renderer, Bounds, &Style)>;

/// An overlay drawn on top of a finished [`Chart`].
#[derive(Clone)]
pub enum Element {
    /// A legend listing the chart's visible series.
    Legend(Legend),
    /// Any other drawing.
    Custom(Renderable),
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legend(legend) => f.debug_tuple("Legend").field(legend).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl Element {
    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, chart: &Chart, defaults: &Style) {
        match self {
            Self::Legend(legend) => legend.render(r, canvas, chart, defaults),
            Self::Custom(f) => f(r, canvas, defaults),
        }
    }
}

/// The ranges a render pass maps values through.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ChartRanges {
    pub(crate) x: Range,
    pub(crate) y: Range,
    pub(crate) y_secondary: Range,
}

impl ChartRanges {
    fn with_domains(self, canvas: Bounds) -> Self {
        Self {
            x: self.x.with_domain(canvas.width()),
            y: self.y.with_domain(canvas.height()),
            y_secondary: self.y_secondary.with_domain(canvas.height()),
        }
    }

    fn for_axis(&self, axis: YAxisType) -> &Range {
        match axis {
            YAxisType::Primary => &self.y,
            YAxisType::Secondary => &self.y_secondary,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct AxisTicks {
    x: Vec<Tick>,
    y: Vec<Tick>,
    y_secondary: Vec<Tick>,
}

/// Running min/max of a set of values.
#[derive(Clone, Copy, Debug)]
struct Extent {
    min: f64,
    max: f64,
}

impl Extent {
    const EMPTY: Self = Self {
        min: f64::MAX,
        max: -f64::MAX,
    };

    fn add(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

/// Range of an axis: explicit ticks win, then an explicit range, then the
/// data, optionally rounded outward.
fn axis_range(configured: Option<Range>, ticks: &[Tick], data: Extent, round: bool) -> Range {
    let base = configured.unwrap_or_default();
    if !ticks.is_empty() {
        let mut e = Extent::EMPTY;
        for t in ticks {
            e.add(t.value);
        }
        return base.with_min(e.min).with_max(e.max);
    }
    if !base.is_zero() {
        return base;
    }
    let range = base.with_min(data.min).with_max(data.max);
    if !round {
        return range;
    }
    let granularity = round_to(range.delta());
    range
        .with_min(round_down(range.min(), granularity))
        .with_max(round_up(range.max(), granularity))
}

fn check_range(range: &Range, axis: RangeAxis) -> Result<(), ChartError> {
    let delta = range.delta();
    if delta.is_infinite() {
        Err(ChartError::InfiniteRangeDelta(axis))
    } else if delta.is_nan() {
        Err(ChartError::NanRangeDelta(axis))
    } else if delta == 0.0 {
        Err(ChartError::ZeroRangeDelta(axis))
    } else {
        Ok(())
    }
}

/// A line chart over any number of series, with an optional secondary Y axis.
#[derive(Clone)]
pub struct Chart {
    /// Title drawn centered at the top; empty for none.
    pub title: String,
    /// Title style.
    pub title_style: Style,
    /// Font used wherever a style does not name one.
    pub font: Option<FontFamily>,
    /// Width in pixels; the default width when unset.
    pub width: Option<i32>,
    /// Height in pixels; the default height when unset.
    pub height: Option<i32>,
    /// Output resolution; the default DPI when unset.
    pub dpi: Option<f64>,
    /// Background style. Its padding insets the canvas.
    pub background: Style,
    /// Canvas style.
    pub canvas: Style,
    /// Colors for chrome and series.
    pub palette: Palette,
    /// Horizontal axis.
    pub x_axis: XAxis,
    /// Primary vertical axis, right of the canvas.
    pub y_axis: YAxis,
    /// Secondary vertical axis, left of the canvas.
    pub y_axis_secondary: YAxis,
    /// Series, drawn in order.
    pub series: Vec<SeriesRef>,
    /// Overlays drawn last.
    pub elements: Vec<Element>,
    /// Layout constants.
    pub defaults: Defaults,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("title", &self.title)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("x_axis", &self.x_axis)
            .field("y_axis", &self.y_axis)
            .field("y_axis_secondary", &self.y_axis_secondary)
            .field(
                "series",
                &self.series.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_style: Style::default(),
            font: None,
            width: None,
            height: None,
            dpi: None,
            background: Style::default(),
            canvas: Style::default(),
            palette: Palette::default(),
            x_axis: XAxis::default(),
            y_axis: YAxis::primary(),
            y_axis_secondary: YAxis::secondary(),
            series: Vec::new(),
            elements: Vec::new(),
            defaults: Defaults::default(),
        }
    }
}

impl Chart {
    /// Creates a chart over `series` with default settings.
    pub fn new(series: Vec<SeriesRef>) -> Self {
        Self {
            series,
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

    /// Returns a copy with an output resolution.
    #[must_use]
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = Some(dpi);
        self
    }

    /// Returns a copy with a horizontal axis.
    #[must_use]
    pub fn with_x_axis(mut self, axis: XAxis) -> Self {
        self.x_axis = axis;
        self
    }

    /// Returns a copy with a primary vertical axis.
    #[must_use]
    pub fn with_y_axis(mut self, axis: YAxis) -> Self {
        self.y_axis = axis;
        self
    }

    /// Returns a copy with a secondary vertical axis.
    #[must_use]
    pub fn with_y_axis_secondary(mut self, axis: YAxis) -> Self {
        self.y_axis_secondary = axis;
        self
    }

    /// Returns a copy with a background style.
    #[must_use]
    pub fn with_background(mut self, style: Style) -> Self {
        self.background = style;
        self
    }

    /// Returns a copy with a canvas style.
    #[must_use]
    pub fn with_canvas(mut self, style: Style) -> Self {
        self.canvas = style;
        self
    }

    /// Returns a copy with a palette.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Returns a copy with an extra overlay.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
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

    /// The chart area inset by the background padding, before any axis
    /// adjustment.
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

    /// Validates the chart and draws it with a renderer from `provider`,
    /// then saves the drawing to `w`.
    ///
    /// Every check runs before the renderer is created, so an error never
    /// leaves partial output behind.
    pub fn render<P: RendererProvider>(
        &self,
        provider: &P,
        w: &mut dyn io::Write,
    ) -> Result<(), ChartError> {
        let (ranges, formatters) = self.prepare()?;
        let mut r = provider.create(self.width(), self.height())?;
        self.draw(&mut r, ranges, &formatters);
        r.save(w)
    }

    /// Runs every check a render needs and returns the data ranges and
    /// value formatters.
    fn prepare(&self) -> Result<(ChartRanges, [ValueFormatter; 3]), ChartError> {
        if self.series.is_empty() {
            return Err(ChartError::NoSeries);
        }
        if self.series.iter().all(|s| s.style().hidden) {
            return Err(ChartError::NoVisibleSeries);
        }
        for s in &self.series {
            s.validate()?;
        }
        let ranges = self.ranges()?;
        debug!(?ranges, "chart ranges computed");
        Ok((ranges, self.value_formatters()))
    }

    fn draw(&self, r: &mut dyn Renderer, ranges: ChartRanges, formatters: &[ValueFormatter; 3]) {
        r.set_dpi(self.dpi());
        draw_box(
            r,
            Bounds::from_size(self.width(), self.height()),
            &self.background.inherit_from(&self.background_defaults()),
        );

        let y_secondary = self.secondary_axis();
        let mut canvas = self.bounds();
        let mut ranges = ranges.with_domains(canvas);
        let mut ticks = AxisTicks::default();

        if self.has_axes() {
            // Growing the canvas changes tick spacing, so settle twice.
            for pass in 0..2 {
                (ticks, ranges) = self.axes_ticks(r, &y_secondary, ranges, formatters);
                canvas = self.axes_adjusted_canvas(r, &y_secondary, canvas, &ranges, &ticks);
                ranges = ranges.with_domains(canvas);
                debug!(pass, %canvas, "canvas adjusted for axes");
            }
        }

        if self.has_annotations() {
            canvas = self.annotation_adjusted_canvas(r, canvas, &ranges);
            ranges = ranges.with_domains(canvas);
            (ticks, ranges) = self.axes_ticks(r, &y_secondary, ranges, formatters);
            debug!(%canvas, "canvas adjusted for annotations");
        }

        draw_box(r, canvas, &self.canvas.inherit_from(&self.canvas_defaults()));
        self.draw_axes(r, &y_secondary, canvas, &ranges, &ticks);

        for (i, s) in self.series.iter().enumerate() {
            if s.style().hidden {
                continue;
            }
            s.render(
                r,
                canvas,
                &ranges.x,
                ranges.for_axis(s.y_axis()),
                &self.series_defaults(i),
            );
            trace!(series = s.name(), "series rendered");
        }

        self.draw_title(r);

        let element_defaults = self.element_defaults();
        for element in &self.elements {
            element.render(r, canvas, self, &element_defaults);
        }
    }

    /// Ranges from the series data, explicit axis ranges and explicit ticks,
    /// checked for degenerate deltas.
    pub(crate) fn ranges(&self) -> Result<ChartRanges, ChartError> {
        let mut x = Extent::EMPTY;
        let mut y = Extent::EMPTY;
        let mut y_secondary = Extent::EMPTY;

        for s in self.series.iter().filter(|s| !s.style().hidden) {
            let target = match s.y_axis() {
                YAxisType::Primary => &mut y,
                YAxisType::Secondary => &mut y_secondary,
            };
            if let Some(bvs) = s.as_bounded_values() {
                for i in 0..bvs.len() {
                    let (vx, vy1, vy2) = bvs.bounded_values(i);
                    x.add(vx);
                    target.add(vy1);
                    target.add(vy2);
                }
            } else if let Some(vs) = s.as_values() {
                for i in 0..vs.len() {
                    let (vx, vy) = vs.values(i);
                    x.add(vx);
                    target.add(vy);
                }
            }
        }

        let ranges = ChartRanges {
            x: axis_range(self.x_axis.range, &self.x_axis.ticks, x, false),
            y: axis_range(
                self.y_axis.range,
                &self.y_axis.ticks,
                y,
                !self.y_axis.is_hidden(),
            ),
            y_secondary: if self.has_secondary_series() {
                axis_range(
                    self.y_axis_secondary.range,
                    &self.y_axis_secondary.ticks,
                    y_secondary,
                    !self.y_axis_secondary.is_hidden(),
                )
            } else {
                Range::default()
            },
        };

        check_range(&ranges.x, RangeAxis::X)?;
        check_range(&ranges.y, RangeAxis::Y)?;
        if self.has_secondary_series() {
            check_range(&ranges.y_secondary, RangeAxis::SecondaryY)?;
        }
        Ok(ranges)
    }

    /// `(x, y, secondary y)` formatters: an axis formatter wins over the
    /// last series that provides one, which wins over float.
    fn value_formatters(&self) -> [ValueFormatter; 3] {
        let (mut x, mut y, mut y_secondary) = (None, None, None);
        for s in &self.series {
            if let Some(provider) = s.as_value_formatter_provider() {
                let (sx, sy) = provider.value_formatters();
                x = Some(sx);
                match s.y_axis() {
                    YAxisType::Primary => y = Some(sy),
                    YAxisType::Secondary => y_secondary = Some(sy),
                }
            }
        }
        let pick = |axis: &Option<ValueFormatter>, series: Option<ValueFormatter>| {
            axis.clone().or(series).unwrap_or(ValueFormatter::Float)
        };
        [
            pick(&self.x_axis.value_formatter, x),
            pick(&self.y_axis.value_formatter, y),
            pick(&self.y_axis_secondary.value_formatter, y_secondary),
        ]
    }

    fn secondary_axis(&self) -> Cow<'_, YAxis> {
        if self.y_axis_secondary.axis_type == YAxisType::Secondary {
            Cow::Borrowed(&self.y_axis_secondary)
        } else {
            let mut axis = self.y_axis_secondary.clone();
            axis.axis_type = YAxisType::Secondary;
            Cow::Owned(axis)
        }
    }

    fn has_axes(&self) -> bool {
        !self.x_axis.is_hidden() || !self.y_axis.is_hidden() || self.shows_secondary_axis()
    }

    /// Whether any visible series is plotted against the secondary axis.
    fn has_secondary_series(&self) -> bool {
        self.series
            .iter()
            .any(|s| !s.style().hidden && s.y_axis() == YAxisType::Secondary)
    }

    fn shows_secondary_axis(&self) -> bool {
        !self.y_axis_secondary.is_hidden() && self.has_secondary_series()
    }

    fn has_annotations(&self) -> bool {
        self.series
            .iter()
            .any(|s| s.as_annotation().is_some_and(|a| !a.style.hidden))
    }

    /// Ticks for every visible axis, with each range widened to its ticks.
    fn axes_ticks(
        &self,
        r: &mut dyn Renderer,
        y_secondary: &YAxis,
        ranges: ChartRanges,
        [xf, yf, yf_secondary]: &[ValueFormatter; 3],
    ) -> (AxisTicks, ChartRanges) {
        let defaults = self.axis_defaults();
        let mut ticks = AxisTicks::default();
        let mut ranges = ranges;
        if !self.x_axis.is_hidden() {
            ticks.x = self.x_axis.ticks(r, &ranges.x, &defaults, xf, &self.defaults);
            ranges.x = widen_to_ticks(ranges.x, &ticks.x);
        }
        if !self.y_axis.is_hidden() {
            ticks.y = self.y_axis.ticks(r, &ranges.y, &defaults, yf, &self.defaults);
            ranges.y = widen_to_ticks(ranges.y, &ticks.y);
        }
        if self.shows_secondary_axis() {
            ticks.y_secondary = y_secondary.ticks(
                r,
                &ranges.y_secondary,
                &defaults,
                yf_secondary,
                &self.defaults,
            );
            ranges.y_secondary = widen_to_ticks(ranges.y_secondary, &ticks.y_secondary);
        }
        trace!(
            x = ticks.x.len(),
            y = ticks.y.len(),
            y_secondary = ticks.y_secondary.len(),
            "axis ticks generated"
        );
        (ticks, ranges)
    }

    fn axes_adjusted_canvas(
        &self,
        r: &mut dyn Renderer,
        y_secondary: &YAxis,
        canvas: Bounds,
        ranges: &ChartRanges,
        ticks: &AxisTicks,
    ) -> Bounds {
        let defaults = self.axis_defaults();
        let mut outer = canvas;
        if !self.x_axis.is_hidden() {
            let b = self
                .x_axis
                .measure(r, canvas, &ranges.x, &defaults, &ticks.x, &self.defaults);
            outer = outer.grow(&b);
        }
        if !self.y_axis.is_hidden() {
            let b = self
                .y_axis
                .measure(r, canvas, &ranges.y, &defaults, &ticks.y, &self.defaults);
            outer = outer.grow(&b);
        }
        if self.shows_secondary_axis() {
            let b = y_secondary.measure(
                r,
                canvas,
                &ranges.y_secondary,
                &defaults,
                &ticks.y_secondary,
                &self.defaults,
            );
            outer = outer.grow(&b);
        }
        canvas.outer_constrain(&self.bounds(), &outer)
    }

    fn annotation_adjusted_canvas(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        ranges: &ChartRanges,
    ) -> Bounds {
        let mut outer = canvas;
        for (i, s) in self.series.iter().enumerate() {
            let Some(annotations) = s.as_annotation() else {
                continue;
            };
            if annotations.style.hidden {
                continue;
            }
            let b = annotations.measure(
                r,
                canvas,
                &ranges.x,
                ranges.for_axis(annotations.y_axis),
                &self.series_defaults(i),
            );
            outer = outer.grow(&b);
        }
        canvas.outer_constrain(&self.bounds(), &outer)
    }

    fn draw_axes(
        &self,
        r: &mut dyn Renderer,
        y_secondary: &YAxis,
        canvas: Bounds,
        ranges: &ChartRanges,
        ticks: &AxisTicks,
    ) {
        let defaults = self.axis_defaults();
        if !self.x_axis.is_hidden() {
            self.x_axis
                .render(r, canvas, &ranges.x, &defaults, &ticks.x, &self.defaults);
        }
        if !self.y_axis.is_hidden() {
            self.y_axis
                .render(r, canvas, &ranges.y, &defaults, &ticks.y, &self.defaults);
        }
        if self.shows_secondary_axis() {
            y_secondary.render(
                r,
                canvas,
                &ranges.y_secondary,
                &defaults,
                &ticks.y_secondary,
                &self.defaults,
            );
        }
    }

    fn draw_title(&self, r: &mut dyn Renderer) {
        if self.title.is_empty() || self.title_style.hidden {
            return;
        }
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

    /// Default style of the series at `index`.
    pub(crate) fn series_defaults(&self, index: usize) -> Style {
        let color = self.palette.series_color(index);
        Style {
            dot_color: Some(color),
            stroke_color: Some(color),
            stroke_width: Some(self.defaults.series_line_width),
            font: self.font.clone(),
            font_size: Some(SERIES_FONT_SIZE),
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

    fn element_defaults(&self) -> Style {
        Style {
            font: self.font.clone(),
            ..Style::default()
        }
    }
}
