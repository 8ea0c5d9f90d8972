// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X and Y axes.
//!
//! Each axis has two phases per render. `measure` computes the box its
//! labels and name would occupy around a provisional canvas, without drawing.
//! `render` draws the axis line, tick marks, labels, name and grid lines.

use tracing::trace;

use crate::style::{TextHorizontalAlign, TextVerticalAlign, TextWrap};
use crate::text::{draw_text, draw_within, measure_lines, measure_text, wrap_fit};
use crate::tick::axis_ticks;
use crate::{Bounds, Defaults, Range, Renderer, Style, Tick, ValueFormatter};

/// Where X axis labels sit relative to their ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickPosition {
    /// Each label is centered under its tick.
    #[default]
    UnderTick,
    /// Each label is centered between its tick and the previous one.
    BetweenTicks,
}

/// Which side of the canvas a Y axis occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YAxisType {
    /// The right side.
    #[default]
    Primary,
    /// The left side.
    Secondary,
}

/// A line across the canvas at a data value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridLine {
    /// Position in data units.
    pub value: f64,
    /// Whether the minor grid style applies.
    pub is_minor: bool,
    /// Line style, inheriting from the axis grid style.
    pub style: Style,
}

impl GridLine {
    /// Creates a major grid line.
    pub fn new(value: f64, style: Style) -> Self {
        Self {
            value,
            is_minor: false,
            style,
        }
    }

    /// Draws the line. Vertical lines span the canvas height at an X value;
    /// horizontal lines span its width at a Y value.
    pub fn render(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        range: &Range,
        vertical: bool,
        defaults: &Style,
    ) {
        self.style.inherit_from(defaults).write_stroke_to_renderer(r);
        if vertical {
            let x = canvas.left + range.translate(self.value);
            r.move_to(x, canvas.bottom);
            r.line_to(x, canvas.top);
        } else {
            let y = canvas.bottom - range.translate(self.value);
            r.move_to(canvas.left, y);
            r.line_to(canvas.right, y);
        }
        r.stroke();
    }
}

/// Grid lines at every interior tick, alternating major and minor.
///
/// Fewer than three ticks produce no lines.
pub fn generate_grid_lines(ticks: &[Tick], major: &Style, minor: &Style) -> Vec<GridLine> {
    if ticks.len() < 3 {
        return Vec::new();
    }
    ticks[1..ticks.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let is_minor = i % 2 == 1;
            GridLine {
                value: t.value,
                is_minor,
                style: if is_minor { minor.clone() } else { major.clone() },
            }
        })
        .collect()
}

/// Shared grid configuration and drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    /// Explicit lines; generated from ticks when empty.
    pub lines: Vec<GridLine>,
    /// Style of major lines; `None` hides them.
    pub major: Option<Style>,
    /// Style of minor lines; `None` hides them.
    pub minor: Option<Style>,
}

impl Grid {
    fn is_visible(&self) -> bool {
        self.major.is_some() || self.minor.is_some()
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, range: &Range, ticks: &[Tick], vertical: bool) {
        if !self.is_visible() {
            return;
        }
        let major = self.major.clone().unwrap_or_default();
        let minor = self.minor.clone().unwrap_or_default();
        let lines = if self.lines.is_empty() {
            generate_grid_lines(ticks, &major, &minor)
        } else {
            self.lines.clone()
        };
        for line in &lines {
            let defaults = if line.is_minor {
                self.minor.as_ref()
            } else {
                self.major.as_ref()
            };
            if let Some(defaults) = defaults {
                line.render(r, canvas, range, vertical, defaults);
            }
        }
    }
}

/// The horizontal axis under the canvas.
#[derive(Clone, Debug, Default)]
pub struct XAxis {
    /// Axis name drawn under the labels.
    pub name: Option<String>,
    /// Style of the name.
    pub name_style: Style,
    /// Style of the axis line and labels. `hidden` hides the whole axis.
    pub style: Style,
    /// Formatter overriding the series-provided one.
    pub value_formatter: Option<ValueFormatter>,
    /// Range overriding the one computed from series.
    pub range: Option<Range>,
    /// Style of tick marks and labels, inheriting from `style`.
    pub tick_style: Style,
    /// Explicit ticks; generated when empty.
    pub ticks: Vec<Tick>,
    /// Label placement.
    pub tick_position: TickPosition,
    /// Vertical grid lines.
    pub grid: Grid,
}

impl XAxis {
    /// A hidden axis.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            style: Style::hidden(),
            ..Self::default()
        }
    }

    /// Returns a copy with a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns a copy with an explicit range.
    #[must_use]
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Returns a copy with explicit ticks.
    #[must_use]
    pub fn with_ticks(mut self, ticks: Vec<Tick>) -> Self {
        self.ticks = ticks;
        self
    }

    /// Returns a copy with a formatter.
    #[must_use]
    pub fn with_value_formatter(mut self, vf: ValueFormatter) -> Self {
        self.value_formatter = Some(vf);
        self
    }

    /// Returns a copy with a tick position.
    #[must_use]
    pub fn with_tick_position(mut self, position: TickPosition) -> Self {
        self.tick_position = position;
        self
    }

    /// Returns a copy with a style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Returns a copy with visible grid lines.
    #[must_use]
    pub fn with_grid(mut self, major: Style, minor: Style) -> Self {
        self.grid.major = Some(major);
        self.grid.minor = Some(minor);
        self
    }

    /// Whether the axis is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.style.hidden
    }

    fn tick_style(&self, defaults: &Style) -> Style {
        self.tick_style.inherit_from(&self.style.inherit_from(defaults))
    }

    fn shows_name(&self) -> bool {
        !self.name_style.hidden && self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Ticks for this axis over `range`.
    pub fn ticks(
        &self,
        r: &mut dyn Renderer,
        range: &Range,
        defaults: &Style,
        vf: &ValueFormatter,
        config: &Defaults,
    ) -> Vec<Tick> {
        axis_ticks(&self.ticks, r, range, false, &self.tick_style(defaults), vf, config)
    }

    /// Box the labels and name would occupy below `canvas`.
    pub fn measure(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        range: &Range,
        defaults: &Style,
        ticks: &[Tick],
        config: &Defaults,
    ) -> Bounds {
        let style = self.tick_style(defaults);
        let mut left = canvas.left;
        let mut right = canvas.right;
        let mut bottom = canvas.bottom;

        for (i, t) in ticks.iter().enumerate() {
            let tb = measure_text(r, &t.label, &style);
            let tx = canvas.left + range.translate(t.value);
            let ty = canvas.bottom + config.x_axis_margin + tb.height();
            let span = match self.tick_position {
                TickPosition::UnderTick => Some((tx - (tb.width() >> 1), tx + (tb.width() >> 1))),
                TickPosition::BetweenTicks if i > 0 => {
                    Some((canvas.left + range.translate(ticks[i - 1].value), tx))
                }
                TickPosition::BetweenTicks => None,
            };
            if let Some((ltx, rtx)) = span {
                left = left.min(ltx);
                right = right.max(rtx);
            }
            bottom = bottom.max(ty);
        }

        if self.shows_name() {
            let name_style = self.name_style.inherit_from(defaults);
            let tb = measure_text(r, self.name.as_deref().unwrap_or_default(), &name_style);
            bottom += config.x_axis_margin + tb.height();
        }

        Bounds::new(canvas.bottom, left, right, bottom)
    }

    /// Draws the axis below `canvas`.
    pub fn render(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        range: &Range,
        defaults: &Style,
        ticks: &[Tick],
        config: &Defaults,
    ) {
        let style = self.tick_style(defaults);
        style.write_stroke_to_renderer(r);
        r.move_to(canvas.left, canvas.bottom);
        r.line_to(canvas.right, canvas.bottom);
        r.stroke();

        let mut max_text_height = 0;
        for (i, t) in ticks.iter().enumerate() {
            let tx = canvas.left + range.translate(t.value);
            style.write_stroke_to_renderer(r);
            r.move_to(tx, canvas.bottom);
            r.line_to(tx, canvas.bottom + config.vertical_tick_height);
            r.stroke();

            let tb = measure_text(r, &t.label, &style);
            match self.tick_position {
                TickPosition::UnderTick => {
                    let (x, y) = if style.text_rotation() == 0.0 {
                        (
                            tx - (tb.width() >> 1),
                            canvas.bottom + config.x_axis_margin + tb.height(),
                        )
                    } else {
                        (tx, canvas.bottom + 2 * config.x_axis_margin)
                    };
                    draw_text(r, &t.label, x, y, &style);
                    max_text_height = max_text_height.max(tb.height());
                }
                TickPosition::BetweenTicks if i > 0 => {
                    let ltx = canvas.left + range.translate(ticks[i - 1].value);
                    let within = style.inherit_from(&Style::default().with_text_layout(
                        TextHorizontalAlign::Center,
                        TextVerticalAlign::Top,
                        TextWrap::Word,
                    ));
                    let lines = wrap_fit(r, &t.label, tx - ltx, &within);
                    max_text_height = max_text_height.max(measure_lines(r, &lines, &within).height());
                    let top = canvas.bottom + config.x_axis_margin;
                    draw_within(r, &t.label, Bounds::new(top, ltx, tx, top), &within);
                }
                TickPosition::BetweenTicks => {}
            }
        }

        if self.shows_name() {
            let name = self.name.as_deref().unwrap_or_default();
            let name_style = self.name_style.inherit_from(defaults);
            let tb = measure_text(r, name, &name_style);
            let tx = canvas.right - ((canvas.width() >> 1) + (tb.width() >> 1));
            let ty = canvas.bottom
                + config.x_axis_margin
                + max_text_height
                + config.x_axis_margin
                + tb.height();
            draw_text(r, name, tx, ty, &name_style);
        }

        self.grid.render(r, canvas, range, ticks, true);
        trace!(ticks = ticks.len(), "x axis rendered");
    }
}

/// A vertical axis beside the canvas.
#[derive(Clone, Debug, Default)]
pub struct YAxis {
    /// Axis name drawn beside the labels, rotated.
    pub name: Option<String>,
    /// Style of the name.
    pub name_style: Style,
    /// Style of the axis line and labels. `hidden` hides the whole axis.
    pub style: Style,
    /// Side of the canvas.
    pub axis_type: YAxisType,
    /// Formatter overriding the series-provided one.
    pub value_formatter: Option<ValueFormatter>,
    /// Range overriding the one computed from series.
    pub range: Option<Range>,
    /// Style of tick marks and labels, inheriting from `style`.
    pub tick_style: Style,
    /// Explicit ticks; generated when empty.
    pub ticks: Vec<Tick>,
    /// Optional line at a value, usually zero.
    pub zero: Option<GridLine>,
    /// Horizontal grid lines.
    pub grid: Grid,
}

impl YAxis {
    /// A primary axis.
    #[must_use]
    pub fn primary() -> Self {
        Self::default()
    }

    /// A secondary axis.
    #[must_use]
    pub fn secondary() -> Self {
        Self {
            axis_type: YAxisType::Secondary,
            ..Self::default()
        }
    }

    /// A hidden axis.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            style: Style::hidden(),
            ..Self::default()
        }
    }

    /// Returns a copy with a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns a copy with an explicit range.
    #[must_use]
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Returns a copy with explicit ticks.
    #[must_use]
    pub fn with_ticks(mut self, ticks: Vec<Tick>) -> Self {
        self.ticks = ticks;
        self
    }

    /// Returns a copy with a formatter.
    #[must_use]
    pub fn with_value_formatter(mut self, vf: ValueFormatter) -> Self {
        self.value_formatter = Some(vf);
        self
    }

    /// Returns a copy with a style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Returns a copy with a zero line.
    #[must_use]
    pub fn with_zero_line(mut self, style: Style) -> Self {
        self.zero = Some(GridLine::new(0.0, style));
        self
    }

    /// Returns a copy with visible grid lines.
    #[must_use]
    pub fn with_grid(mut self, major: Style, minor: Style) -> Self {
        self.grid.major = Some(major);
        self.grid.minor = Some(minor);
        self
    }

    /// Whether the axis is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.style.hidden
    }

    fn tick_style(&self, defaults: &Style) -> Style {
        self.tick_style.inherit_from(&self.style.inherit_from(defaults))
    }

    fn shows_name(&self) -> bool {
        !self.name_style.hidden && self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    fn is_primary(&self) -> bool {
        self.axis_type == YAxisType::Primary
    }

    /// Ticks for this axis over `range`.
    pub fn ticks(
        &self,
        r: &mut dyn Renderer,
        range: &Range,
        defaults: &Style,
        vf: &ValueFormatter,
        config: &Defaults,
    ) -> Vec<Tick> {
        axis_ticks(&self.ticks, r, range, true, &self.tick_style(defaults), vf, config)
    }

    /// Box the labels and name would occupy beside `canvas`.
    pub fn measure(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        range: &Range,
        defaults: &Style,
        ticks: &[Tick],
        config: &Defaults,
    ) -> Bounds {
        let style = self.tick_style(defaults);
        let (edge, tx) = if self.is_primary() {
            (canvas.right, canvas.right + config.y_axis_margin)
        } else {
            (canvas.left, canvas.left - config.y_axis_margin)
        };
        let mut out = Bounds::new(canvas.top, edge, edge, canvas.bottom);
        let mut max_text_height = 0;

        for t in ticks {
            let ly = canvas.bottom - range.translate(t.value);
            let tb = measure_text(r, &t.label, &style);
            let half = tb.height() >> 1;
            max_text_height = max_text_height.max(tb.height());
            if self.is_primary() {
                out.right = out.right.max(tx + tb.width());
            } else {
                out.left = out.left.min(tx - tb.width());
            }
            out.top = out.top.min(ly - half);
            out.bottom = out.bottom.max(ly + half);
        }

        if self.shows_name() {
            let extra = config.y_axis_margin + max_text_height;
            if self.is_primary() {
                out.right += extra;
            } else {
                out.left -= extra;
            }
        }
        out
    }

    /// Draws the axis beside `canvas`.
    pub fn render(
        &self,
        r: &mut dyn Renderer,
        canvas: Bounds,
        range: &Range,
        defaults: &Style,
        ticks: &[Tick],
        config: &Defaults,
    ) {
        let style = self.tick_style(defaults);
        #[allow(clippy::cast_possible_truncation, reason = "stroke widths are a few pixels")]
        let sw = style.stroke_width_or(config.axis_line_width) as i32;

        let (lx, tx) = if self.is_primary() {
            let lx = canvas.right + sw;
            (lx, lx + config.y_axis_margin)
        } else {
            let lx = canvas.left - sw;
            (lx, lx - config.y_axis_margin)
        };

        style.write_stroke_to_renderer(r);
        r.move_to(lx, canvas.bottom);
        r.line_to(lx, canvas.top);
        r.stroke();

        let mut max_text_width = 0;
        for t in ticks {
            let ly = canvas.bottom - range.translate(t.value);
            let tb = measure_text(r, &t.label, &style);
            max_text_width = max_text_width.max(tb.width());

            let text_x = if self.is_primary() { tx } else { tx - tb.width() };
            let text_y = if style.text_rotation() == 0.0 {
                ly + (tb.height() >> 1)
            } else {
                ly
            };

            style.write_stroke_to_renderer(r);
            r.move_to(lx, ly);
            if self.is_primary() {
                r.line_to(lx + config.horizontal_tick_width, ly);
            } else {
                r.line_to(lx - config.horizontal_tick_width, ly);
            }
            r.stroke();
            draw_text(r, &t.label, text_x, text_y, &style);
        }

        if self.shows_name() {
            let name = self.name.as_deref().unwrap_or_default();
            let name_style = self
                .name_style
                .inherit_from(&defaults.inherit_from(&Style::default().with_text_rotation(90.0)));
            let tb = measure_text(r, name, &name_style);
            let offset = sw + config.y_axis_margin + max_text_width + config.y_axis_margin;
            let x = if self.is_primary() {
                canvas.right + offset
            } else {
                canvas.left - offset
            };
            let half = if name_style.text_rotation() == 0.0 {
                tb.width() >> 1
            } else {
                tb.height() >> 1
            };
            let y = canvas.top + (canvas.height() >> 1) - half;
            draw_text(r, name, x, y, &name_style);
        }

        if let Some(zero) = &self.zero {
            zero.render(r, canvas, range, false, &Style::default());
        }
        self.grid.render(r, canvas, range, ticks, false);
        trace!(ticks = ticks.len(), secondary = !self.is_primary(), "y axis rendered");
    }
}
