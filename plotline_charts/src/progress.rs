// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear and circular progress indicators.

use core::f64::consts::{FRAC_PI_2, PI};
use std::io;

use peniko::color::palette::css;

use crate::math::{percent_to_radians, to_px};
use crate::style::{TextHorizontalAlign, TextVerticalAlign};
use crate::text::draw_within;
use crate::{Bounds, ChartError, Defaults, Palette, Renderer, RendererProvider, Style};

/// Stroke width progress shapes fall back to.
const PROGRESS_STROKE_WIDTH: f64 = 1.0;
/// Label font size when the label style does not set one.
const PROGRESS_FONT_SIZE: f64 = 10.0;
/// Gap between the end of a linear bar's progress and its label.
const LABEL_GAP: i32 = 10;

/// Clamps a progress fraction to `[0, 1]`. NaN becomes zero.
fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// A horizontal bar filled from the left in proportion to its progress.
#[derive(Clone, Debug, Default)]
pub struct LinearProgressBar {
    /// Width in pixels.
    pub width: Option<i32>,
    /// Bar height in pixels.
    pub height: Option<i32>,
    /// Output resolution.
    pub dpi: Option<f64>,
    /// Style of the empty track.
    pub background: Style,
    /// Style of the filled part.
    pub foreground: Style,
    /// Style of the label.
    pub label_style: Style,
    /// Colors for the track and fill.
    pub palette: Palette,
    /// Rounds the left end with a half circle.
    pub rounded_start: bool,
    /// Rounds the right end with a half circle.
    pub rounded_end: bool,
    /// Text drawn right of the filled part; empty for none.
    pub label: String,
    /// Layout constants.
    pub defaults: Defaults,
    progress: f64,
}

impl LinearProgressBar {
    /// Creates a bar of the given size with no progress.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Returns a copy with a progress fraction, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.set_progress(progress);
        self
    }

    /// Returns a copy with a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns a copy with rounded ends.
    #[must_use]
    pub fn with_rounded_edges(mut self, start: bool, end: bool) -> Self {
        self.rounded_start = start;
        self.rounded_end = end;
        self
    }

    /// Sets the progress fraction, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = clamp_progress(progress);
    }

    /// Progress fraction in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width.unwrap_or(self.defaults.width)
    }

    /// Bar height in pixels.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height.unwrap_or(self.defaults.height)
    }

    /// Output resolution.
    #[must_use]
    pub fn dpi(&self) -> f64 {
        self.dpi.unwrap_or(self.defaults.dpi)
    }

    /// Draws the bar with a renderer from `provider`, then saves the drawing
    /// to `w`.
    pub fn render<P: RendererProvider>(
        &self,
        provider: &P,
        w: &mut dyn io::Write,
    ) -> Result<(), ChartError> {
        let mut r = provider.create(self.width(), self.height())?;
        self.draw(&mut r);
        r.save(w)
    }

    fn draw(&self, r: &mut dyn Renderer) {
        r.set_dpi(self.dpi());
        let background = self.background_style();
        if !background.hidden {
            self.draw_bar(r, self.width(), &background);
        }
        let filled = self.filled_width();
        let foreground = self.foreground_style();
        if !foreground.hidden && filled > 0 {
            self.draw_bar(r, filled, &foreground);
        }

        let label_style = self.label_style.inherit_from(&Style {
            font_size: Some(PROGRESS_FONT_SIZE),
            font_color: foreground.fill_color,
            text_horizontal_align: Some(TextHorizontalAlign::Left),
            text_vertical_align: Some(TextVerticalAlign::Middle),
            ..Style::default()
        });
        if !label_style.hidden && !self.label.is_empty() {
            let slot = Bounds::new(0, filled + LABEL_GAP, self.width(), self.height());
            draw_within(r, &self.label, slot, &label_style);
        }
    }

    fn filled_width(&self) -> i32 {
        to_px(f64::from(self.width()) * self.progress)
    }

    /// Outlines a bar `width` pixels long, with optional half-circle ends.
    fn draw_bar(&self, r: &mut dyn Renderer, width: i32, style: &Style) {
        let h = self.height();
        let radius = f64::from(h) / 2.0;
        let start = if self.rounded_start { radius } else { 0.0 };
        let end = if self.rounded_end { radius } else { 0.0 };

        style.write_drawing_to_renderer(r);
        r.move_to(to_px(start), 0);
        r.line_to(width - to_px(end), 0);
        if self.rounded_end {
            r.arc_to(width - to_px(end), h / 2, end, end, -FRAC_PI_2, PI);
        } else {
            r.line_to(width, h);
        }
        r.line_to(to_px(start), h);
        if self.rounded_start {
            r.arc_to(to_px(start), h / 2, start, start, FRAC_PI_2, PI);
        } else {
            r.line_to(0, 0);
        }
        r.close();
        r.fill_stroke();
    }

    fn background_style(&self) -> Style {
        outline_with_fill(self.background.inherit_from(&Style {
            fill_color: Some(css::LIGHT_GRAY),
            stroke_color: Some(css::LIGHT_GRAY),
            stroke_width: Some(PROGRESS_STROKE_WIDTH),
            ..Style::default()
        }))
    }

    fn foreground_style(&self) -> Style {
        let color = self.palette.series_color(0);
        outline_with_fill(self.foreground.inherit_from(&Style {
            fill_color: Some(color),
            stroke_color: Some(color),
            stroke_width: Some(PROGRESS_STROKE_WIDTH),
            ..Style::default()
        }))
    }
}

/// A zero-width outline is drawn in the fill color instead.
fn outline_with_fill(style: Style) -> Style {
    if style.stroke_width_or(0.0) == 0.0 {
        Style {
            stroke_color: style.fill_color,
            stroke_width: Some(PROGRESS_STROKE_WIDTH),
            ..style
        }
    } else {
        style
    }
}

/// A ring with an arc from twelve o'clock covering its progress.
#[derive(Clone, Debug, Default)]
pub struct CircularProgressBar {
    /// Width and height in pixels.
    pub size: Option<i32>,
    /// Output resolution.
    pub dpi: Option<f64>,
    /// Style of the full circle behind the arc.
    pub background: Style,
    /// Style of the progress arc.
    pub foreground: Style,
    /// Style of the centered label.
    pub label_style: Style,
    /// Colors for the circle and arc.
    pub palette: Palette,
    /// Runs the arc counterclockwise.
    pub reversed: bool,
    /// Text centered in the circle; empty for none.
    pub label: String,
    /// Layout constants.
    pub defaults: Defaults,
    progress: f64,
}

impl CircularProgressBar {
    /// Creates an indicator of the given size with no progress.
    pub fn new(size: i32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Returns a copy with a progress fraction, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.set_progress(progress);
        self
    }

    /// Returns a copy with a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns a copy that runs counterclockwise.
    #[must_use]
    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Sets the progress fraction, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = clamp_progress(progress);
    }

    /// Progress fraction in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Width and height in pixels.
    #[must_use]
    pub fn size(&self) -> i32 {
        self.size.unwrap_or(self.defaults.width)
    }

    /// Output resolution.
    #[must_use]
    pub fn dpi(&self) -> f64 {
        self.dpi.unwrap_or(self.defaults.dpi)
    }

    /// Draws the indicator with a renderer from `provider`, then saves the
    /// drawing to `w`.
    pub fn render<P: RendererProvider>(
        &self,
        provider: &P,
        w: &mut dyn io::Write,
    ) -> Result<(), ChartError> {
        let mut r = provider.create(self.size(), self.size())?;
        self.draw(&mut r);
        r.save(w)
    }

    fn draw(&self, r: &mut dyn Renderer) {
        r.set_dpi(self.dpi());
        let center = self.size() / 2;
        let radius = f64::from(center);

        let background = self.background.inherit_from(&Style {
            fill_color: Some(self.palette.background),
            stroke_color: Some(css::LIGHT_GRAY),
            stroke_width: Some(PROGRESS_STROKE_WIDTH),
            ..Style::default()
        });
        if !background.hidden {
            background.write_drawing_to_renderer(r);
            r.circle(radius, center, center);
            r.fill_stroke();
        }

        let foreground = self.foreground.inherit_from(&Style {
            stroke_color: Some(self.palette.series_color(0)),
            stroke_width: Some(PROGRESS_STROKE_WIDTH),
            ..Style::default()
        });
        if !foreground.hidden {
            let sweep = percent_to_radians(self.progress);
            foreground.write_stroke_to_renderer(r);
            r.move_to(center, 0);
            r.arc_to(
                center,
                center,
                radius,
                radius,
                -FRAC_PI_2,
                if self.reversed { -sweep } else { sweep },
            );
            r.stroke();
        }

        let label_style = self.label_style.inherit_from(&Style {
            font_size: Some(PROGRESS_FONT_SIZE),
            font_color: foreground.stroke_color,
            text_horizontal_align: Some(TextHorizontalAlign::Center),
            text_vertical_align: Some(TextVerticalAlign::Middle),
            ..Style::default()
        });
        if !label_style.hidden && !self.label.is_empty() {
            let inset = to_px(foreground.stroke_width_or(0.0));
            let size = self.size();
            draw_within(
                r,
                &self.label,
                Bounds::new(inset, inset, size - inset, size - inset),
                &label_style,
            );
        }
    }
}
