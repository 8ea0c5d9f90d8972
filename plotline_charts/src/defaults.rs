// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout constants and the [`Defaults`] value that carries them.

use crate::Bounds;

/// Default chart width in pixels.
pub const DEFAULT_CHART_WIDTH: i32 = 1024;
/// Default chart height in pixels.
pub const DEFAULT_CHART_HEIGHT: i32 = 400;
/// Default output resolution.
pub const DEFAULT_DPI: f64 = 72.0;
/// Minimum pixel gap between tick labels.
pub const MINIMUM_TICK_SPACING: i32 = 20;
/// Hard ceiling on generated tick counts.
pub const TICK_COUNT_SANITY_CHECK: usize = 1 << 10;
/// Distance between an axis line and its labels.
pub const AXIS_MARGIN: i32 = 10;
/// Length of a tick stroke.
pub const TICK_LENGTH: i32 = 5;
/// Upper bound on nice ticks per axis.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Stroke dash arrays used by series and grid lines.
pub mod dash {
    /// `[1, 1]`
    pub const DOTS: [f64; 2] = [1.0, 1.0];
    /// `[3, 3]`
    pub const SMALL: [f64; 2] = [3.0, 3.0];
    /// `[5, 5]`
    pub const MEDIUM: [f64; 2] = [5.0, 5.0];
    /// `[10, 10]`
    pub const LARGE: [f64; 2] = [10.0, 10.0];
}

/// Every layout constant a render pass consults.
///
/// Charts own one of these and pass it by reference to tick generation and
/// axis layout, so a caller can change a constant for one chart without
/// touching any other.
#[derive(Clone, Debug, PartialEq)]
pub struct Defaults {
    /// Chart width used when a chart does not set one.
    pub width: i32,
    /// Chart height used when a chart does not set one.
    pub height: i32,
    /// Output resolution.
    pub dpi: f64,
    /// Padding between the chart edge and the canvas.
    pub background_padding: Bounds,
    /// Stroke width of the chart background.
    pub background_stroke_width: f64,
    /// Stroke width of the canvas.
    pub canvas_stroke_width: f64,
    /// Line width for series that do not set one.
    pub series_line_width: f64,
    /// Dot radius for series that draw dots without setting one.
    pub series_dot_width: f64,
    /// Font size of the chart title.
    pub title_font_size: f64,
    /// Offset from the top edge to the title.
    pub title_top: i32,
    /// Font size of axis labels.
    pub axis_font_size: f64,
    /// Stroke width of axis lines.
    pub axis_line_width: f64,
    /// Gap between the canvas and X axis labels.
    pub x_axis_margin: i32,
    /// Gap between the canvas and Y axis labels.
    pub y_axis_margin: i32,
    /// Length of vertical tick strokes on X axes.
    pub vertical_tick_height: i32,
    /// Length of horizontal tick strokes on Y axes.
    pub horizontal_tick_width: i32,
    /// Minimum gap between horizontally laid out tick labels.
    pub minimum_tick_horizontal_spacing: i32,
    /// Minimum gap between vertically laid out tick labels.
    pub minimum_tick_vertical_spacing: i32,
    /// Hard ceiling on generated tick counts.
    pub tick_count_sanity_check: usize,
    /// Upper bound on nice ticks per axis.
    pub tick_count: usize,
    /// Bar width used when a bar chart does not set one.
    pub bar_width: i32,
    /// Bar spacing used when a bar chart does not set one.
    pub bar_spacing: i32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            dpi: DEFAULT_DPI,
            background_padding: Bounds::new(5, 5, 5, 5),
            background_stroke_width: 0.0,
            canvas_stroke_width: 0.0,
            series_line_width: 1.0,
            series_dot_width: 0.0,
            title_font_size: 18.0,
            title_top: 10,
            axis_font_size: 10.0,
            axis_line_width: 1.0,
            x_axis_margin: AXIS_MARGIN,
            y_axis_margin: AXIS_MARGIN,
            vertical_tick_height: TICK_LENGTH,
            horizontal_tick_width: TICK_LENGTH,
            minimum_tick_horizontal_spacing: MINIMUM_TICK_SPACING,
            minimum_tick_vertical_spacing: MINIMUM_TICK_SPACING,
            tick_count_sanity_check: TICK_COUNT_SANITY_CHECK,
            tick_count: DEFAULT_TICK_COUNT,
            bar_width: 50,
            bar_spacing: 100,
        }
    }
}

/// Title font size scaled to the smaller chart dimension.
pub(crate) fn scaled_title_font_size(width: i32, height: i32) -> f64 {
    match width.min(height) {
        d if d >= 2048 => 48.0,
        d if d >= 1024 => 24.0,
        d if d >= 512 => 18.0,
        d if d >= 256 => 12.0,
        _ => 10.0,
    }
}

/// Label font size scaled to the smaller chart dimension.
pub(crate) fn scaled_font_size(width: i32, height: i32) -> f64 {
    match width.min(height) {
        d if d >= 2048 => 48.0,
        d if d >= 1024 => 24.0,
        d if d > 512 => 18.0,
        d if d > 256 => 12.0,
        _ => 10.0,
    }
}
