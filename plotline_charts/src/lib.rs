// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static charts drawn through an injected [`Renderer`].
//!
//! This crate owns the layout and tick engine shared by every chart type:
//! - **Ranges** map data values onto pixel domains.
//! - **Ticks** pick readable label positions, either pinned to the data
//!   bounds or rounded to nice numbers.
//! - **Axes** measure the space their labels need and draw lines, ticks and
//!   grid lines.
//!
//! Chart orchestrators ([`Chart`], [`BarChart`], [`StackedBarChart`],
//! [`PieChart`], [`LinearProgressBar`] and [`CircularProgressBar`]) combine
//! those pieces: they validate their input, fit the plot canvas around the
//! measured axes and then issue move/line/arc/text primitives. Producing an
//! image or document from those primitives is the renderer's job.

mod annotation_series;
mod axis;
mod bar_chart;
mod bollinger_series;
mod bounds;
mod chart;
mod concat_series;
mod continuous_series;
mod defaults;
mod draw;
mod ema_series;
mod error;
mod format;
mod histogram_series;
mod legend;
mod macd_series;
mod math;
mod min_max_series;
mod percent_change_series;
mod pie_chart;
mod progress;
mod range;
mod regression_series;
mod renderer;
mod series;
mod series_cache;
mod sma_series;
mod stacked_bar_chart;
mod style;
#[cfg(test)]
mod testing;
mod text;
mod tick;
mod time_series;
mod value;

pub use annotation_series::{
    ANNOTATION_DELTA_WIDTH, ANNOTATION_FONT_SIZE, ANNOTATION_PADDING, AnnotationSeries,
    bounded_last_values_annotation, first_value_annotation, last_value_annotation,
};
pub use axis::{Grid, GridLine, TickPosition, XAxis, YAxis, YAxisType, generate_grid_lines};
pub use bar_chart::BarChart;
pub use bollinger_series::{BollingerBandsSeries, DEFAULT_BOLLINGER_K};
pub use bounds::{Bounds, Corners};
pub use chart::{Chart, Element, Renderable};
pub use concat_series::ConcatSeries;
pub use continuous_series::ContinuousSeries;
pub use defaults::{
    AXIS_MARGIN, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_DPI, DEFAULT_TICK_COUNT,
    Defaults, MINIMUM_TICK_SPACING, TICK_COUNT_SANITY_CHECK, TICK_LENGTH, dash,
};
pub use draw::{draw_bounded_series, draw_box, draw_histogram_series, draw_line_series};
pub use ema_series::{DEFAULT_EMA_PERIOD, EmaSeries, ema_sigma};
pub use error::{ChartError, RangeAxis};
pub use format::{
    DATE_FORMAT, DATE_HOUR_FORMAT, DATE_MINUTE_FORMAT, FLOAT_FORMAT, FormatValue, PERCENT_FORMAT,
    ValueFormatter,
};
pub use histogram_series::HistogramSeries;
pub use legend::{Legend, LegendKind};
pub use macd_series::{
    DEFAULT_MACD_PERIOD_PRIMARY, DEFAULT_MACD_PERIOD_SECONDARY, DEFAULT_MACD_SIGNAL_PERIOD,
    MacdComponent, MacdSeries,
};
pub use math::{
    circle_point, degrees_to_radians, mean, min_max, percent_difference, percent_to_radians,
    radians_to_degrees, round_down, round_to, round_up, std_dev,
};
pub use min_max_series::{ExtremumSeries, MaxSeries, MinSeries};
pub use percent_change_series::PercentChangeSeries;
pub use pie_chart::{PieChart, PieShape};
pub use progress::{CircularProgressBar, LinearProgressBar};
pub use range::Range;
pub use regression_series::{LinearRegressionSeries, PolynomialRegressionSeries};
pub use renderer::{Renderer, RendererProvider};
pub use series::{
    BoundedLastValuesProvider, BoundedValuesProvider, FirstValuesProvider, LastValuesProvider,
    Series, SeriesRef, ValueFormatterProvider, ValuesProvider, first_values, last_values,
};
pub use sma_series::{DEFAULT_SMA_PERIOD, SmaSeries};
pub use stacked_bar_chart::{StackedBar, StackedBarChart};
pub use style::{DashArray, Palette, Style, TextHorizontalAlign, TextVerticalAlign, TextWrap};
pub use text::{
    DEFAULT_LINE_SPACING, draw_text, draw_within, measure_lines, measure_text, wrap_fit,
};
pub use tick::{
    Tick, axis_ticks, generate_continuous_ticks, generate_nice_ticks, nice_ticks, sort_ticks,
    ticks_to_string, widen_to_ticks,
};
pub use time_series::{TimeSeries, time_to_float};
pub use value::{Value, Value2, normalize_values, values_total};

pub use plotline_text::FontFamily;
