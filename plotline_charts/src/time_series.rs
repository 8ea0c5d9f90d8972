// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::{DateTime, Utc};

use crate::draw::draw_line_series;
use crate::{
    Bounds, ChartError, FirstValuesProvider, LastValuesProvider, Range, Renderer, Series, Style,
    ValueFormatter, ValueFormatterProvider, ValuesProvider, YAxisType,
};

/// A line over time-keyed values.
///
/// X values are reported as Unix nanoseconds, so time axes format them with
/// the time formatters.
#[derive(Clone, Debug, Default)]
pub struct TimeSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Instants, one per y value.
    pub x_values: Vec<DateTime<Utc>>,
    /// Y values.
    pub y_values: Vec<f64>,
}

impl TimeSeries {
    /// Creates an unnamed series.
    pub fn new(x_values: Vec<DateTime<Utc>>, y_values: Vec<f64>) -> Self {
        Self {
            x_values,
            y_values,
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

    /// Returns a copy plotted against `axis`.
    #[must_use]
    pub fn with_y_axis(mut self, axis: YAxisType) -> Self {
        self.y_axis = axis;
        self
    }
}

/// Unix nanoseconds of `t`; NaN outside the representable range.
pub fn time_to_float(t: &DateTime<Utc>) -> f64 {
    t.timestamp_nanos_opt().map_or(f64::NAN, |n| n as f64)
}

impl ValuesProvider for TimeSeries {
    fn len(&self) -> usize {
        self.x_values.len()
    }

    fn values(&self, index: usize) -> (f64, f64) {
        (time_to_float(&self.x_values[index]), self.y_values[index])
    }
}

impl FirstValuesProvider for TimeSeries {
    fn first_values(&self) -> (f64, f64) {
        self.values(0)
    }
}

impl LastValuesProvider for TimeSeries {
    fn last_values(&self) -> (f64, f64) {
        let x = self.x_values.last().map_or(f64::NAN, time_to_float);
        let y = self.y_values.last().copied().unwrap_or(f64::NAN);
        (x, y)
    }
}

impl ValueFormatterProvider for TimeSeries {
    fn value_formatters(&self) -> (ValueFormatter, ValueFormatter) {
        (ValueFormatter::Time, ValueFormatter::Float)
    }
}

impl Series for TimeSeries {
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
        if self.x_values.is_empty() {
            return Err(ChartError::invalid_series("time series must have xvalues set"));
        }
        if self.y_values.is_empty() {
            return Err(ChartError::invalid_series("time series must have yvalues set"));
        }
        if self.x_values.len() != self.y_values.len() {
            return Err(ChartError::invalid_series(
                "time series must have same length xvalues as yvalues",
            ));
        }
        Ok(())
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style) {
        draw_line_series(r, canvas, x, y, &self.style.inherit_from(defaults), self);
    }

    fn as_values(&self) -> Option<&dyn ValuesProvider> {
        Some(self)
    }

    fn as_first_values(&self) -> Option<&dyn FirstValuesProvider> {
        Some(self)
    }

    fn as_last_values(&self) -> Option<&dyn LastValuesProvider> {
        Some(self)
    }

    fn as_value_formatter_provider(&self) -> Option<&dyn ValueFormatterProvider> {
        Some(self)
    }
}
