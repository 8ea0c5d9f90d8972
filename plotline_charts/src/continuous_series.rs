// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::draw::draw_line_series;
use crate::{
    Bounds, ChartError, FirstValuesProvider, LastValuesProvider, Range, Renderer, Series, Style,
    ValueFormatter, ValueFormatterProvider, ValuesProvider, YAxisType,
};

/// A line through parallel x and y vectors.
#[derive(Clone, Debug, Default)]
pub struct ContinuousSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// X formatter; float when unset.
    pub x_value_formatter: Option<ValueFormatter>,
    /// Y formatter; float when unset.
    pub y_value_formatter: Option<ValueFormatter>,
    /// X values.
    pub x_values: Vec<f64>,
    /// Y values, one per x.
    pub y_values: Vec<f64>,
}

impl ContinuousSeries {
    /// Creates an unnamed series.
    pub fn new(x_values: Vec<f64>, y_values: Vec<f64>) -> Self {
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

    /// Returns a copy with value formatters.
    #[must_use]
    pub fn with_value_formatters(mut self, x: ValueFormatter, y: ValueFormatter) -> Self {
        self.x_value_formatter = Some(x);
        self.y_value_formatter = Some(y);
        self
    }
}

impl ValuesProvider for ContinuousSeries {
    fn len(&self) -> usize {
        self.x_values.len()
    }

    fn values(&self, index: usize) -> (f64, f64) {
        (self.x_values[index], self.y_values[index])
    }
}

impl FirstValuesProvider for ContinuousSeries {
    fn first_values(&self) -> (f64, f64) {
        self.values(0)
    }
}

impl LastValuesProvider for ContinuousSeries {
    fn last_values(&self) -> (f64, f64) {
        (
            self.x_values[self.x_values.len() - 1],
            self.y_values[self.y_values.len() - 1],
        )
    }
}

impl ValueFormatterProvider for ContinuousSeries {
    fn value_formatters(&self) -> (ValueFormatter, ValueFormatter) {
        (
            self.x_value_formatter.clone().unwrap_or_default(),
            self.y_value_formatter.clone().unwrap_or_default(),
        )
    }
}

impl Series for ContinuousSeries {
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
            return Err(ChartError::invalid_series("continuous series; must have xvalues set"));
        }
        if self.y_values.is_empty() {
            return Err(ChartError::invalid_series("continuous series; must have yvalues set"));
        }
        if self.x_values.len() != self.y_values.len() {
            return Err(ChartError::invalid_series(
                "continuous series; must have same length xvalues as yvalues",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::linear_range;

    #[test]
    fn reproduces_its_input() {
        let s = ContinuousSeries::new(linear_range(1, 10), linear_range(10, 1));
        assert_eq!(s.len(), 10);
        for i in 0..s.len() {
            assert_eq!(s.values(i), (s.x_values[i], s.y_values[i]));
        }
        assert_eq!(s.first_values(), (1.0, 10.0));
        assert_eq!(s.last_values(), (10.0, 1.0));
    }

    #[test]
    fn explicit_formatters_win() {
        let s = ContinuousSeries::new(vec![1.0], vec![0.5])
            .with_value_formatters(ValueFormatter::Int, ValueFormatter::Percent);
        let (x, y) = s.value_formatters();
        assert_eq!(x.format(1.0), "1");
        assert_eq!(y.format(0.5), "50.00%");
        let (x, _) = ContinuousSeries::default().value_formatters();
        assert!(x.is_default_float());
    }

    #[test]
    fn validation_messages() {
        let err = |s: ContinuousSeries| s.validate().map_err(|e| e.to_string()).err();
        assert_eq!(
            err(ContinuousSeries::new(vec![], vec![1.0])).as_deref(),
            Some("continuous series; must have xvalues set")
        );
        assert_eq!(
            err(ContinuousSeries::new(vec![1.0], vec![])).as_deref(),
            Some("continuous series; must have yvalues set")
        );
        assert_eq!(
            err(ContinuousSeries::new(vec![1.0, 2.0], vec![1.0])).as_deref(),
            Some("continuous series; must have same length xvalues as yvalues")
        );
        assert!(err(ContinuousSeries::new(vec![1.0], vec![1.0])).is_none());
    }
}
