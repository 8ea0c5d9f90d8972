// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::draw::draw_line_series;
use crate::math::percent_difference;
use crate::series::{first_values, inner_values, last_values};
use crate::{
    Bounds, ChartError, FirstValuesProvider, LastValuesProvider, Range, Renderer, Series, SeriesRef,
    Style, ValueFormatter, ValueFormatterProvider, ValuesProvider, YAxisType,
};

/// Relative change of each inner value from the first inner value.
#[derive(Clone)]
pub struct PercentChangeSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Source data.
    pub inner: SeriesRef,
}

impl fmt::Debug for PercentChangeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PercentChangeSeries")
            .field("name", &self.name)
            .field("y_axis", &self.y_axis)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl PercentChangeSeries {
    /// Creates an unnamed series over `inner`.
    pub fn new(inner: SeriesRef) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            inner,
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

    fn base(&self) -> f64 {
        first_values(&*self.inner).map_or(f64::NAN, |(_, y)| y)
    }
}

impl ValuesProvider for PercentChangeSeries {
    fn len(&self) -> usize {
        self.inner.as_values().map_or(0, ValuesProvider::len)
    }

    fn values(&self, index: usize) -> (f64, f64) {
        let Some(inner) = self.inner.as_values() else {
            return (f64::NAN, f64::NAN);
        };
        let (x, y) = inner.values(index);
        (x, percent_difference(self.base(), y))
    }
}

impl FirstValuesProvider for PercentChangeSeries {
    fn first_values(&self) -> (f64, f64) {
        first_values(&*self.inner).map_or((f64::NAN, f64::NAN), |(x, y)| (x, percent_difference(y, y)))
    }
}

impl LastValuesProvider for PercentChangeSeries {
    fn last_values(&self) -> (f64, f64) {
        last_values(&*self.inner)
            .map_or((f64::NAN, f64::NAN), |(x, y)| (x, percent_difference(self.base(), y)))
    }
}

impl ValueFormatterProvider for PercentChangeSeries {
    fn value_formatters(&self) -> (ValueFormatter, ValueFormatter) {
        let x = self
            .inner
            .as_value_formatter_provider()
            .map_or(ValueFormatter::Float, |p| p.value_formatters().0);
        (x, ValueFormatter::Percent)
    }
}

impl Series for PercentChangeSeries {
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
        inner_values(&*self.inner, "percent change")?;
        self.inner.validate()
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
    use std::rc::Rc;

    use super::*;
    use crate::ContinuousSeries;
    use crate::testing::linear_range;

    #[test]
    fn change_from_first_value() {
        let inner = ContinuousSeries::new(linear_range(1, 10), linear_range(1, 10));
        let pcs = PercentChangeSeries::new(Rc::new(inner));
        assert_eq!(pcs.len(), 10);
        assert_eq!(pcs.values(0), (1.0, 0.0));
        assert_eq!(pcs.values(9), (10.0, 9.0));
        assert_eq!(pcs.first_values(), (1.0, 0.0));
        assert_eq!(pcs.last_values(), (10.0, 9.0));
    }

    #[test]
    fn formats_y_as_percent() {
        let inner = ContinuousSeries::new(vec![1.0], vec![1.0])
            .with_value_formatters(ValueFormatter::Int, ValueFormatter::Float);
        let (x, y) = PercentChangeSeries::new(Rc::new(inner)).value_formatters();
        assert_eq!(x.format(3.0), "3");
        assert_eq!(y.format(0.5), "50.00%");
    }
}
