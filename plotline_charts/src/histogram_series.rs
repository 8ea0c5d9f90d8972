// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::draw::draw_histogram_series;
use crate::series::inner_values;
use crate::{
    BoundedValuesProvider, Bounds, ChartError, Range, Renderer, Series, SeriesRef, Style,
    ValuesProvider, YAxisType,
};

/// Bars from zero to each value of an inner series.
#[derive(Clone)]
pub struct HistogramSeries {
    /// Display name.
    pub name: String,
    /// Bar style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Source data.
    pub inner: SeriesRef,
}

impl fmt::Debug for HistogramSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistogramSeries")
            .field("name", &self.name)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl HistogramSeries {
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
}

impl ValuesProvider for HistogramSeries {
    fn len(&self) -> usize {
        self.inner.as_values().map_or(0, ValuesProvider::len)
    }

    fn values(&self, index: usize) -> (f64, f64) {
        self.inner
            .as_values()
            .map_or((f64::NAN, f64::NAN), |inner| inner.values(index))
    }
}

impl BoundedValuesProvider for HistogramSeries {
    fn len(&self) -> usize {
        ValuesProvider::len(self)
    }

    fn bounded_values(&self, index: usize) -> (f64, f64, f64) {
        let (x, y) = self.values(index);
        if y > 0.0 { (x, y, 0.0) } else { (x, 0.0, y) }
    }
}

impl Series for HistogramSeries {
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
        inner_values(&*self.inner, "histogram").map(|_| ())
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style) {
        draw_histogram_series(r, canvas, x, y, &self.style.inherit_from(defaults), self, None);
    }

    fn as_values(&self) -> Option<&dyn ValuesProvider> {
        Some(self)
    }

    fn as_bounded_values(&self) -> Option<&dyn BoundedValuesProvider> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ContinuousSeries;

    #[test]
    fn bars_span_zero() {
        let inner = ContinuousSeries::new(vec![1.0, 2.0], vec![4.0, -3.0]);
        let hs = HistogramSeries::new(Rc::new(inner));
        assert_eq!(hs.bounded_values(0), (1.0, 4.0, 0.0));
        assert_eq!(hs.bounded_values(1), (2.0, 0.0, -3.0));
        assert!(hs.as_bounded_values().is_some());
    }
}
