// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::draw::draw_line_series;
use crate::series::inner_values;
use crate::series_cache::{DerivedCache, check_acyclic};
use crate::{
    Bounds, ChartError, Range, Renderer, Series, SeriesRef, Style, ValuesProvider, YAxisType,
};

/// A horizontal line at the lowest (`MAX = false`) or highest (`MAX = true`)
/// y value of an inner series.
#[derive(Clone)]
pub struct ExtremumSeries<const MAX: bool> {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Source data.
    pub inner: SeriesRef,
    cache: DerivedCache<f64>,
}

/// A horizontal line at the minimum of an inner series.
pub type MinSeries = ExtremumSeries<false>;

/// A horizontal line at the maximum of an inner series.
pub type MaxSeries = ExtremumSeries<true>;

impl<const MAX: bool> fmt::Debug for ExtremumSeries<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(if MAX { "MaxSeries" } else { "MinSeries" })
            .field("name", &self.name)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl<const MAX: bool> ExtremumSeries<MAX> {
    const KIND: &'static str = if MAX { "max" } else { "min" };

    /// Creates an unnamed series over `inner`.
    pub fn new(inner: SeriesRef) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            inner,
            cache: DerivedCache::default(),
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

    fn extremum(&self) -> Option<f64> {
        let inner = self.inner.as_values()?;
        let cached = self.cache.get(inner.len(), || {
            let ys = (0..inner.len()).map(|i| inner.values(i).1);
            let value = if MAX {
                ys.fold(f64::MIN, f64::max)
            } else {
                ys.fold(f64::MAX, f64::min)
            };
            vec![value]
        })?;
        cached.first().copied()
    }
}

impl<const MAX: bool> ValuesProvider for ExtremumSeries<MAX> {
    fn len(&self) -> usize {
        self.inner.as_values().map_or(0, ValuesProvider::len)
    }

    fn values(&self, index: usize) -> (f64, f64) {
        match (self.inner.as_values(), self.extremum()) {
            (Some(inner), Some(y)) => (inner.values(index).0, y),
            _ => (f64::NAN, f64::NAN),
        }
    }
}

impl<const MAX: bool> Series for ExtremumSeries<MAX> {
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
        inner_values(&*self.inner, Self::KIND)?;
        let _ = self.extremum();
        check_acyclic(&self.cache, Self::KIND)
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style) {
        draw_line_series(r, canvas, x, y, &self.style.inherit_from(defaults), self);
    }

    fn as_values(&self) -> Option<&dyn ValuesProvider> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ContinuousSeries;

    fn inner() -> SeriesRef {
        Rc::new(ContinuousSeries::new(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![3.0, -2.0, 7.5, 1.0],
        ))
    }

    #[test]
    fn flat_line_at_extremum() {
        let min = MinSeries::new(inner());
        let max = MaxSeries::new(inner());
        assert!(min.validate().is_ok());
        assert_eq!(min.len(), 4);
        assert_eq!(min.values(0), (1.0, -2.0));
        assert_eq!(min.values(3), (4.0, -2.0));
        assert_eq!(max.values(2), (3.0, 7.5));
    }

    #[test]
    fn nests_over_derived_series() {
        let min = MinSeries::new(Rc::new(MaxSeries::new(inner())));
        assert!(min.validate().is_ok());
        assert_eq!(min.values(1), (2.0, 7.5));
    }
}
