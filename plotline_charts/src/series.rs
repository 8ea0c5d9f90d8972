// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The series model.
//!
//! A series is a named, styled data source that can draw itself. What data it
//! exposes is described by small capability traits; a series opts into each
//! one through the matching `as_*` accessor on [`Series`], and consumers fall
//! back gracefully when a capability is absent.

use std::rc::Rc;

use crate::{AnnotationSeries, Bounds, ChartError, Range, Renderer, Style, ValueFormatter, YAxisType};

/// Indexed `(x, y)` values.
pub trait ValuesProvider {
    /// Number of values.
    fn len(&self) -> usize;

    /// Whether there are no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `(x, y)` pair at `index`.
    ///
    /// Stored series panic when `index` is out of bounds.
    fn values(&self, index: usize) -> (f64, f64);
}

/// Indexed `(x, y_high, y_low)` values, drawn as a ribbon.
pub trait BoundedValuesProvider {
    /// Number of values.
    fn len(&self) -> usize;

    /// Whether there are no values.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `(x, y1, y2)` triple at `index`.
    fn bounded_values(&self, index: usize) -> (f64, f64, f64);
}

/// A series that can report its first value directly.
pub trait FirstValuesProvider {
    /// The first `(x, y)` pair.
    fn first_values(&self) -> (f64, f64);
}

/// A series that can report its last value directly.
pub trait LastValuesProvider {
    /// The last `(x, y)` pair.
    fn last_values(&self) -> (f64, f64);
}

/// A bounded series that can report its last triple directly.
pub trait BoundedLastValuesProvider {
    /// The last `(x, y1, y2)` triple.
    fn bounded_last_values(&self) -> (f64, f64, f64);
}

/// A series that knows how its values should be formatted.
pub trait ValueFormatterProvider {
    /// `(x, y)` formatters.
    fn value_formatters(&self) -> (ValueFormatter, ValueFormatter);
}

/// A drawable data source.
pub trait Series {
    /// Display name, used by legends.
    fn name(&self) -> &str;

    /// Series style.
    fn style(&self) -> &Style;

    /// Which Y axis the series is plotted against.
    fn y_axis(&self) -> YAxisType {
        YAxisType::Primary
    }

    /// Checks the series is drawable.
    fn validate(&self) -> Result<(), ChartError>;

    /// Draws the series into `canvas`.
    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style);

    /// Point values, if the series has them.
    fn as_values(&self) -> Option<&dyn ValuesProvider> {
        None
    }

    /// Ribbon values, if the series has them.
    fn as_bounded_values(&self) -> Option<&dyn BoundedValuesProvider> {
        None
    }

    /// Direct first value access.
    fn as_first_values(&self) -> Option<&dyn FirstValuesProvider> {
        None
    }

    /// Direct last value access.
    fn as_last_values(&self) -> Option<&dyn LastValuesProvider> {
        None
    }

    /// Direct last triple access.
    fn as_bounded_last_values(&self) -> Option<&dyn BoundedLastValuesProvider> {
        None
    }

    /// Preferred value formatters.
    fn as_value_formatter_provider(&self) -> Option<&dyn ValueFormatterProvider> {
        None
    }

    /// The series as annotations. Annotations take part in canvas sizing and
    /// are left out of legends.
    fn as_annotation(&self) -> Option<&AnnotationSeries> {
        None
    }
}

/// A shared series handle, so derived series and charts can refer to the same
/// data.
pub type SeriesRef = Rc<dyn Series>;

/// The first value of `series`, preferring its direct accessor.
pub fn first_values(series: &dyn Series) -> Option<(f64, f64)> {
    if let Some(first) = series.as_first_values() {
        return Some(first.first_values());
    }
    let values = series.as_values()?;
    (!values.is_empty()).then(|| values.values(0))
}

/// The last value of `series`, preferring its direct accessor.
pub fn last_values(series: &dyn Series) -> Option<(f64, f64)> {
    if let Some(last) = series.as_last_values() {
        return Some(last.last_values());
    }
    let values = series.as_values()?;
    (!values.is_empty()).then(|| values.values(values.len() - 1))
}

/// The Y formatter `series` prefers, if any.
pub(crate) fn y_formatter(series: &dyn Series) -> Option<ValueFormatter> {
    series
        .as_value_formatter_provider()
        .map(|p| p.value_formatters().1)
}

/// Values of an inner series, or a validation error naming `kind`.
pub(crate) fn inner_values<'a>(
    inner: &'a dyn Series,
    kind: &str,
) -> Result<&'a dyn ValuesProvider, ChartError> {
    inner
        .as_values()
        .ok_or_else(|| ChartError::invalid_series(format!("{kind} series requires an inner series with values")))
}
