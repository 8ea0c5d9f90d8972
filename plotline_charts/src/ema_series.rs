// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::rc::Rc;

use crate::draw::draw_line_series;
use crate::series::inner_values;
use crate::series_cache::{DerivedCache, check_acyclic, collect_values};
use crate::{
    Bounds, ChartError, FirstValuesProvider, LastValuesProvider, Range, Renderer, Series, SeriesRef,
    Style, ValuesProvider, YAxisType,
};

/// Default period of exponential moving averages.
pub const DEFAULT_EMA_PERIOD: usize = 12;

/// Smoothing factor for a period: `2 / (period + 1)`.
#[must_use]
pub fn ema_sigma(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Exponential moving average of `ys`, seeded by the first value.
pub(crate) fn ema_values(ys: &[f64], period: usize) -> Vec<f64> {
    let sigma = ema_sigma(period);
    let mut out: Vec<f64> = Vec::with_capacity(ys.len());
    for &y in ys {
        let next = match out.last() {
            Some(&prev) => (y - prev) * sigma + prev,
            None => y,
        };
        out.push(next);
    }
    out
}

/// Exponential moving average of an inner series.
#[derive(Clone)]
pub struct EmaSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Smoothing period.
    pub period: usize,
    /// Source data.
    pub inner: SeriesRef,
    cache: DerivedCache<(f64, f64)>,
}

impl fmt::Debug for EmaSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmaSeries")
            .field("name", &self.name)
            .field("style", &self.style)
            .field("y_axis", &self.y_axis)
            .field("period", &self.period)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl EmaSeries {
    /// Smooths `inner` over the default period.
    pub fn new(inner: SeriesRef) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            period: DEFAULT_EMA_PERIOD,
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

    /// Returns a copy with a period.
    #[must_use]
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    fn cached(&self) -> Option<Rc<[(f64, f64)]>> {
        let inner = self.inner.as_values()?;
        self.cache.get(inner.len(), || {
            let (xs, ys) = collect_values(inner);
            xs.into_iter().zip(ema_values(&ys, self.period)).collect()
        })
    }
}

impl ValuesProvider for EmaSeries {
    fn len(&self) -> usize {
        self.inner.as_values().map_or(0, ValuesProvider::len)
    }

    fn values(&self, index: usize) -> (f64, f64) {
        self.cached()
            .and_then(|v| v.get(index).copied())
            .unwrap_or((f64::NAN, f64::NAN))
    }
}

impl FirstValuesProvider for EmaSeries {
    fn first_values(&self) -> (f64, f64) {
        self.values(0)
    }
}

impl LastValuesProvider for EmaSeries {
    fn last_values(&self) -> (f64, f64) {
        self.values(self.len().saturating_sub(1))
    }
}

impl Series for EmaSeries {
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
        inner_values(&*self.inner, "ema")?;
        let _ = self.cached();
        check_acyclic(&self.cache, "ema")
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
}
