// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::rc::Rc;

use peniko::color::palette::css;

use crate::draw::draw_bounded_series;
use crate::math::{mean, std_dev};
use crate::series::inner_values;
use crate::series_cache::{DerivedCache, check_acyclic, collect_values};
use crate::sma_series::DEFAULT_SMA_PERIOD;
use crate::{
    BoundedLastValuesProvider, BoundedValuesProvider, Bounds, ChartError, Range, Renderer, Series,
    SeriesRef, Style, YAxisType,
};

/// Default band width in standard deviations.
pub const DEFAULT_BOLLINGER_K: f64 = 2.0;

/// Bollinger bands around the simple moving average of an inner series.
///
/// Each triple is `(x, avg + k*sd, avg - k*sd)` over the last `period`
/// values; the standard deviation is the population one.
#[derive(Clone)]
pub struct BollingerBandsSeries {
    /// Display name.
    pub name: String,
    /// Ribbon style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Window length.
    pub period: usize,
    /// Band width in standard deviations.
    pub k: f64,
    /// Source data.
    pub inner: SeriesRef,
    cache: DerivedCache<(f64, f64, f64)>,
}

impl fmt::Debug for BollingerBandsSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BollingerBandsSeries")
            .field("name", &self.name)
            .field("style", &self.style)
            .field("y_axis", &self.y_axis)
            .field("period", &self.period)
            .field("k", &self.k)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

fn band(window: &[f64], k: f64) -> (f64, f64) {
    let avg = mean(window);
    let sd = std_dev(window);
    (avg + k * sd, avg - k * sd)
}

impl BollingerBandsSeries {
    /// Bands around `inner` with the default period and width.
    pub fn new(inner: SeriesRef) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            period: DEFAULT_SMA_PERIOD,
            k: DEFAULT_BOLLINGER_K,
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

    /// Returns a copy with a window length.
    #[must_use]
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Returns a copy with a band width.
    #[must_use]
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    fn cached(&self) -> Option<Rc<[(f64, f64, f64)]>> {
        let inner = self.inner.as_values()?;
        let period = self.period.max(1);
        self.cache.get(inner.len(), || {
            let (xs, ys) = collect_values(inner);
            xs.iter()
                .enumerate()
                .map(|(i, &x)| {
                    let (hi, lo) = band(&ys[(i + 1).saturating_sub(period)..=i], self.k);
                    (x, hi, lo)
                })
                .collect()
        })
    }
}

impl BoundedValuesProvider for BollingerBandsSeries {
    fn len(&self) -> usize {
        self.inner.as_values().map_or(0, crate::ValuesProvider::len)
    }

    fn bounded_values(&self, index: usize) -> (f64, f64, f64) {
        self.cached()
            .and_then(|v| v.get(index).copied())
            .unwrap_or((f64::NAN, f64::NAN, f64::NAN))
    }
}

impl BoundedLastValuesProvider for BollingerBandsSeries {
    fn bounded_last_values(&self) -> (f64, f64, f64) {
        self.bounded_values(BoundedValuesProvider::len(self).saturating_sub(1))
    }
}

impl Series for BollingerBandsSeries {
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
        inner_values(&*self.inner, "bollinger bands")?;
        let _ = self.cached();
        check_acyclic(&self.cache, "bollinger bands")
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style) {
        let band_defaults = Style::default()
            .with_stroke_width(1.0)
            .with_stroke_color(css::BLACK.with_alpha(64.0 / 255.0))
            .with_fill_color(css::BLACK.with_alpha(32.0 / 255.0));
        let style = self.style.inherit_from(&defaults.inherit_from(&band_defaults));
        draw_bounded_series(r, canvas, x, y, &style, self, self.period);
    }

    fn as_bounded_values(&self) -> Option<&dyn BoundedValuesProvider> {
        Some(self)
    }

    fn as_bounded_last_values(&self) -> Option<&dyn BoundedLastValuesProvider> {
        Some(self)
    }
}
