// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::rc::Rc;

use crate::draw::{draw_histogram_series, draw_line_series};
use crate::ema_series::ema_values;
use crate::series::inner_values;
use crate::series_cache::{DerivedCache, check_acyclic, collect_values};
use crate::{
    Bounds, ChartError, LastValuesProvider, Range, Renderer, Series, SeriesRef, Style,
    ValuesProvider, YAxisType,
};

/// Default slow EMA period.
pub const DEFAULT_MACD_PERIOD_PRIMARY: usize = 26;
/// Default fast EMA period.
pub const DEFAULT_MACD_PERIOD_SECONDARY: usize = 12;
/// Default signal EMA period.
pub const DEFAULT_MACD_SIGNAL_PERIOD: usize = 9;

/// Which MACD output a [`MacdSeries`] reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MacdComponent {
    /// `line - signal`, drawn as bars.
    #[default]
    Histogram,
    /// Fast EMA minus slow EMA.
    Line,
    /// EMA of the line.
    Signal,
}

/// Moving average convergence/divergence of an inner series.
#[derive(Clone)]
pub struct MacdSeries {
    /// Display name.
    pub name: String,
    /// Style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Reported output.
    pub component: MacdComponent,
    /// Slow EMA period.
    pub primary_period: usize,
    /// Fast EMA period.
    pub secondary_period: usize,
    /// Signal EMA period.
    pub signal_period: usize,
    /// Source data.
    pub inner: SeriesRef,
    cache: DerivedCache<(f64, f64, f64)>,
}

impl fmt::Debug for MacdSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacdSeries")
            .field("name", &self.name)
            .field("component", &self.component)
            .field("primary_period", &self.primary_period)
            .field("secondary_period", &self.secondary_period)
            .field("signal_period", &self.signal_period)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl MacdSeries {
    /// The histogram of `inner` with the default periods.
    pub fn new(inner: SeriesRef) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            component: MacdComponent::Histogram,
            primary_period: DEFAULT_MACD_PERIOD_PRIMARY,
            secondary_period: DEFAULT_MACD_PERIOD_SECONDARY,
            signal_period: DEFAULT_MACD_SIGNAL_PERIOD,
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

    /// Returns a copy reporting `component`.
    #[must_use]
    pub fn with_component(mut self, component: MacdComponent) -> Self {
        self.component = component;
        self
    }

    /// Returns a copy with slow, fast and signal periods.
    #[must_use]
    pub fn with_periods(mut self, primary: usize, secondary: usize, signal: usize) -> Self {
        self.primary_period = primary;
        self.secondary_period = secondary;
        self.signal_period = signal;
        self
    }

    /// `(x, line, signal)` per index.
    fn cached(&self) -> Option<Rc<[(f64, f64, f64)]>> {
        let inner = self.inner.as_values()?;
        self.cache.get(inner.len(), || {
            let (xs, ys) = collect_values(inner);
            let slow = ema_values(&ys, self.primary_period);
            let fast = ema_values(&ys, self.secondary_period);
            let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
            let signal = ema_values(&line, self.signal_period);
            xs.into_iter()
                .zip(line)
                .zip(signal)
                .map(|((x, l), s)| (x, l, s))
                .collect()
        })
    }
}

impl ValuesProvider for MacdSeries {
    fn len(&self) -> usize {
        self.inner.as_values().map_or(0, ValuesProvider::len)
    }

    fn values(&self, index: usize) -> (f64, f64) {
        let Some((x, line, signal)) = self.cached().and_then(|v| v.get(index).copied()) else {
            return (f64::NAN, f64::NAN);
        };
        let y = match self.component {
            MacdComponent::Histogram => line - signal,
            MacdComponent::Line => line,
            MacdComponent::Signal => signal,
        };
        (x, y)
    }
}

impl LastValuesProvider for MacdSeries {
    fn last_values(&self) -> (f64, f64) {
        self.values(self.len().saturating_sub(1))
    }
}

impl Series for MacdSeries {
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
        inner_values(&*self.inner, "macd")?;
        let _ = self.cached();
        check_acyclic(&self.cache, "macd")
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style) {
        let style = self.style.inherit_from(defaults);
        match self.component {
            MacdComponent::Histogram => draw_histogram_series(r, canvas, x, y, &style, self, None),
            MacdComponent::Line | MacdComponent::Signal => {
                draw_line_series(r, canvas, x, y, &style, self);
            }
        }
    }

    fn as_values(&self) -> Option<&dyn ValuesProvider> {
        Some(self)
    }

    fn as_last_values(&self) -> Option<&dyn LastValuesProvider> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContinuousSeries;
    use crate::testing::linear_range;

    fn inner() -> SeriesRef {
        Rc::new(ContinuousSeries::new(linear_range(1, 50), linear_range(1, 50)))
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let line = MacdSeries::new(inner()).with_component(MacdComponent::Line);
        let signal = MacdSeries::new(inner()).with_component(MacdComponent::Signal);
        let histogram = MacdSeries::new(inner());
        for i in 0..histogram.len() {
            let expected = line.values(i).1 - signal.values(i).1;
            assert!((histogram.values(i).1 - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn rising_input_has_positive_line() {
        let line = MacdSeries::new(inner()).with_component(MacdComponent::Line);
        assert_eq!(line.values(0), (1.0, 0.0));
        // The fast average tracks a rising input more closely than the slow one.
        for i in 1..line.len() {
            assert!(line.values(i).1 > 0.0, "index {i}");
        }
        assert_eq!(line.last_values().0, 50.0);
    }
}
