// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::draw::draw_line_series;
use crate::math::mean;
use crate::series::inner_values;
use crate::series_cache::{DerivedCache, check_acyclic, collect_values};
use crate::{
    Bounds, ChartError, FirstValuesProvider, LastValuesProvider, Range, Renderer, Series, SeriesRef,
    Style, ValuesProvider, YAxisType,
};

/// Default window length of simple moving averages and Bollinger bands.
pub const DEFAULT_SMA_PERIOD: usize = 16;

/// Simple moving average of an inner series.
///
/// Each value is the mean of the last `period` inner values up to and
/// including that index; the first indexes average what is available.
#[derive(Clone)]
pub struct SmaSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Window length.
    pub period: usize,
    /// Source data.
    pub inner: SeriesRef,
    cache: DerivedCache<(f64, f64)>,
}

impl fmt::Debug for SmaSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmaSeries")
            .field("name", &self.name)
            .field("style", &self.style)
            .field("y_axis", &self.y_axis)
            .field("period", &self.period)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl SmaSeries {
    /// Averages `inner` over the default period.
    pub fn new(inner: SeriesRef) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            period: DEFAULT_SMA_PERIOD,
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

    fn cached(&self) -> Option<std::rc::Rc<[(f64, f64)]>> {
        let inner = self.inner.as_values()?;
        let period = self.period.max(1);
        self.cache.get(inner.len(), || {
            let (xs, ys) = collect_values(inner);
            xs.iter()
                .enumerate()
                .map(|(i, &x)| (x, mean(&ys[(i + 1).saturating_sub(period)..=i])))
                .collect()
        })
    }
}

impl ValuesProvider for SmaSeries {
    fn len(&self) -> usize {
        self.inner.as_values().map_or(0, ValuesProvider::len)
    }

    fn values(&self, index: usize) -> (f64, f64) {
        self.cached()
            .and_then(|v| v.get(index).copied())
            .unwrap_or((f64::NAN, f64::NAN))
    }
}

impl FirstValuesProvider for SmaSeries {
    fn first_values(&self) -> (f64, f64) {
        self.values(0)
    }
}

impl LastValuesProvider for SmaSeries {
    fn last_values(&self) -> (f64, f64) {
        self.values(self.len().saturating_sub(1))
    }
}

impl Series for SmaSeries {
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
        inner_values(&*self.inner, "sma")?;
        let _ = self.cached();
        check_acyclic(&self.cache, "sma")
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

#[cfg(test)]
mod tests {
    use std::rc::{Rc, Weak};

    use super::*;
    use crate::ContinuousSeries;
    use crate::testing::linear_range;

    fn descending(n: i32) -> SeriesRef {
        Rc::new(ContinuousSeries::new(linear_range(1, n), linear_range(n, 1)))
    }

    #[test]
    fn averages_a_growing_window() {
        let sma = SmaSeries::new(descending(10)).with_period(10);
        let ys: Vec<f64> = (0..sma.len()).map(|i| sma.values(i).1).collect();
        assert_eq!(&ys[..9], &[10.0, 9.5, 9.0, 8.5, 8.0, 7.5, 7.0, 6.5, 6.0]);
    }

    #[test]
    fn last_value_uses_the_trailing_window() {
        let sma = SmaSeries::new(descending(100)).with_period(10);
        assert_eq!(sma.last_values(), (100.0, 5.5));

        let wide = SmaSeries::new(descending(10)).with_period(15);
        assert_eq!(wide.last_values(), (10.0, 5.5));
    }

    #[test]
    fn recomputes_when_the_inner_length_changes() {
        let sma = SmaSeries::new(descending(4)).with_period(2);
        assert_eq!(sma.last_values(), (4.0, 1.5));
        let sma = SmaSeries {
            inner: descending(6),
            ..sma
        };
        assert_eq!(sma.last_values(), (6.0, 1.5));
        assert_eq!(sma.len(), 6);
    }

    struct Looping {
        target: Weak<SmaSeries>,
        style: Style,
    }

    impl ValuesProvider for Looping {
        fn len(&self) -> usize {
            3
        }

        fn values(&self, index: usize) -> (f64, f64) {
            self.target
                .upgrade()
                .map_or((0.0, 0.0), |sma| sma.values(index))
        }
    }

    impl Series for Looping {
        fn name(&self) -> &str {
            "looping"
        }

        fn style(&self) -> &Style {
            &self.style
        }

        fn validate(&self) -> Result<(), ChartError> {
            Ok(())
        }

        fn render(&self, _: &mut dyn Renderer, _: Bounds, _: &Range, _: &Range, _: &Style) {}

        fn as_values(&self) -> Option<&dyn ValuesProvider> {
            Some(self)
        }
    }

    #[test]
    fn self_wrapping_fails_validation() {
        let sma = Rc::new_cyclic(|weak: &Weak<SmaSeries>| {
            SmaSeries::new(Rc::new(Looping {
                target: weak.clone(),
                style: Style::default(),
            }))
        });
        let Err(err) = sma.validate() else {
            panic!("a self-wrapping series must not validate");
        };
        assert_eq!(err.to_string(), "sma series wraps itself");
        assert!(sma.values(0).1.is_nan());
    }
}
