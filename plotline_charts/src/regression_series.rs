// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Regression fits over a window of an inner series.

use core::fmt;
use core::ops::Range as IndexRange;
use std::rc::Rc;

use crate::draw::draw_line_series;
use crate::math::{mean, solve_linear_system, std_dev};
use crate::series::inner_values;
use crate::series_cache::{DerivedCache, check_acyclic};
use crate::{
    Bounds, ChartError, FirstValuesProvider, LastValuesProvider, Range, Renderer, Series, SeriesRef,
    Style, ValuesProvider, YAxisType,
};

/// Indexes of the inner series covered by `offset` and `limit`.
fn window(inner_len: usize, offset: usize, limit: Option<usize>) -> IndexRange<usize> {
    let start = offset.min(inner_len);
    let end = limit.map_or(inner_len, |l| start.saturating_add(l).min(inner_len));
    start..end
}

fn window_values(inner: &dyn ValuesProvider, w: IndexRange<usize>) -> (Vec<f64>, Vec<f64>) {
    w.map(|i| inner.values(i)).unzip()
}

/// Ordinary least squares line `y = m*x + b`.
pub(crate) fn linear_fit(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let mx = mean(xs);
    let my = mean(ys);
    let (num, den) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(num, den), (x, y)| {
            (num + (x - mx) * (y - my), den + (x - mx) * (x - mx))
        });
    if den == 0.0 {
        return (0.0, my);
    }
    let m = num / den;
    (m, my - m * mx)
}

/// A straight line fitted to a window of an inner series.
#[derive(Clone)]
pub struct LinearRegressionSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// First inner index of the window.
    pub offset: usize,
    /// Window length; the rest of the series when unset.
    pub limit: Option<usize>,
    /// Source data.
    pub inner: SeriesRef,
    cache: DerivedCache<(f64, f64)>,
}

impl fmt::Debug for LinearRegressionSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearRegressionSeries")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl LinearRegressionSeries {
    /// Fits the whole of `inner`.
    pub fn new(inner: SeriesRef) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            offset: 0,
            limit: None,
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

    /// Returns a copy fitted to `limit` values starting at `offset`.
    #[must_use]
    pub fn with_window(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    fn coefficients(&self) -> Option<(f64, f64)> {
        let inner = self.inner.as_values()?;
        let w = window(inner.len(), self.offset, self.limit);
        let fit = self.cache.get(inner.len(), || {
            let (xs, ys) = window_values(inner, w);
            vec![linear_fit(&xs, &ys)]
        })?;
        fit.first().copied()
    }
}

impl ValuesProvider for LinearRegressionSeries {
    fn len(&self) -> usize {
        self.inner
            .as_values()
            .map_or(0, |inner| window(inner.len(), self.offset, self.limit).len())
    }

    fn values(&self, index: usize) -> (f64, f64) {
        let (Some(inner), Some((m, b))) = (self.inner.as_values(), self.coefficients()) else {
            return (f64::NAN, f64::NAN);
        };
        let (x, _) = inner.values(self.offset + index);
        (x, m * x + b)
    }
}

impl FirstValuesProvider for LinearRegressionSeries {
    fn first_values(&self) -> (f64, f64) {
        self.values(0)
    }
}

impl LastValuesProvider for LinearRegressionSeries {
    fn last_values(&self) -> (f64, f64) {
        self.values(self.len().saturating_sub(1))
    }
}

impl Series for LinearRegressionSeries {
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
        inner_values(&*self.inner, "linear regression")?;
        let _ = self.coefficients();
        check_acyclic(&self.cache, "linear regression")
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

/// A fitted polynomial in normalized x.
#[derive(Clone, Debug)]
struct PolynomialFit {
    x_mean: f64,
    x_scale: f64,
    coefficients: Vec<f64>,
}

impl PolynomialFit {
    fn eval(&self, x: f64) -> f64 {
        let xn = (x - self.x_mean) / self.x_scale;
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * xn + c)
    }
}

fn polynomial_fit(xs: &[f64], ys: &[f64], degree: usize) -> Option<PolynomialFit> {
    let x_mean = mean(xs);
    let sd = std_dev(xs);
    let x_scale = if sd > 0.0 { sd } else { 1.0 };
    let n = degree + 1;
    // Sums of xn^k for k in 0..=2*degree.
    let mut power_sums = vec![0.0; 2 * degree + 1];
    let mut rhs = vec![0.0; n];
    for (x, y) in xs.iter().zip(ys) {
        let xn = (x - x_mean) / x_scale;
        let mut p = 1.0;
        for (k, sum) in power_sums.iter_mut().enumerate() {
            *sum += p;
            if k < n {
                rhs[k] += p * y;
            }
            p *= xn;
        }
    }
    let a = (0..n)
        .map(|i| power_sums[i..i + n].to_vec())
        .collect::<Vec<_>>();
    let coefficients = solve_linear_system(a, rhs)?;
    Some(PolynomialFit {
        x_mean,
        x_scale,
        coefficients,
    })
}

/// A least-squares polynomial fitted to a window of an inner series.
#[derive(Clone)]
pub struct PolynomialRegressionSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Polynomial degree.
    pub degree: usize,
    /// First inner index of the window.
    pub offset: usize,
    /// Window length; the rest of the series when unset.
    pub limit: Option<usize>,
    /// Source data.
    pub inner: SeriesRef,
    cache: DerivedCache<Option<PolynomialFit>>,
}

impl fmt::Debug for PolynomialRegressionSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolynomialRegressionSeries")
            .field("name", &self.name)
            .field("degree", &self.degree)
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("inner", &self.inner.name())
            .finish_non_exhaustive()
    }
}

impl PolynomialRegressionSeries {
    /// Fits a polynomial of `degree` to the whole of `inner`.
    pub fn new(inner: SeriesRef, degree: usize) -> Self {
        Self {
            name: String::new(),
            style: Style::default(),
            y_axis: YAxisType::Primary,
            degree,
            offset: 0,
            limit: None,
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

    /// Returns a copy fitted to `limit` values starting at `offset`.
    #[must_use]
    pub fn with_window(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    fn fit(&self) -> Option<Rc<[Option<PolynomialFit>]>> {
        let inner = self.inner.as_values()?;
        let w = window(inner.len(), self.offset, self.limit);
        self.cache.get(inner.len(), || {
            let (xs, ys) = window_values(inner, w);
            vec![polynomial_fit(&xs, &ys, self.degree)]
        })
    }
}

impl ValuesProvider for PolynomialRegressionSeries {
    fn len(&self) -> usize {
        self.inner
            .as_values()
            .map_or(0, |inner| window(inner.len(), self.offset, self.limit).len())
    }

    fn values(&self, index: usize) -> (f64, f64) {
        let Some(inner) = self.inner.as_values() else {
            return (f64::NAN, f64::NAN);
        };
        let fit = self.fit();
        let Some(Some(fit)) = fit.as_deref().and_then(<[_]>::first) else {
            return (f64::NAN, f64::NAN);
        };
        let (x, _) = inner.values(self.offset + index);
        (x, fit.eval(x))
    }
}

impl FirstValuesProvider for PolynomialRegressionSeries {
    fn first_values(&self) -> (f64, f64) {
        self.values(0)
    }
}

impl LastValuesProvider for PolynomialRegressionSeries {
    fn last_values(&self) -> (f64, f64) {
        self.values(self.len().saturating_sub(1))
    }
}

impl Series for PolynomialRegressionSeries {
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
        inner_values(&*self.inner, "polynomial regression")?;
        if self.degree == 0 {
            return Err(ChartError::invalid_series(
                "polynomial regression series requires a degree greater than zero",
            ));
        }
        if self.len() <= self.degree {
            return Err(ChartError::invalid_series(
                "polynomial regression series requires more values than its degree",
            ));
        }
        let fitted = self
            .fit()
            .is_some_and(|fit| fit.first().is_some_and(Option::is_some));
        check_acyclic(&self.cache, "polynomial regression")?;
        if !fitted {
            return Err(ChartError::invalid_series(
                "polynomial regression series; values cannot be fitted",
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContinuousSeries;
    use crate::testing::linear_range;

    fn identity(from: i32, to: i32) -> SeriesRef {
        Rc::new(ContinuousSeries::new(
            linear_range(from, to),
            linear_range(from, to),
        ))
    }

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-7 && (actual.1 - expected.1).abs() < 1e-7,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn linear_fit_of_identity() {
        let lr = LinearRegressionSeries::new(identity(1, 100));
        assert_close(lr.values(0), (1.0, 1.0));
        assert_close(lr.last_values(), (100.0, 100.0));
    }

    #[test]
    fn linear_fit_of_descending_identity() {
        let lr = LinearRegressionSeries::new(identity(100, 1));
        assert_close(lr.values(0), (100.0, 100.0));
        assert_close(lr.last_values(), (1.0, 1.0));
    }

    #[test]
    fn linear_fit_over_a_window() {
        let lr = LinearRegressionSeries::new(identity(100, 1)).with_window(10, 10);
        assert_eq!(lr.len(), 10);
        assert_close(lr.values(0), (90.0, 90.0));
        assert_close(lr.last_values(), (81.0, 81.0));
    }

    #[test]
    fn window_clamps_to_inner_length() {
        assert_eq!(window(5, 3, Some(10)), 3..5);
        assert_eq!(window(5, 9, None), 5..5);
    }

    #[test]
    fn quadratic_fit_is_exact() {
        let xs: Vec<f64> = (0..100).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        let poly = PolynomialRegressionSeries::new(Rc::new(ContinuousSeries::new(xs, ys)), 2);
        assert!(poly.validate().is_ok());
        for i in 0..100 {
            let (x, y) = poly.values(i);
            assert!((y - x * x).abs() < 1e-6, "{y} at {x}");
        }
    }

    #[test]
    fn degree_must_be_fittable() {
        let poly = PolynomialRegressionSeries::new(identity(1, 3), 3);
        assert!(poly.validate().is_err());
        let poly = PolynomialRegressionSeries::new(identity(1, 3), 0);
        assert!(poly.validate().is_err());
    }
}
