// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Labelled values for bar, pie and annotation data.

use crate::Style;
use crate::math::round_down;

/// A labelled scalar, such as one bar or one pie slice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Value {
    /// The value.
    pub value: f64,
    /// Display label.
    pub label: String,
    /// Per-value style, inheriting from the chart's.
    pub style: Style,
}

impl Value {
    /// Creates a value with a label.
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            style: Style::default(),
        }
    }

    /// Returns a copy with a style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// A labelled point, such as one annotation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Value2 {
    /// X position in data units.
    pub x: f64,
    /// Y position in data units.
    pub y: f64,
    /// Display label.
    pub label: String,
    /// Per-point style, inheriting from the series'.
    pub style: Style,
}

impl Value2 {
    /// Creates a point with a label.
    pub fn new(x: f64, y: f64, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: label.into(),
            style: Style::default(),
        }
    }
}

/// Sum of all values.
#[must_use]
pub fn values_total(values: &[Value]) -> f64 {
    values.iter().map(|v| v.value).sum()
}

/// Scales values to fractions of their total, rounded down to four decimals.
///
/// Non-positive and non-finite values are dropped before totalling, so the
/// result is empty or sums to at most one.
#[must_use]
pub fn normalize_values(values: &[Value]) -> Vec<Value> {
    let kept: Vec<&Value> = values
        .iter()
        .filter(|v| v.value > 0.0 && v.value.is_finite())
        .collect();
    let total: f64 = kept.iter().map(|v| v.value).sum();
    if !(total > 0.0 && total.is_finite()) {
        return Vec::new();
    }
    kept.into_iter()
        .map(|v| Value {
            value: round_down(v.value / total, 0.0001),
            ..v.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_non_positive() {
        let values = [
            Value::new(10.0, "a"),
            Value::new(0.0, "b"),
            Value::new(30.0, "c"),
            Value::new(-5.0, "d"),
        ];
        let normalized = normalize_values(&values);
        let labels: Vec<&str> = normalized.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c"]);
        assert!((normalized[0].value - 0.25).abs() < 1e-9);
        assert!((normalized[1].value - 0.75).abs() < 1e-9);
    }

    #[test]
    fn normalize_of_equal_parts() {
        let values = [Value::new(1.0, "a"), Value::new(1.0, "b"), Value::new(2.0, "c")];
        let normalized = normalize_values(&values);
        for (v, expected) in normalized.iter().zip([0.25, 0.25, 0.5]) {
            assert!((v.value - expected).abs() < 1e-9, "{} != {expected}", v.value);
        }
    }

    #[test]
    fn all_zero_normalizes_to_empty() {
        assert!(normalize_values(&[Value::new(0.0, "a")]).is_empty());
    }

    #[test]
    fn negative_values_do_not_shrink_the_total() {
        let values = [Value::new(5.0, "a"), Value::new(3.0, "b"), Value::new(-8.0, "c")];
        let normalized = normalize_values(&values);
        assert_eq!(normalized.len(), 2);
        assert!((normalized[0].value - 0.625).abs() < 1e-9);
        assert!((normalized[1].value - 0.375).abs() < 1e-9);
        assert!(normalized.iter().all(|v| v.value.is_finite()));
    }

    #[test]
    fn infinite_values_normalize_to_empty() {
        let values = [Value::new(f64::INFINITY, "a"), Value::new(-1.0, "b")];
        assert!(normalize_values(&values).is_empty());
    }
}
