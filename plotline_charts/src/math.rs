// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric helpers shared by tick generation, series and chart geometry.

use core::f64::consts::{PI, TAU};

/// Granularities below this are treated as "do not round".
const ROUND_EPSILON: f64 = 1e-15;

/// Returns a power-of-ten rounding granularity for a value range.
///
/// The result is one tenth of the largest power of ten (from `1e10` down)
/// that `delta` exceeds, or `0` when no such power exists.
#[must_use]
pub fn round_to(delta: f64) -> f64 {
    let mut cursor = 1e10_f64;
    while cursor > 0.0 {
        if delta > cursor {
            return cursor / 10.0;
        }
        cursor /= 10.0;
    }
    0.0
}

/// Rounds `value` up to a multiple of `round_to`.
#[must_use]
pub fn round_up(value: f64, round_to: f64) -> f64 {
    if round_to < ROUND_EPSILON {
        return value;
    }
    (value / round_to).ceil() * round_to
}

/// Rounds `value` down to a multiple of `round_to`.
#[must_use]
pub fn round_down(value: f64, round_to: f64) -> f64 {
    if round_to < ROUND_EPSILON {
        return value;
    }
    (value / round_to).floor() * round_to
}

/// Returns `(min, max)` of `values`, or `(0, 0)` for an empty slice.
#[must_use]
pub fn min_max(values: &[f64]) -> (f64, f64) {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return (0.0, 0.0);
    };
    iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Relative change from `from` to `to`.
#[must_use]
pub fn percent_difference(from: f64, to: f64) -> f64 {
    (to - from) / from
}

/// Converts a share of a full turn (`0..=1`) into radians.
#[must_use]
pub fn percent_to_radians(pct: f64) -> f64 {
    TAU * pct
}

/// Converts degrees into radians.
#[must_use]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Converts radians into degrees.
#[must_use]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Point on a circle at `theta` radians, measured clockwise from the positive
/// x axis in y-down pixel space.
#[must_use]
pub fn circle_point(cx: i32, cy: i32, radius: f64, theta: f64) -> (i32, i32) {
    (
        cx + to_px(radius * theta.cos()),
        cy + to_px(radius * theta.sin()),
    )
}

/// Arithmetic mean; `0` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0` for an empty slice.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Truncates a pixel offset toward zero.
#[allow(
    clippy::cast_possible_truncation,
    reason = "pixel offsets are far inside the i32 range"
)]
pub(crate) fn to_px(v: f64) -> i32 {
    v as i32
}

/// Rounds a pixel offset to the nearest integer.
#[allow(
    clippy::cast_possible_truncation,
    reason = "pixel offsets are far inside the i32 range"
)]
pub(crate) fn round_px(v: f64) -> i32 {
    v.round() as i32
}

/// Rounds a pixel offset up.
#[allow(
    clippy::cast_possible_truncation,
    reason = "pixel offsets are far inside the i32 range"
)]
pub(crate) fn ceil_px(v: f64) -> i32 {
    v.ceil() as i32
}

/// Solves the dense system `a * x = b` by Gaussian elimination with partial
/// pivoting. Returns `None` for a singular matrix.
pub(crate) fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        let pivot_row = a[col].clone();
        let pivot_b = b[col];
        for row in col + 1..n {
            let factor = a[row][col] / pivot_row[col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * pivot_row[k];
            }
            b[row] -= factor * pivot_b;
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_picks_a_tenth_of_the_magnitude() {
        assert!((round_to(4.0) - 0.1).abs() < 1e-12);
        assert!((round_to(250.0) - 10.0).abs() < 1e-12);
        assert!((round_to(0.5) - 0.01).abs() < 1e-12);
        assert_eq!(round_to(0.0), 0.0);
    }

    #[test]
    fn rounding_is_identity_without_granularity() {
        assert_eq!(round_up(1.234, 0.0), 1.234);
        assert_eq!(round_down(1.234, 0.0), 1.234);
        assert!((round_up(1.21, 0.1) - 1.3).abs() < 1e-9);
        assert!((round_down(1.29, 0.1) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn min_max_and_stats() {
        assert_eq!(min_max(&[3.0, -1.0, 7.0]), (-1.0, 7.0));
        assert_eq!(min_max(&[]), (0.0, 0.0));
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn circle_point_walks_clockwise_from_three_oclock() {
        assert_eq!(circle_point(100, 100, 10.0, 0.0), (110, 100));
        assert_eq!(circle_point(100, 100, 10.0, PI / 2.0), (100, 110));
    }

    #[test]
    fn solves_small_system() {
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let Some(x) = solve_linear_system(a, vec![3.0, 5.0]) else {
            panic!("system is not singular");
        };
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
        assert!(solve_linear_system(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]).is_none());
    }
}
