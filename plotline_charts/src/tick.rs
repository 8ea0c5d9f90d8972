// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick generation.
//!
//! Two strategies exist. Continuous ticks pin the first and last tick to the
//! range bounds and space interior ticks by measured label size. Nice ticks
//! snap to 1/2/5 multiples of a power of ten and may extend past the range
//! max, which lets the caller widen the range to the last tick.

use core::fmt::Write as _;

use tracing::trace;

use crate::math::{round_to, round_up};
use crate::text::measure_text;
use crate::{Defaults, Range, Renderer, Style, ValueFormatter};

/// A labelled position along an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Position in data units.
    pub value: f64,
    /// Display text.
    pub label: String,
}

impl Tick {
    /// Creates a tick.
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Sorts ticks by value.
pub fn sort_ticks(ticks: &mut [Tick]) {
    ticks.sort_by(|a, b| a.value.total_cmp(&b.value));
}

/// Renders ticks as `[0: label], [1: label]`.
#[must_use]
pub fn ticks_to_string(ticks: &[Tick]) -> String {
    let mut out = String::new();
    for (i, t) in ticks.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "[{i}: {}]", t.label);
    }
    out
}

/// Generates ticks for an axis.
///
/// Explicit ticks win. Otherwise the default float formatter gets nice ticks
/// and every other formatter gets continuous ticks.
pub fn axis_ticks(
    explicit: &[Tick],
    r: &mut dyn Renderer,
    range: &Range,
    vertical: bool,
    style: &Style,
    vf: &ValueFormatter,
    defaults: &Defaults,
) -> Vec<Tick> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    if vf.is_default_float() {
        generate_nice_ticks(r, range, vertical, style, vf, defaults)
    } else {
        generate_continuous_ticks(r, range, vertical, style, vf, defaults)
    }
}

/// Widens the range max to the tick extremum when the ticks run past it.
///
/// The extremum is the last tick, or the first one for descending ranges.
#[must_use]
pub fn widen_to_ticks(range: Range, ticks: &[Tick]) -> Range {
    let extremum = if range.is_descending() {
        ticks.first()
    } else {
        ticks.last()
    };
    match extremum {
        Some(t) if t.value > range.max() => range.with_max(t.value),
        _ => range,
    }
}

/// Pixel footprint of the range's min label along the axis, plus spacing.
fn tick_size(
    r: &mut dyn Renderer,
    range: &Range,
    vertical: bool,
    style: &Style,
    vf: &ValueFormatter,
    defaults: &Defaults,
) -> i32 {
    let label = measure_text(r, &vf.format(range.min()), style);
    if vertical {
        label.height() + defaults.minimum_tick_vertical_spacing
    } else {
        label.width() + defaults.minimum_tick_horizontal_spacing
    }
}

/// Generates ticks pinned to the range bounds, spaced by label size.
pub fn generate_continuous_ticks(
    r: &mut dyn Renderer,
    range: &Range,
    vertical: bool,
    style: &Style,
    vf: &ValueFormatter,
    defaults: &Defaults,
) -> Vec<Tick> {
    let (min, max) = (range.min(), range.max());
    let descending = range.is_descending();
    let (first, last) = if descending { (max, min) } else { (min, max) };

    let mut ticks = vec![Tick::new(first, vf.format(first))];

    let size = tick_size(r, range, vertical, style, vf, defaults);
    let remainder = range.domain() - 2 * size;
    let intermediate = if size <= 0 || remainder <= 0 {
        0
    } else {
        usize::try_from(remainder / size)
            .unwrap_or(0)
            .min(defaults.tick_count_sanity_check)
    };

    if intermediate > 0 {
        let range_delta = (max - min).abs();
        let step = range_delta / intermediate as f64;
        let granularity = round_to(range_delta) / 10.0;
        for i in 1..intermediate {
            let offset = round_up(step * i as f64, granularity);
            let value = if descending { max - offset } else { min + offset };
            ticks.push(Tick::new(value, vf.format(value)));
        }
    }

    ticks.push(Tick::new(last, vf.format(last)));
    trace!(count = ticks.len(), tick_size = size, "continuous ticks");
    ticks
}

/// Generates nice ticks sized to the axis.
///
/// The tick count is the number of measured labels that fit the domain,
/// between two and [`Defaults::tick_count`]. Ticks below the range min are
/// dropped; ticks above the max are kept so the caller can widen the range.
pub fn generate_nice_ticks(
    r: &mut dyn Renderer,
    range: &Range,
    vertical: bool,
    style: &Style,
    vf: &ValueFormatter,
    defaults: &Defaults,
) -> Vec<Tick> {
    let size = tick_size(r, range, vertical, style, vf, defaults);
    let fits = if size > 0 {
        usize::try_from(range.domain() / size).unwrap_or(0)
    } else {
        0
    };
    let count = fits.clamp(2, defaults.tick_count.max(2));

    let (min, max) = (range.min(), range.max());
    let mut values: Vec<f64> = nice_ticks(min, max, count)
        .into_iter()
        .filter(|v| *v >= min - (max - min).abs() * 1e-9)
        .collect();
    if range.is_descending() {
        values.reverse();
    }
    trace!(count = values.len(), requested = count, "nice ticks");
    values
        .into_iter()
        .map(|v| Tick::new(v, vf.format(v)))
        .collect()
}

/// Nice tick values covering `[min, max]` with roughly `count` ticks.
///
/// `count` is raised to two. The first value is at or below `min` and the
/// last at or above `max`.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let count = count.max(2);
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }

    let spacing = nice_num(nice_num(max - min, false) / (count - 1) as f64, true);
    if !spacing.is_finite() || spacing <= 0.0 {
        return vec![min, max];
    }
    let nice_min = (min / spacing).floor() * spacing;
    let nice_max = (max / spacing).ceil() * spacing;

    let steps = ((nice_max - nice_min) / spacing).round();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "steps is finite, non-negative and bounded by the clamp"
    )]
    let steps = steps.clamp(0.0, 10_000.0) as usize;
    (0..=steps)
        .map(|i| {
            let v = nice_min + spacing * i as f64;
            if v.abs() < spacing * 1e-9 { 0.0 } else { v }
        })
        .collect()
}

/// Snaps `value` to 1, 2, 5 or 10 times a power of ten.
///
/// `round` picks the nearest candidate; otherwise the smallest candidate not
/// below `value`.
fn nice_num(value: f64, round: bool) -> f64 {
    let exponent = value.log10().floor();
    let base = 10_f64.powf(exponent);
    let fraction = value / base;
    let nice = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRenderer;

    fn assert_values(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn nice_ticks_boundary_cases() {
        assert_values(&nice_ticks(0.0, 10.0, 3), &[0.0, 5.0, 10.0]);
        assert_values(&nice_ticks(0.0, 10.0, 2), &[0.0, 10.0]);
        assert_values(&nice_ticks(0.0, 10.0, 5), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_values(
            &nice_ticks(-10.0, 10.0, 8),
            &[-10.0, -8.0, -6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0, 8.0, 10.0],
        );
        assert_values(
            &nice_ticks(1.0, 5.0, 10),
            &[1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0],
        );
    }

    #[test]
    fn nice_ticks_clamps_count() {
        assert_eq!(nice_ticks(0.0, 10.0, 1), nice_ticks(0.0, 10.0, 2));
        assert_eq!(nice_ticks(0.0, 10.0, 0), nice_ticks(0.0, 10.0, 2));
    }

    #[test]
    fn nice_ticks_are_uniform_and_cover() {
        let ticks = nice_ticks(0.37, 91.2, 7);
        assert!(ticks[0] <= 0.37);
        assert!(*ticks.last().unwrap_or(&0.0) >= 91.2);
        let step = ticks[1] - ticks[0];
        for w in ticks.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-9);
        }
    }

    #[test]
    fn continuous_ticks_pin_bounds() {
        let mut r = RecordingRenderer::new(1024, 400);
        let range = Range::new(0.0, 100.0).with_domain(1000);
        let style = Style::default().with_font_size(10.0);
        let vf = ValueFormatter::Int;
        let ticks = generate_continuous_ticks(&mut r, &range, false, &style, &vf, &Defaults::default());
        assert_eq!(ticks.first().map(|t| t.value), Some(0.0));
        assert_eq!(ticks.last().map(|t| t.value), Some(100.0));
        // Label "0" is 6px wide, so ticks are 26px apart: (1000 - 52) / 26 = 36.
        assert_eq!(ticks.len(), 37);
        for w in ticks.windows(2) {
            assert!(w[1].value > w[0].value);
        }
    }

    #[test]
    fn continuous_ticks_descending_mirror() {
        let mut r = RecordingRenderer::new(1024, 400);
        let range = Range::new(0.0, 100.0).with_domain(200).with_descending(true);
        let style = Style::default().with_font_size(10.0);
        let ticks = generate_continuous_ticks(
            &mut r,
            &range,
            true,
            &style,
            &ValueFormatter::Int,
            &Defaults::default(),
        );
        assert_eq!(ticks.first().map(|t| t.value), Some(100.0));
        assert_eq!(ticks.last().map(|t| t.value), Some(0.0));
        for w in ticks.windows(2) {
            assert!(w[1].value < w[0].value);
        }
    }

    #[test]
    fn continuous_ticks_short_circuit_on_tiny_domain() {
        let mut r = RecordingRenderer::new(10, 10);
        let range = Range::new(0.0, 1.0).with_domain(15);
        let ticks = generate_continuous_ticks(
            &mut r,
            &range,
            false,
            &Style::default().with_font_size(10.0),
            &ValueFormatter::Float,
            &Defaults::default(),
        );
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks_to_string(&ticks), "[0: 0.00], [1: 1.00]");
    }

    #[test]
    fn continuous_ticks_are_idempotent() {
        let mut r = RecordingRenderer::new(1024, 400);
        let range = Range::new(-3.3, 47.9).with_domain(731);
        let style = Style::default().with_font_size(10.0);
        let vf = ValueFormatter::Float;
        let d = Defaults::default();
        let a = generate_continuous_ticks(&mut r, &range, true, &style, &vf, &d);
        let b = generate_continuous_ticks(&mut r, &range, true, &style, &vf, &d);
        assert_eq!(a, b);
    }

    #[test]
    fn nice_ticks_drop_below_min_and_widen_max() {
        let mut r = RecordingRenderer::new(1024, 400);
        let range = Range::new(0.5, 9.2).with_domain(300);
        let style = Style::default().with_font_size(10.0);
        let ticks = generate_nice_ticks(
            &mut r,
            &range,
            true,
            &style,
            &ValueFormatter::Float,
            &Defaults::default(),
        );
        assert!(ticks.iter().all(|t| t.value >= 0.5));
        let widened = widen_to_ticks(range, &ticks);
        assert!(widened.max() >= 9.2);
        assert_eq!(widened.max(), ticks.last().map_or(0.0, |t| t.value));
    }

    #[test]
    fn widen_uses_first_tick_when_descending() {
        let range = Range::new(0.0, 9.0).with_descending(true);
        let ticks = vec![Tick::new(10.0, "10"), Tick::new(0.0, "0")];
        assert_eq!(widen_to_ticks(range, &ticks).max(), 10.0);
        let asc = Range::new(0.0, 9.0);
        assert_eq!(widen_to_ticks(asc, &ticks).max(), 9.0);
    }

    #[test]
    fn explicit_ticks_bypass_generation() {
        let mut r = RecordingRenderer::new(1024, 400);
        let explicit = vec![Tick::new(1.0, "one"), Tick::new(2.0, "two")];
        let got = axis_ticks(
            &explicit,
            &mut r,
            &Range::new(0.0, 10.0).with_domain(100),
            false,
            &Style::default(),
            &ValueFormatter::Float,
            &Defaults::default(),
        );
        assert_eq!(got, explicit);
    }

    #[test]
    fn sorting() {
        let mut ticks = vec![Tick::new(3.0, "c"), Tick::new(1.0, "a"), Tick::new(2.0, "b")];
        sort_ticks(&mut ticks);
        assert_eq!(ticks_to_string(&ticks), "[0: a], [1: b], [2: c]");
    }
}
