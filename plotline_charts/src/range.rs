// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping from data values to pixel offsets.

use crate::math::round_px;

/// A continuous mapping from `[min, max]` in data units to `[0, domain]` in
/// pixels.
///
/// `Range` is a value type: every setter returns a new range. Orchestrators
/// rebuild it at each layout phase instead of mutating a shared instance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
    domain: i32,
    descending: bool,
}

impl Range {
    /// Creates an ascending range with an unset domain.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            domain: 0,
            descending: false,
        }
    }

    /// Returns a copy with a new minimum.
    #[must_use]
    pub const fn with_min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    /// Returns a copy with a new maximum.
    #[must_use]
    pub const fn with_max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Returns a copy with a new pixel domain.
    #[must_use]
    pub const fn with_domain(mut self, domain: i32) -> Self {
        self.domain = domain;
        self
    }

    /// Returns a copy that maps `max` to pixel zero instead of `min`.
    #[must_use]
    pub const fn with_descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    /// Lower data bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper data bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Pixel length.
    #[must_use]
    pub const fn domain(&self) -> i32 {
        self.domain
    }

    /// `max - min`.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the range is inverted.
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        self.descending
    }

    /// Returns `true` when neither bound nor the domain has been set.
    ///
    /// NaN bounds count as unset.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        (self.min == 0.0 || self.min.is_nan())
            && (self.max == 0.0 || self.max.is_nan())
            && self.domain == 0
    }

    /// Maps a data value to a pixel offset in `[0, domain]`.
    ///
    /// A degenerate range (`min == max`) maps everything to zero.
    #[must_use]
    pub fn translate(&self, value: f64) -> i32 {
        let delta = self.delta();
        if delta == 0.0 || !delta.is_finite() {
            return 0;
        }
        let offset = round_px((value - self.min) / delta * f64::from(self.domain));
        if self.descending {
            self.domain - offset
        } else {
            offset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_pins_endpoints() {
        let r = Range::new(1.0, 8.0).with_domain(1000);
        assert_eq!(r.translate(1.0), 0);
        assert_eq!(r.translate(8.0), 1000);
        assert_eq!(r.translate(4.5), 500);
    }

    #[test]
    fn translate_is_monotonic() {
        let r = Range::new(-3.0, 17.0).with_domain(377);
        let d = r.with_descending(true);
        let mut prev = r.translate(-3.0);
        let mut prev_d = d.translate(-3.0);
        for i in 1..=200 {
            let v = -3.0 + f64::from(i) * 0.1;
            let t = r.translate(v);
            let td = d.translate(v);
            assert!(t >= prev, "ascending at {v}");
            assert!(td <= prev_d, "descending at {v}");
            prev = t;
            prev_d = td;
        }
        assert_eq!(d.translate(-3.0), 377);
        assert_eq!(d.translate(17.0), 0);
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        let r = Range::new(5.0, 5.0).with_domain(300);
        assert_eq!(r.translate(5.0), 0);
        assert_eq!(r.translate(100.0), 0);
    }

    #[test]
    fn zero_means_unset() {
        assert!(Range::default().is_zero());
        assert!(Range::new(f64::NAN, 0.0).is_zero());
        assert!(!Range::new(0.0, 1.0).is_zero());
        assert!(!Range::default().with_domain(10).is_zero());
    }

    #[test]
    fn setters_return_new_values() {
        let a = Range::new(0.0, 10.0);
        let b = a.with_max(20.0).with_domain(100);
        assert_eq!(a.max(), 10.0);
        assert_eq!(a.domain(), 0);
        assert_eq!(b.max(), 20.0);
        assert_eq!(b.delta(), 20.0);
    }
}
