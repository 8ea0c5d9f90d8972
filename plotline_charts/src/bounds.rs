// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel rectangles used throughout layout.

use core::fmt;

use kurbo::Rect;

use crate::math::{degrees_to_radians, to_px};

/// An axis-aligned pixel rectangle.
///
/// `Bounds` is the unit of exchange between layout steps: axes measure into
/// it, charts grow and constrain it, and series draw inside it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Top edge.
    pub top: i32,
    /// Left edge.
    pub left: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl Bounds {
    /// Creates a box from its edges, in `top, left, right, bottom` order.
    #[must_use]
    pub const fn new(top: i32, left: i32, right: i32, bottom: i32) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    /// Creates a box anchored at the origin.
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns `true` if every edge is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> i32 {
        (self.right - self.left).abs()
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> i32 {
        (self.bottom - self.top).abs()
    }

    /// Center point, rounded toward the top-left.
    #[must_use]
    pub fn center(&self) -> (i32, i32) {
        (self.left + (self.width() >> 1), self.top + (self.height() >> 1))
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width()) / f64::from(self.height())
    }

    /// Returns `true` if any edge lies outside `other`.
    #[must_use]
    pub fn is_bigger_than(&self, other: &Self) -> bool {
        self.top < other.top
            || self.bottom > other.bottom
            || self.left < other.left
            || self.right > other.right
    }

    /// Returns `true` if every edge lies strictly inside `other`.
    #[must_use]
    pub fn is_smaller_than(&self, other: &Self) -> bool {
        self.top > other.top
            && self.bottom < other.bottom
            && self.left > other.left
            && self.right < other.right
    }

    /// Union of two boxes.
    #[must_use]
    pub fn grow(&self, other: &Self) -> Self {
        Self::new(
            self.top.min(other.top),
            self.left.min(other.left),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Moves the box by `(x, y)`.
    #[must_use]
    pub fn shift(&self, x: i32, y: i32) -> Self {
        Self::new(self.top + y, self.left + x, self.right + x, self.bottom + y)
    }

    /// Largest box with `target`'s aspect ratio that fits inside `self`,
    /// centered along the axis that has slack.
    #[must_use]
    pub fn fit(&self, target: &Self) -> Self {
        let own = self.aspect_ratio();
        let wanted = target.aspect_ratio();
        if wanted == own || !wanted.is_finite() {
            return *self;
        }
        let (cx, cy) = self.center();
        if wanted > own {
            let half = to_px(f64::from(self.width()) / wanted) >> 1;
            Self::new(cy - half, self.left, self.right, cy + half)
        } else {
            let half = to_px(f64::from(self.height()) * wanted) >> 1;
            Self::new(self.top, cx - half, cx + half, self.bottom)
        }
    }

    /// Clips every edge to `outer`.
    #[must_use]
    pub fn constrain(&self, outer: &Self) -> Self {
        Self::new(
            self.top.max(outer.top),
            self.left.max(outer.left),
            self.right.min(outer.right),
            self.bottom.min(outer.bottom),
        )
    }

    /// Shrinks `self` so that `candidate`, which extends `self` by whatever
    /// surrounds it, would fit inside `full`.
    ///
    /// Each side moves inward by exactly the amount `candidate` overflows
    /// `full` on that side. The result never extends beyond `full`.
    #[must_use]
    pub fn outer_constrain(&self, full: &Self, candidate: &Self) -> Self {
        let mut out = *self;
        if candidate.top < full.top {
            out.top += full.top - candidate.top;
        }
        if candidate.left < full.left {
            out.left += full.left - candidate.left;
        }
        if candidate.right > full.right {
            out.right -= candidate.right - full.right;
        }
        if candidate.bottom > full.bottom {
            out.bottom -= candidate.bottom - full.bottom;
        }
        out.top = out.top.clamp(full.top, full.bottom.max(full.top));
        out.left = out.left.clamp(full.left, full.right.max(full.left));
        out.bottom = out.bottom.clamp(out.top, full.bottom.max(out.top));
        out.right = out.right.clamp(out.left, full.right.max(out.left));
        out
    }

    /// The four corners of the box.
    #[must_use]
    pub fn corners(&self) -> Corners {
        Corners {
            top_left: (self.left, self.top),
            top_right: (self.right, self.top),
            bottom_right: (self.right, self.bottom),
            bottom_left: (self.left, self.bottom),
        }
    }

    /// Converts into a float rectangle.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "box({},{},{},{})",
            self.top, self.left, self.right, self.bottom
        )
    }
}

/// Four `(x, y)` corners of a possibly rotated box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Corners {
    /// Top-left corner.
    pub top_left: (i32, i32),
    /// Top-right corner.
    pub top_right: (i32, i32),
    /// Bottom-right corner.
    pub bottom_right: (i32, i32),
    /// Bottom-left corner.
    pub bottom_left: (i32, i32),
}

impl Corners {
    /// Axis-aligned bounds of the corners.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let xs = [
            self.top_left.0,
            self.top_right.0,
            self.bottom_right.0,
            self.bottom_left.0,
        ];
        let ys = [
            self.top_left.1,
            self.top_right.1,
            self.bottom_right.1,
            self.bottom_left.1,
        ];
        Bounds::new(
            ys.iter().copied().min().unwrap_or_default(),
            xs.iter().copied().min().unwrap_or_default(),
            xs.iter().copied().max().unwrap_or_default(),
            ys.iter().copied().max().unwrap_or_default(),
        )
    }

    /// Center of the corners.
    #[must_use]
    pub fn center(&self) -> (i32, i32) {
        let left = (self.top_left.0 + self.bottom_left.0) / 2;
        let right = (self.top_right.0 + self.bottom_right.0) / 2;
        let top = (self.top_left.1 + self.top_right.1) / 2;
        let bottom = (self.bottom_left.1 + self.bottom_right.1) / 2;
        (((right - left) >> 1) + left, ((bottom - top) >> 1) + top)
    }

    /// Rotates every corner around the center by `degrees`.
    #[must_use]
    pub fn rotate(&self, degrees: f64) -> Self {
        let (cx, cy) = self.center();
        let theta = degrees_to_radians(degrees);
        let (sin, cos) = theta.sin_cos();
        let turn = |(x, y): (i32, i32)| {
            let dx = f64::from(x - cx);
            let dy = f64::from(y - cy);
            (
                to_px(dx * cos - dy * sin) + cx,
                to_px(dx * sin + dy * cos) + cy,
            )
        };
        Self {
            top_left: turn(self.top_left),
            top_right: turn(self.top_right),
            bottom_right: turn(self.bottom_right),
            bottom_left: turn(self.bottom_left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_is_a_union() {
        let a = Bounds::new(1, 2, 15, 15);
        let b = Bounds::new(4, 5, 30, 35);
        assert_eq!(a.grow(&b), Bounds::new(1, 2, 30, 35));
        assert_eq!(a.grow(&b), b.grow(&a));
        let c = Bounds::new(-3, 9, 12, 40);
        assert_eq!(a.grow(&b).grow(&c), a.grow(&b.grow(&c)));
    }

    #[test]
    fn fit_keeps_target_aspect() {
        let a = Bounds::new(64, 64, 192, 192);
        let wide = Bounds::new(16, 16, 256, 170);
        let tall = Bounds::new(16, 16, 170, 256);

        let fab = a.fit(&wide);
        assert_eq!(fab.left, a.left);
        assert_eq!(fab.right, a.right);
        assert!(fab.top < fab.bottom);
        assert!((wide.aspect_ratio() - fab.aspect_ratio()).abs() < 0.02);

        let fac = a.fit(&tall);
        assert_eq!(fac.top, a.top);
        assert_eq!(fac.bottom, a.bottom);
        assert!((tall.aspect_ratio() - fac.aspect_ratio()).abs() < 0.02);
    }

    #[test]
    fn fit_square_into_wide_centers_horizontally() {
        let full = Bounds::new(5, 5, 1019, 395);
        let square = full.fit(&Bounds::from_size(390, 390));
        assert_eq!(square.width(), square.height());
        assert_eq!(square.top, 5);
        assert_eq!(square.center().0, full.center().0);
    }

    #[test]
    fn constrain_clips() {
        let a = Bounds::new(64, 64, 192, 192);
        let b = Bounds::new(16, 16, 256, 170);
        let c = Bounds::new(16, 16, 170, 256);
        assert_eq!(a.constrain(&b), Bounds::new(64, 64, 192, 170));
        assert_eq!(a.constrain(&c), Bounds::new(64, 64, 170, 192));
    }

    #[test]
    fn outer_constrain_pulls_in_overflowing_sides() {
        let full = Bounds::new(0, 0, 100, 100);
        let canvas = Bounds::new(5, 5, 95, 95);

        let taller = Bounds::new(-10, 5, 50, 50);
        assert_eq!(canvas.outer_constrain(&full, &taller).top, 15);

        let wider = Bounds::new(5, 5, 110, 50);
        assert_eq!(canvas.outer_constrain(&full, &wider).right, 85);
    }

    #[test]
    fn outer_constrain_never_leaves_full() {
        let full = Bounds::new(0, 0, 100, 100);
        let candidates = [
            Bounds::new(-500, -500, 600, 600),
            Bounds::new(-10, 20, 30, 40),
            Bounds::new(50, 50, 50, 50),
            Bounds::new(0, -90, 300, 100),
        ];
        let canvases = [
            Bounds::new(5, 5, 95, 95),
            Bounds::new(-20, -20, 150, 150),
            Bounds::new(40, 40, 60, 60),
        ];
        for canvas in canvases {
            for candidate in candidates {
                let out = canvas.outer_constrain(&full, &candidate);
                assert!(out.top >= full.top, "{out} top");
                assert!(out.left >= full.left, "{out} left");
                assert!(out.right <= full.right, "{out} right");
                assert!(out.bottom <= full.bottom, "{out} bottom");
                assert!(out.right >= out.left && out.bottom >= out.top, "{out} inverted");
            }
        }
    }

    #[test]
    fn shift_and_center() {
        let shifted = Bounds::new(5, 5, 10, 10).shift(1, 2);
        assert_eq!(shifted, Bounds::new(7, 6, 11, 12));
        assert_eq!(Bounds::new(10, 10, 20, 30).center(), (15, 20));
    }

    #[test]
    fn bigger_and_smaller() {
        let outer = Bounds::new(0, 0, 100, 100);
        let inner = Bounds::new(10, 10, 90, 90);
        assert!(inner.is_smaller_than(&outer));
        assert!(!inner.is_bigger_than(&outer));
        assert!(outer.is_bigger_than(&inner));
    }

    #[test]
    fn corners_rotate_around_center() {
        let corners = Bounds::new(5, 5, 15, 15).corners();
        let rotated = corners.rotate(45.0);
        assert_eq!(rotated.top_left, (10, 3));
        assert_eq!(corners.rotate(0.0).bounds(), Bounds::new(5, 5, 15, 15));
    }
}
