// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::draw::draw_line_series;
use crate::{Bounds, ChartError, Range, Renderer, Series, SeriesRef, Style, ValuesProvider, YAxisType};

/// The values of several series joined end to end.
///
/// Members without values contribute nothing.
#[derive(Clone, Default)]
pub struct ConcatSeries {
    /// Display name.
    pub name: String,
    /// Line style.
    pub style: Style,
    /// Y axis to plot against.
    pub y_axis: YAxisType,
    /// Joined series, in order.
    pub members: Vec<SeriesRef>,
}

impl fmt::Debug for ConcatSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatSeries")
            .field("name", &self.name)
            .field("members", &self.members.len())
            .finish_non_exhaustive()
    }
}

impl ConcatSeries {
    /// Joins `members`.
    pub fn new(members: Vec<SeriesRef>) -> Self {
        Self {
            members,
            ..Self::default()
        }
    }

    /// Returns a copy with a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ValuesProvider for ConcatSeries {
    fn len(&self) -> usize {
        self.members
            .iter()
            .filter_map(|s| s.as_values())
            .map(ValuesProvider::len)
            .sum()
    }

    fn values(&self, index: usize) -> (f64, f64) {
        let mut cursor = index;
        for vs in self.members.iter().filter_map(|s| s.as_values()) {
            if cursor < vs.len() {
                return vs.values(cursor);
            }
            cursor -= vs.len();
        }
        (f64::NAN, f64::NAN)
    }
}

impl Series for ConcatSeries {
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
        self.members.iter().try_for_each(|s| s.validate())
    }

    fn render(&self, r: &mut dyn Renderer, canvas: Bounds, x: &Range, y: &Range, defaults: &Style) {
        draw_line_series(r, canvas, x, y, &self.style.inherit_from(defaults), self);
    }

    fn as_values(&self) -> Option<&dyn ValuesProvider> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::ContinuousSeries;
    use crate::testing::linear_range;

    #[test]
    fn walks_members_in_order() {
        let cs = ConcatSeries::new(vec![
            Rc::new(ContinuousSeries::new(linear_range(1, 10), linear_range(1, 10))),
            Rc::new(ContinuousSeries::new(linear_range(11, 20), linear_range(10, 1))),
            Rc::new(ContinuousSeries::new(linear_range(21, 30), linear_range(1, 10))),
        ]);
        assert_eq!(cs.len(), 30);
        assert_eq!(cs.values(0), (1.0, 1.0));
        assert_eq!(cs.values(19), (20.0, 1.0));
        assert_eq!(cs.values(29), (30.0, 10.0));
        assert!(cs.validate().is_ok());
    }
}
