// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by chart rendering.

use core::fmt;

/// Which range a degenerate-delta error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeAxis {
    /// The shared X range.
    X,
    /// The primary Y range.
    Y,
    /// The secondary Y range.
    SecondaryY,
}

impl fmt::Display for RangeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::SecondaryY => "secondary y",
        })
    }
}

/// Everything that can make a chart render fail.
///
/// Configuration and range errors are detected before the renderer is
/// created, so a failed render never writes partial output.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The chart has no series at all.
    #[error("please provide at least one series")]
    NoSeries,
    /// Every series is hidden.
    #[error("chart render; must have (1) visible series")]
    NoVisibleSeries,
    /// A bar chart has no bars.
    #[error("please provide at least one bar")]
    NoBars,
    /// A pie or donut chart has no values.
    #[error("please provide at least one value")]
    NoValues,
    /// A pie or donut chart has only zero or negative values.
    #[error("{kind} chart must contain at least (1) non-zero value")]
    NoNonZeroValues {
        /// `"pie"` or `"donut"`.
        kind: &'static str,
    },
    /// A range delta is infinite.
    #[error("infinite {0}-range delta")]
    InfiniteRangeDelta(RangeAxis),
    /// A range delta is NaN.
    #[error("nan {0}-range delta")]
    NanRangeDelta(RangeAxis),
    /// A range delta is zero.
    #[error("zero {0}-range delta; there needs to be at least (2) values")]
    ZeroRangeDelta(RangeAxis),
    /// A bar chart's value range collapsed to a single value.
    #[error("invalid data range; cannot be zero")]
    ZeroBarRange,
    /// A series failed validation.
    #[error("{0}")]
    InvalidSeries(String),
    /// The renderer provider could not create a renderer.
    #[error("renderer: {0}")]
    Renderer(String),
    /// Writing the finished drawing failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Builds a [`ChartError::InvalidSeries`] from any message.
    pub fn invalid_series(msg: impl Into<String>) -> Self {
        Self::InvalidSeries(msg.into())
    }
}
