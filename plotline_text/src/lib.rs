// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement for chart layout.
//!
//! Plotline lays out axes, titles and labels before anything is drawn, so the
//! layout engine needs to know how large a label will be. Renderers answer that
//! question through the [`TextMeasurer`] trait defined here; glyph shaping and
//! rasterization stay with the backend.

use std::sync::Arc;

/// Measures single lines of text.
///
/// Implementations can be heuristic (like [`HeuristicTextMeasurer`]) or backed
/// by a real shaping engine. Measurement must not depend on hidden state: the
/// same text and style always produce the same metrics.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as one line; callers split on `\n` themselves.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Arc<T> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

/// Text styling inputs relevant to measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a sans-serif, normal weight `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Returns a copy of this style with a different family.
    #[must_use]
    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Returns a copy of this style with a different weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Font family selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    #[default]
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Roboto"`, `"Helvetica Neue"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Creates a named family.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    #[default]
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// The advance width.
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }

    /// Returns the whole-pixel `(width, height)` this line occupies.
    ///
    /// Both extents round up so a label never overflows the box it was given.
    #[must_use]
    pub fn pixel_extent(&self) -> (i32, i32) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "text extents are small, non-negative pixel counts"
        )]
        let px = |v: f64| v.max(0.0).ceil() as i32;
        (px(self.advance_width), px(self.ascent + self.descent))
    }
}

/// A heuristic text measurer for layout without a shaping engine.
///
/// It assumes an average glyph width of ~0.6em (~0.66em for bold text) and a
/// baseline at ~0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let glyph = if style.font_weight >= FontWeight::BOLD {
            0.66
        } else {
            0.6
        };
        let advance_width = glyph * style.font_size * text.chars().count() as f64;
        TextMetrics {
            advance_width,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_width_scales_with_chars_and_size() {
        let m = HeuristicTextMeasurer;
        let small = m.measure("1.00", &TextStyle::new(10.0));
        let large = m.measure("1.00", &TextStyle::new(20.0));
        assert!((small.advance_width - 24.0).abs() < 1e-9);
        assert!((large.advance_width - 48.0).abs() < 1e-9);
        assert!((small.line_height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn bold_text_measures_wider() {
        let m = HeuristicTextMeasurer;
        let normal = m.measure("label", &TextStyle::new(10.0));
        let bold = m.measure("label", &TextStyle::new(10.0).with_weight(FontWeight::BOLD));
        assert!(bold.advance_width > normal.advance_width);
    }

    #[test]
    fn pixel_extent_rounds_up() {
        let metrics = TextMetrics {
            advance_width: 10.2,
            ascent: 7.1,
            descent: 2.0,
            leading: 3.0,
        };
        assert_eq!(metrics.pixel_extent(), (11, 10));
    }

    #[test]
    fn css_family_names() {
        assert_eq!(FontFamily::SansSerif.as_css_family(), "sans-serif");
        assert_eq!(FontFamily::named("Roboto").as_css_family(), "Roboto");
    }
}
