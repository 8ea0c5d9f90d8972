// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing styles and the default color palette.

use peniko::Color;
use peniko::color::palette::css;
use plotline_text::FontFamily;
use smallvec::SmallVec;

use crate::Bounds;
use crate::math::degrees_to_radians;
use crate::renderer::Renderer;

/// Stroke dash lengths, alternating on/off.
pub type DashArray = SmallVec<[f64; 4]>;

/// Horizontal text alignment inside a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextHorizontalAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Vertical text alignment inside a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextVerticalAlign {
    /// Baseline on the top edge plus the text height.
    #[default]
    Baseline,
    /// Bottom edge.
    Bottom,
    /// Vertically centered.
    Middle,
    /// Top edge.
    Top,
}

/// Line breaking for text drawn inside a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextWrap {
    /// Never wrap.
    #[default]
    None,
    /// Break between words.
    Word,
    /// Break between characters.
    Rune,
}

/// A set of optional drawing attributes.
///
/// Unset attributes fall back to whatever [`Style::inherit_from`] supplies.
/// Writing a style to a renderer always writes every attribute it covers,
/// so nothing leaks from one draw call into the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Suppresses drawing of whatever this style is attached to.
    pub hidden: bool,
    /// Inner padding.
    pub padding: Option<Bounds>,
    /// Stroke paint.
    pub stroke_color: Option<Color>,
    /// Stroke width in pixels.
    pub stroke_width: Option<f64>,
    /// Stroke dash pattern.
    pub stroke_dash_array: Option<DashArray>,
    /// Fill paint.
    pub fill_color: Option<Color>,
    /// Dot fill for series points.
    pub dot_color: Option<Color>,
    /// Dot radius for series points.
    pub dot_width: Option<f64>,
    /// Font family.
    pub font: Option<FontFamily>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Text paint.
    pub font_color: Option<Color>,
    /// Text rotation in degrees.
    pub text_rotation_degrees: Option<f64>,
    /// Horizontal alignment of text in a box.
    pub text_horizontal_align: Option<TextHorizontalAlign>,
    /// Vertical alignment of text in a box.
    pub text_vertical_align: Option<TextVerticalAlign>,
    /// Wrapping of text in a box.
    pub text_wrap: Option<TextWrap>,
    /// Extra pixels between wrapped lines.
    pub text_line_spacing: Option<i32>,
}

impl Style {
    /// A style that hides its target.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }

    /// Returns a copy with a stroke color.
    #[must_use]
    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = Some(color);
        self
    }

    /// Returns a copy with a stroke width.
    #[must_use]
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Returns a copy with a dash pattern.
    #[must_use]
    pub fn with_stroke_dash_array(mut self, dashes: &[f64]) -> Self {
        self.stroke_dash_array = Some(DashArray::from_slice(dashes));
        self
    }

    /// Returns a copy with a fill color.
    #[must_use]
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    /// Returns a copy that draws dots of `width` radius in `color`.
    #[must_use]
    pub fn with_dots(mut self, color: Color, width: f64) -> Self {
        self.dot_color = Some(color);
        self.dot_width = Some(width);
        self
    }

    /// Returns a copy with a font family.
    #[must_use]
    pub fn with_font(mut self, font: FontFamily) -> Self {
        self.font = Some(font);
        self
    }

    /// Returns a copy with a font size.
    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Returns a copy with a font color.
    #[must_use]
    pub fn with_font_color(mut self, color: Color) -> Self {
        self.font_color = Some(color);
        self
    }

    /// Returns a copy with text rotated by `degrees`.
    #[must_use]
    pub fn with_text_rotation(mut self, degrees: f64) -> Self {
        self.text_rotation_degrees = Some(degrees);
        self
    }

    /// Returns a copy with padding.
    #[must_use]
    pub fn with_padding(mut self, padding: Bounds) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Returns a copy with box alignment and wrapping for text.
    #[must_use]
    pub fn with_text_layout(
        mut self,
        horizontal: TextHorizontalAlign,
        vertical: TextVerticalAlign,
        wrap: TextWrap,
    ) -> Self {
        self.text_horizontal_align = Some(horizontal);
        self.text_vertical_align = Some(vertical);
        self.text_wrap = Some(wrap);
        self
    }

    /// Fills every unset attribute from `defaults`.
    ///
    /// `hidden` is never inherited.
    #[must_use]
    pub fn inherit_from(&self, defaults: &Self) -> Self {
        Self {
            hidden: self.hidden,
            padding: self.padding.or(defaults.padding),
            stroke_color: self.stroke_color.or(defaults.stroke_color),
            stroke_width: self.stroke_width.or(defaults.stroke_width),
            stroke_dash_array: self
                .stroke_dash_array
                .clone()
                .or_else(|| defaults.stroke_dash_array.clone()),
            fill_color: self.fill_color.or(defaults.fill_color),
            dot_color: self.dot_color.or(defaults.dot_color),
            dot_width: self.dot_width.or(defaults.dot_width),
            font: self.font.clone().or_else(|| defaults.font.clone()),
            font_size: self.font_size.or(defaults.font_size),
            font_color: self.font_color.or(defaults.font_color),
            text_rotation_degrees: self.text_rotation_degrees.or(defaults.text_rotation_degrees),
            text_horizontal_align: self.text_horizontal_align.or(defaults.text_horizontal_align),
            text_vertical_align: self.text_vertical_align.or(defaults.text_vertical_align),
            text_wrap: self.text_wrap.or(defaults.text_wrap),
            text_line_spacing: self.text_line_spacing.or(defaults.text_line_spacing),
        }
    }

    /// Stroke width, or `fallback` when unset.
    #[must_use]
    pub fn stroke_width_or(&self, fallback: f64) -> f64 {
        self.stroke_width.unwrap_or(fallback)
    }

    /// Font size, or `fallback` when unset.
    #[must_use]
    pub fn font_size_or(&self, fallback: f64) -> f64 {
        self.font_size.unwrap_or(fallback)
    }

    /// Padding, or `fallback` when unset.
    #[must_use]
    pub fn padding_or(&self, fallback: Bounds) -> Bounds {
        self.padding.unwrap_or(fallback)
    }

    /// Text rotation in degrees; zero when unset.
    #[must_use]
    pub fn text_rotation(&self) -> f64 {
        self.text_rotation_degrees.unwrap_or(0.0)
    }

    /// Whether a stroke would be visible.
    #[must_use]
    pub fn should_draw_stroke(&self) -> bool {
        is_visible(self.stroke_color) && self.stroke_width.is_some_and(|w| w > 0.0)
    }

    /// Whether a fill would be visible.
    #[must_use]
    pub fn should_draw_fill(&self) -> bool {
        is_visible(self.fill_color)
    }

    /// Whether series dots would be visible.
    #[must_use]
    pub fn should_draw_dot(&self) -> bool {
        is_visible(self.dot_color) && self.dot_width.is_some_and(|w| w > 0.0)
    }

    /// Writes stroke attributes and clears the fill.
    pub fn write_stroke_to_renderer(&self, r: &mut dyn Renderer) {
        r.set_stroke_color(self.stroke_color.unwrap_or(Color::TRANSPARENT));
        r.set_stroke_width(self.stroke_width.unwrap_or(0.0));
        r.set_stroke_dash_array(self.stroke_dash_array.as_deref().unwrap_or(&[]));
        r.set_fill_color(Color::TRANSPARENT);
    }

    /// Writes stroke and fill attributes.
    pub fn write_drawing_to_renderer(&self, r: &mut dyn Renderer) {
        self.write_stroke_to_renderer(r);
        r.set_fill_color(self.fill_color.unwrap_or(Color::TRANSPARENT));
    }

    /// Writes font and rotation attributes.
    pub fn write_text_to_renderer(&self, r: &mut dyn Renderer) {
        r.set_font(&self.font.clone().unwrap_or_default());
        r.set_font_size(self.font_size.unwrap_or(0.0));
        r.set_font_color(self.font_color.unwrap_or(Color::TRANSPARENT));
        match self.text_rotation_degrees {
            Some(deg) if deg != 0.0 => r.set_text_rotation(degrees_to_radians(deg)),
            _ => r.clear_text_rotation(),
        }
    }

    /// Writes every attribute.
    pub fn write_to_renderer(&self, r: &mut dyn Renderer) {
        self.write_drawing_to_renderer(r);
        self.write_text_to_renderer(r);
    }
}

fn is_visible(color: Option<Color>) -> bool {
    color.is_some_and(|c| c.components[3] > 0.0)
}

/// Colors used for chart chrome and series.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Chart background fill.
    pub background: Color,
    /// Chart background stroke.
    pub background_stroke: Color,
    /// Canvas fill.
    pub canvas: Color,
    /// Canvas stroke.
    pub canvas_stroke: Color,
    /// Axis lines and ticks.
    pub axis_stroke: Color,
    /// Labels and titles.
    pub text: Color,
    /// Series colors, cycled by series index.
    pub series: Vec<Color>,
}

impl Palette {
    /// Color for the series at `index`, cycling through the series colors.
    #[must_use]
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return self.axis_stroke;
        }
        self.series[index % self.series.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: css::WHITE,
            background_stroke: css::WHITE,
            canvas: css::WHITE,
            canvas_stroke: css::WHITE,
            axis_stroke: Color::from_rgb8(51, 51, 51),
            text: Color::from_rgb8(51, 51, 51),
            series: vec![
                css::CORNFLOWER_BLUE,
                css::ORANGE,
                css::MEDIUM_SEA_GREEN,
                css::CRIMSON,
                css::GOLDENROD,
                css::SLATE_BLUE,
                css::DARK_CYAN,
                css::HOT_PINK,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_fills_only_unset_attributes() {
        let own = Style::default()
            .with_stroke_width(3.0)
            .with_stroke_dash_array(&[5.0, 5.0]);
        let defaults = Style::default()
            .with_stroke_width(1.0)
            .with_stroke_color(css::RED)
            .with_font_size(10.0);
        let merged = own.inherit_from(&defaults);
        assert_eq!(merged.stroke_width, Some(3.0));
        assert_eq!(merged.stroke_color, Some(css::RED));
        assert_eq!(merged.font_size, Some(10.0));
        assert_eq!(merged.stroke_dash_array.as_deref(), Some(&[5.0, 5.0][..]));
    }

    #[test]
    fn hidden_is_not_inherited() {
        let merged = Style::default().inherit_from(&Style::hidden());
        assert!(!merged.hidden);
    }

    #[test]
    fn visibility_checks() {
        assert!(!Style::default().should_draw_stroke());
        assert!(
            Style::default()
                .with_stroke_color(css::BLACK)
                .with_stroke_width(1.0)
                .should_draw_stroke()
        );
        assert!(
            !Style::default()
                .with_fill_color(Color::TRANSPARENT)
                .should_draw_fill()
        );
        assert!(Style::default().with_dots(css::BLUE, 2.0).should_draw_dot());
    }

    #[test]
    fn palette_cycles() {
        let p = Palette::default();
        assert_eq!(p.series_color(0), p.series_color(p.series.len()));
    }
}
