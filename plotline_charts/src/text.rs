// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text placement on top of [`Renderer`] primitives.

use crate::style::{TextHorizontalAlign, TextVerticalAlign, TextWrap};
use crate::{Bounds, Renderer, Style};

/// Gap between wrapped lines when a style does not set one.
pub const DEFAULT_LINE_SPACING: i32 = 4;

/// Measures `body` in `style`, accounting for text rotation.
pub fn measure_text(r: &mut dyn Renderer, body: &str, style: &Style) -> Bounds {
    style.write_text_to_renderer(r);
    let b = r.measure_text(body);
    let degrees = style.text_rotation();
    if degrees == 0.0 {
        b
    } else {
        b.corners().rotate(degrees).bounds()
    }
}

/// Draws `body` at `(x, y)` in `style`.
pub fn draw_text(r: &mut dyn Renderer, body: &str, x: i32, y: i32, style: &Style) {
    style.write_text_to_renderer(r);
    r.text(body, x, y);
    r.clear_text_rotation();
}

/// Splits `value` into lines no wider than `width` according to the style's
/// wrap mode.
pub fn wrap_fit(r: &mut dyn Renderer, value: &str, width: i32, style: &Style) -> Vec<String> {
    style.write_text_to_renderer(r);
    match style.text_wrap.unwrap_or_default() {
        TextWrap::None => vec![value.to_owned()],
        TextWrap::Word => wrap_words(r, value, width),
        TextWrap::Rune => wrap_runes(r, value, width),
    }
}

fn wrap_words(r: &mut dyn Renderer, value: &str, width: i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in value.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if r.measure_text(&candidate).width() > width {
            lines.push(core::mem::take(&mut line));
            line.push_str(word);
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn wrap_runes(r: &mut dyn Renderer, value: &str, width: i32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for c in value.chars() {
        line.push(c);
        if line.chars().count() > 1 && r.measure_text(&line).width() > width {
            line.pop();
            lines.push(core::mem::take(&mut line));
            line.push(c);
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Size of a block of lines drawn in `style`.
pub fn measure_lines(r: &mut dyn Renderer, lines: &[String], style: &Style) -> Bounds {
    style.write_text_to_renderer(r);
    let spacing = style.text_line_spacing.unwrap_or(DEFAULT_LINE_SPACING);
    let mut width = 0;
    let mut height = 0;
    for (i, line) in lines.iter().enumerate() {
        let b = r.measure_text(line);
        width = width.max(b.width());
        height += b.height();
        if i > 0 {
            height += spacing;
        }
    }
    Bounds::from_size(width, height)
}

/// Draws `value` inside `bounds`, wrapped and aligned per `style`.
pub fn draw_within(r: &mut dyn Renderer, value: &str, bounds: Bounds, style: &Style) {
    let lines = wrap_fit(r, value, bounds.width(), style);
    let block = measure_lines(r, &lines, style);
    let spacing = style.text_line_spacing.unwrap_or(DEFAULT_LINE_SPACING);
    let mut y = match style.text_vertical_align.unwrap_or_default() {
        TextVerticalAlign::Baseline | TextVerticalAlign::Top => bounds.top,
        TextVerticalAlign::Middle => bounds.top + ((bounds.height() - block.height()) >> 1),
        TextVerticalAlign::Bottom => bounds.bottom - block.height(),
    };
    style.write_text_to_renderer(r);
    let rotated = style.text_rotation() != 0.0;
    for line in &lines {
        let lb = r.measure_text(line);
        let x = match style.text_horizontal_align.unwrap_or_default() {
            TextHorizontalAlign::Left => bounds.left,
            TextHorizontalAlign::Center => bounds.left + ((bounds.width() - lb.width()) >> 1),
            TextHorizontalAlign::Right => bounds.right - lb.width(),
        };
        let baseline = if rotated { y } else { y + lb.height() };
        r.text(line, x, baseline);
        y += lb.height() + spacing;
    }
    r.clear_text_rotation();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, RecordingRenderer};

    fn word_style() -> Style {
        Style::default()
            .with_font_size(10.0)
            .with_text_layout(
                TextHorizontalAlign::Center,
                TextVerticalAlign::Top,
                TextWrap::Word,
            )
    }

    #[test]
    fn word_wrap_breaks_between_words() {
        let mut r = RecordingRenderer::new(100, 100);
        // Each glyph is 6px wide at 10pt.
        let lines = wrap_fit(&mut r, "alpha beta gamma", 60, &word_style());
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn rune_wrap_breaks_anywhere() {
        let mut r = RecordingRenderer::new(100, 100);
        let mut style = word_style();
        style.text_wrap = Some(TextWrap::Rune);
        let lines = wrap_fit(&mut r, "abcdefgh", 30, &style);
        assert_eq!(lines, vec!["abcde", "fgh"]);
    }

    #[test]
    fn measure_lines_adds_spacing() {
        let mut r = RecordingRenderer::new(100, 100);
        let lines = vec!["ab".to_owned(), "abcd".to_owned()];
        let b = measure_lines(&mut r, &lines, &word_style());
        assert_eq!(b, Bounds::from_size(24, 24));
    }

    #[test]
    fn draw_within_centers_each_line() {
        let mut r = RecordingRenderer::new(100, 100);
        draw_within(&mut r, "ab", Bounds::new(0, 0, 100, 50), &word_style());
        assert_eq!(
            r.ops.last().cloned().map(|op| match op {
                Op::Text { x, y, .. } => (x, y),
                _ => (-1, -1),
            }),
            Some((44, 10))
        );
    }

    #[test]
    fn rotated_measurement_swaps_extents() {
        let mut r = RecordingRenderer::new(100, 100);
        let style = Style::default().with_font_size(10.0).with_text_rotation(90.0);
        let b = measure_text(&mut r, "abcdef", &style);
        assert!((b.height() - 36).abs() <= 1, "{b}");
        assert!((b.width() - 10).abs() <= 1, "{b}");
    }
}
