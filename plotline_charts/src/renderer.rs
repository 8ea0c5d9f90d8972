// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing sink charts issue primitives to.

use std::io;

use peniko::Color;
use plotline_text::FontFamily;

use crate::{Bounds, ChartError};

/// A drawing backend.
///
/// Charts never produce pixels themselves; they compute coordinates and call
/// these primitives in order. All coordinates are pixels with the origin at
/// the top-left corner and `y` growing downward.
///
/// Style setters change the renderer's current state, which applies to every
/// following primitive until changed again.
pub trait Renderer {
    /// Clears stroke, fill, font and rotation state.
    fn reset_style(&mut self);

    /// Current resolution.
    fn dpi(&self) -> f64;
    /// Sets the resolution.
    fn set_dpi(&mut self, dpi: f64);

    /// Sets the stroke paint.
    fn set_stroke_color(&mut self, color: Color);
    /// Sets the stroke width.
    fn set_stroke_width(&mut self, width: f64);
    /// Sets the stroke dash pattern; empty means solid.
    fn set_stroke_dash_array(&mut self, dashes: &[f64]);
    /// Sets the fill paint.
    fn set_fill_color(&mut self, color: Color);

    /// Starts a new subpath.
    fn move_to(&mut self, x: i32, y: i32);
    /// Adds a line to the current path.
    fn line_to(&mut self, x: i32, y: i32);
    /// Adds an elliptical arc around `(cx, cy)`.
    ///
    /// Angles are radians, measured clockwise from the positive x axis. The
    /// path is connected to the arc's start point with a line, or starts
    /// there when empty.
    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, sweep_angle: f64);
    /// Closes the current subpath.
    fn close(&mut self);

    /// Strokes and clears the current path.
    fn stroke(&mut self);
    /// Fills and clears the current path.
    fn fill(&mut self);
    /// Fills, strokes and clears the current path.
    fn fill_stroke(&mut self);

    /// Adds a full circle to the current path.
    fn circle(&mut self, radius: f64, x: i32, y: i32);

    /// Sets the font family.
    fn set_font(&mut self, font: &FontFamily);
    /// Sets the font size in points.
    fn set_font_size(&mut self, size: f64);
    /// Sets the text paint.
    fn set_font_color(&mut self, color: Color);
    /// Rotates following text by `radians` around its anchor.
    fn set_text_rotation(&mut self, radians: f64);
    /// Removes text rotation.
    fn clear_text_rotation(&mut self);

    /// Draws text with its baseline-left corner at `(x, y)`.
    fn text(&mut self, body: &str, x: i32, y: i32);
    /// Measures `body` in the current font, ignoring rotation.
    ///
    /// The result is anchored at the origin: `right` is the width and
    /// `bottom` is the height.
    fn measure_text(&mut self, body: &str) -> Bounds;

    /// Writes the finished drawing.
    fn save(&mut self, w: &mut dyn io::Write) -> Result<(), ChartError>;
}

/// Creates renderers sized for a chart.
///
/// Any `Fn(i32, i32) -> Result<R, ChartError>` is a provider.
pub trait RendererProvider {
    /// The renderer type produced.
    type Renderer: Renderer;

    /// Creates a renderer for a `width` by `height` drawing.
    fn create(&self, width: i32, height: i32) -> Result<Self::Renderer, ChartError>;
}

impl<F, R> RendererProvider for F
where
    F: Fn(i32, i32) -> Result<R, ChartError>,
    R: Renderer,
{
    type Renderer = R;

    fn create(&self, width: i32, height: i32) -> Result<R, ChartError> {
        self(width, height)
    }
}
