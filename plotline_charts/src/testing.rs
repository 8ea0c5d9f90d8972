// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A renderer that records primitives, for tests.

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use peniko::Color;
use plotline_text::{FontFamily, HeuristicTextMeasurer, TextMeasurer, TextStyle};

use crate::{Bounds, ChartError, Renderer};

/// One recorded primitive.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    MoveTo(i32, i32),
    LineTo(i32, i32),
    ArcTo {
        cx: i32,
        cy: i32,
        rx: f64,
        start: f64,
        sweep: f64,
    },
    Circle(f64, i32, i32),
    Close,
    Stroke,
    Fill,
    FillStroke,
    Text {
        body: String,
        x: i32,
        y: i32,
        rotation: Option<f64>,
        color: Color,
    },
}

#[derive(Debug)]
pub(crate) struct RecordingRenderer {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) ops: Vec<Op>,
    pub(crate) dpi: f64,
    pub(crate) font_size: f64,
    pub(crate) font_color: Color,
    pub(crate) stroke_color: Color,
    pub(crate) fill_color: Color,
    pub(crate) rotation: Option<f64>,
    saves: Rc<Cell<usize>>,
}

impl RecordingRenderer {
    pub(crate) fn new(width: i32, height: i32) -> Self {
        Self::with_counter(width, height, Rc::default())
    }

    pub(crate) fn with_counter(width: i32, height: i32, saves: Rc<Cell<usize>>) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            dpi: 0.0,
            font_size: 10.0,
            font_color: Color::TRANSPARENT,
            stroke_color: Color::TRANSPARENT,
            fill_color: Color::TRANSPARENT,
            rotation: None,
            saves,
        }
    }

    pub(crate) fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { body, .. } => Some(body.as_str()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count(&self, wanted: &Op) -> usize {
        self.ops.iter().filter(|op| *op == wanted).count()
    }
}

/// A provider that shares a save counter with the test.
pub(crate) fn counting_provider(
    saves: Rc<Cell<usize>>,
) -> impl Fn(i32, i32) -> Result<RecordingRenderer, ChartError> {
    move |w, h| Ok(RecordingRenderer::with_counter(w, h, saves.clone()))
}

impl Renderer for RecordingRenderer {
    fn reset_style(&mut self) {
        self.stroke_color = Color::TRANSPARENT;
        self.fill_color = Color::TRANSPARENT;
        self.font_color = Color::TRANSPARENT;
        self.rotation = None;
    }

    fn dpi(&self) -> f64 {
        self.dpi
    }

    fn set_dpi(&mut self, dpi: f64) {
        self.dpi = dpi;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_stroke_width(&mut self, _width: f64) {}

    fn set_stroke_dash_array(&mut self, _dashes: &[f64]) {}

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.ops.push(Op::MoveTo(x, y));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.ops.push(Op::LineTo(x, y));
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, _ry: f64, start: f64, sweep: f64) {
        self.ops.push(Op::ArcTo {
            cx,
            cy,
            rx,
            start,
            sweep,
        });
    }

    fn close(&mut self) {
        self.ops.push(Op::Close);
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }

    fn fill_stroke(&mut self) {
        self.ops.push(Op::FillStroke);
    }

    fn circle(&mut self, radius: f64, x: i32, y: i32) {
        self.ops.push(Op::Circle(radius, x, y));
    }

    fn set_font(&mut self, _font: &FontFamily) {}

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn set_font_color(&mut self, color: Color) {
        self.font_color = color;
    }

    fn set_text_rotation(&mut self, radians: f64) {
        self.rotation = Some(radians);
    }

    fn clear_text_rotation(&mut self) {
        self.rotation = None;
    }

    fn text(&mut self, body: &str, x: i32, y: i32) {
        self.ops.push(Op::Text {
            body: body.to_owned(),
            x,
            y,
            rotation: self.rotation,
            color: self.font_color,
        });
    }

    fn measure_text(&mut self, body: &str) -> Bounds {
        let metrics = HeuristicTextMeasurer.measure(body, &TextStyle::new(self.font_size));
        let (w, h) = metrics.pixel_extent();
        Bounds::from_size(w, h)
    }

    fn save(&mut self, _w: &mut dyn io::Write) -> Result<(), ChartError> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Integers from `from` to `to` inclusive, in either direction.
pub(crate) fn linear_range(from: i32, to: i32) -> Vec<f64> {
    if from <= to {
        (from..=to).map(f64::from).collect()
    } else {
        (to..=from).rev().map(f64::from).collect()
    }
}
