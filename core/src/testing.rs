//! Test doubles for the windowing collaborator

use std::collections::VecDeque;
use std::convert::Infallible;

use crate::color::Rgb;
use crate::image::PixelBuffer;
use crate::surface::{EventSource, PickerEvent, Point, Rect, Surface};

/// Glyph advance of the fake monospace font
pub const CHAR_WIDTH: i32 = 8;
pub const LINE_HEIGHT: i32 = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear(Rgb),
    Blit {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    FillRect(Rect, Rgb),
    FillPolygon(Vec<Point>, Rgb),
    Line {
        from: Point,
        to: Point,
        width: u32,
        color: Rgb,
    },
    Text {
        text: String,
        x: i32,
        baseline: i32,
        color: Rgb,
    },
}

/// Surface that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    pub presents: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polygons(&self, color: Rgb) -> Vec<Vec<Point>> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillPolygon(pts, c) if *c == color => Some(pts.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self, color: Rgb) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect(r, c) if *c == color => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn blits(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Blit { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    type Error = Infallible;

    fn clear(&mut self, color: Rgb) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn blit(&mut self, image: &PixelBuffer, x: i32, y: i32) {
        self.ops.push(DrawOp::Blit {
            x,
            y,
            width: image.width(),
            height: image.height(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::FillRect(rect, color));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        self.ops.push(DrawOp::FillPolygon(points.to_vec(), color));
    }

    fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, color: Rgb) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            baseline,
            color,
        });
    }

    fn text_width(&mut self, text: &str) -> i32 {
        text.chars().count() as i32 * CHAR_WIDTH
    }

    fn text_height(&mut self) -> i32 {
        LINE_HEIGHT
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.presents += 1;
        Ok(())
    }
}

/// Event source replaying a fixed script, then closing the window
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    events: VecDeque<PickerEvent>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = PickerEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    type Error = Infallible;

    fn next_event(&mut self) -> Result<PickerEvent, Infallible> {
        Ok(self.events.pop_front().unwrap_or(PickerEvent::Close))
    }
}

/// Recording surface and scripted events in one window
#[derive(Debug, Default)]
pub struct ScriptedWindow {
    pub surface: RecordingSurface,
    pub events: ScriptedEvents,
}

impl ScriptedWindow {
    pub fn new(events: impl IntoIterator<Item = PickerEvent>) -> Self {
        Self {
            surface: RecordingSurface::new(),
            events: ScriptedEvents::new(events),
        }
    }
}

impl Surface for ScriptedWindow {
    type Error = Infallible;

    fn clear(&mut self, color: Rgb) {
        self.surface.clear(color);
    }

    fn blit(&mut self, image: &PixelBuffer, x: i32, y: i32) {
        self.surface.blit(image, x, y);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.surface.fill_rect(rect, color);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        self.surface.fill_polygon(points, color);
    }

    fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb) {
        self.surface.draw_line(from, to, width, color);
    }

    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, color: Rgb) {
        self.surface.draw_text(text, x, baseline, color);
    }

    fn text_width(&mut self, text: &str) -> i32 {
        self.surface.text_width(text)
    }

    fn text_height(&mut self) -> i32 {
        self.surface.text_height()
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.surface.present()
    }
}

impl EventSource for ScriptedWindow {
    type Error = Infallible;

    fn next_event(&mut self) -> Result<PickerEvent, Infallible> {
        self.events.next_event()
    }
}
