//! Cursor glyphs for the three picker controls
//!
//! Drawing goes straight to the window surface, so each renderer remembers
//! what it drew last and paints over it in the background color before
//! drawing at the new position.

use crate::color::Rgb;
use crate::image::PixelBuffer;
use crate::layout::{OpacitySlider, Region};
use crate::surface::{Point, Rect, Surface};

/// Caption drawn left of the opacity track
pub const OPACITY_CAPTION: &str = "OPACITY";

// ─────────────────────────────────────────────────────────────────────────────
// Spectrum crosshair
// ─────────────────────────────────────────────────────────────────────────────

/// Gapped crosshair over the hue/saturation spectrum.
///
/// The crosshair always lies inside the spectrum image, so moving it is a
/// matter of re-blitting the image and drawing the new glyph.
pub struct SpectrumCursor {
    region: Region,
    image: PixelBuffer,
    color: Rgb,
}

impl SpectrumCursor {
    pub fn new(region: Region, image: PixelBuffer, color: Rgb) -> Self {
        Self {
            region,
            image,
            color,
        }
    }

    /// The four arms of the crosshair centered at (x, y), each shortened to
    /// stay inside the spectrum. Arms that would vanish are dropped.
    pub fn segments(&self, x: i32, y: i32) -> Vec<(Point, Point)> {
        let r = &self.region;
        let cs = r.cursor_size;
        let mut arms = Vec::with_capacity(4);

        // up, down, left, right as (near, far) offsets from the center
        let vertical = [(y - cs, y - 2 * cs), (y + cs, y + 2 * cs)];
        let horizontal = [(x - cs, x - 2 * cs), (x + cs, x + 2 * cs)];

        for (near, far) in vertical {
            if let Some((a, b)) = clip_span(near, far, r.top(), r.bottom()) {
                arms.push((Point::new(x, a), Point::new(x, b)));
            }
        }
        for (near, far) in horizontal {
            if let Some((a, b)) = clip_span(near, far, r.left(), r.right()) {
                arms.push((Point::new(a, y), Point::new(b, y)));
            }
        }
        arms
    }

    /// Repaint the spectrum and draw the crosshair at (x, y)
    pub fn move_to<S: Surface>(&mut self, surface: &mut S, x: i32, y: i32) {
        surface.blit(&self.image, self.region.margin_x, self.region.margin_y);
        for (from, to) in self.segments(x, y) {
            surface.draw_line(from, to, 1, self.color);
        }
    }
}

/// Clamp both ends of a span into `[lo, hi]`, keeping orientation.
/// Returns `None` when nothing of positive length is left.
fn clip_span(near: i32, far: i32, lo: i32, hi: i32) -> Option<(i32, i32)> {
    let (a, b) = (near.clamp(lo, hi), far.clamp(lo, hi));
    (a != b).then_some((a, b))
}

// ─────────────────────────────────────────────────────────────────────────────
// Value slider triangles
// ─────────────────────────────────────────────────────────────────────────────

type Triangle = [Point; 3];

/// Two inward-pointing triangles flanking the value slider
pub struct ValueCursor {
    region: Region,
    color: Rgb,
    background: Rgb,
    last: Option<[Triangle; 2]>,
}

impl ValueCursor {
    pub fn new(region: Region, color: Rgb, background: Rgb) -> Self {
        Self {
            region,
            color,
            background,
            last: None,
        }
    }

    /// Left and right triangles for a cursor at row `y`; apexes touch the slider edges
    pub fn triangles(&self, y: i32) -> [Triangle; 2] {
        let r = &self.region;
        let cs = r.cursor_size;
        let left_edge = r.margin_x;
        let right_edge = r.margin_x + r.width;
        [
            [
                Point::new(left_edge - cs, y - cs),
                Point::new(left_edge, y),
                Point::new(left_edge - cs, y + cs),
            ],
            [
                Point::new(right_edge + cs, y - cs),
                Point::new(right_edge, y),
                Point::new(right_edge + cs, y + cs),
            ],
        ]
    }

    /// Forget the previous glyph (the surface was cleared underneath it)
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn move_to<S: Surface>(&mut self, surface: &mut S, y: i32) {
        if let Some(prev) = self.last.take() {
            for tri in &prev {
                surface.fill_polygon(tri, self.background);
            }
        }
        let next = self.triangles(y);
        for tri in &next {
            surface.fill_polygon(tri, self.color);
        }
        self.last = Some(next);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Opacity slider
// ─────────────────────────────────────────────────────────────────────────────

/// Diamond marker on the opacity track plus the percentage label
pub struct OpacityCursor {
    slider: OpacitySlider,
    color: Rgb,
    background: Rgb,
    last_diamond: Option<[Point; 4]>,
    /// Area covered by the previous percentage label
    last_label: Option<Rect>,
}

impl OpacityCursor {
    pub fn new(slider: OpacitySlider, color: Rgb, background: Rgb) -> Self {
        Self {
            slider,
            color,
            background,
            last_diamond: None,
            last_label: None,
        }
    }

    pub fn diamond(&self, x: i32) -> [Point; 4] {
        let cs = self.slider.region.cursor_size;
        let y = self.slider.track_y();
        [
            Point::new(x - cs, y),
            Point::new(x, y - cs),
            Point::new(x + cs, y),
            Point::new(x, y + cs),
        ]
    }

    /// Percentage text for a track position, e.g. `" 42%"`
    pub fn label(&self, x: i32) -> String {
        format!("{:>3}%", self.slider.percent(x))
    }

    fn label_x(&self) -> i32 {
        self.slider.track_end() + 2 * self.slider.region.cursor_size
    }

    fn baseline<S: Surface>(&self, surface: &mut S) -> i32 {
        self.slider.track_y() + surface.text_height() / 2 - 1
    }

    pub fn reset(&mut self) {
        self.last_diamond = None;
        self.last_label = None;
    }

    /// Draw the "OPACITY" caption; done once per full repaint
    pub fn draw_caption<S: Surface>(&self, surface: &mut S) {
        let baseline = self.baseline(surface);
        surface.draw_text(OPACITY_CAPTION, self.slider.region.margin_x, baseline, self.color);
    }

    /// Move the marker to `x`, redrawing the track and label
    pub fn move_to<S: Surface>(&mut self, surface: &mut S, x: i32) {
        let start = Point::new(self.slider.track_start(), self.slider.track_y());
        let end = Point::new(self.slider.track_end(), self.slider.track_y());
        let baseline = self.baseline(surface);

        if let Some(prev) = self.last_diamond.take() {
            surface.fill_polygon(&prev, self.background);
            surface.draw_line(start, end, 2, self.background);
        }
        if let Some(rect) = self.last_label.take() {
            surface.fill_rect(rect, self.background);
        }

        surface.draw_line(start, end, 1, self.color);

        let diamond = self.diamond(x);
        surface.fill_polygon(&diamond, self.color);
        surface.draw_line(start, Point::new(x, start.y), 2, self.color);

        let text = self.label(x);
        let text_height = surface.text_height();
        let rect = Rect::new(
            self.label_x(),
            baseline - text_height,
            surface.text_width(&text),
            text_height * 2,
        );
        surface.draw_text(&text, rect.x, baseline, self.color);

        self.last_diamond = Some(diamond);
        self.last_label = Some(rect);
    }
}
