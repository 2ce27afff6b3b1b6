//! Software renderer using tiny-skia and cosmic-text
//!
//! The picker paints into a window-sized RGBA canvas that persists between
//! events; `present` copies it to the window. Shapes are drawn without
//! anti-aliasing so glyphs can be erased exactly by redrawing them in the
//! background color.
use std::collections::HashMap;

use cosmic_text::{
    Attrs, Buffer, Color as CosmicColor, Family, FontSystem, LayoutGlyph, Metrics, Shaping,
    SwashCache,
};
use screen_overlay_core::{PixelBuffer, Point, Rect as CoreRect, Rgb};
use tiny_skia::{Color, FillRule, LineCap, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::platform::PlatformError;

/// Label font size in pixels
const FONT_SIZE: f32 = 11.0;
/// Ascent + descent of the label font
const LINE_HEIGHT: f32 = 13.0;

/// Cached result of text shaping
struct CachedText {
    glyphs: Vec<LayoutGlyph>,
    width: f32,
}

/// Fixed-width label text: shaping, measuring, rasterizing
pub struct TextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// Labels are a caption plus 101 percentages, so the cache stays small
    text_cache: HashMap<String, CachedText>,
}

impl TextRenderer {
    /// Load system fonts; fails if there is no monospace face
    pub fn new() -> Result<Self, PlatformError> {
        let font_system = FontSystem::new();
        if !font_system.db().faces().any(|face| face.monospaced) {
            return Err(PlatformError::FontUnavailable(
                "no monospace font installed".into(),
            ));
        }
        Ok(Self {
            font_system,
            swash_cache: SwashCache::new(),
            text_cache: HashMap::with_capacity(128),
        })
    }

    /// Shape `text` if not cached yet
    fn ensure_cached(&mut self, text: &str) -> &CachedText {
        if !self.text_cache.contains_key(text) {
            let metrics = Metrics::new(FONT_SIZE, LINE_HEIGHT);
            let mut text_buffer = Buffer::new(&mut self.font_system, metrics);

            let attrs = Attrs::new().family(Family::Monospace);
            text_buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
            text_buffer.shape_until_scroll(&mut self.font_system, false);

            let mut glyphs = Vec::new();
            let mut width = 0.0f32;
            for run in text_buffer.layout_runs() {
                width = width.max(run.line_w);
                glyphs.extend(run.glyphs.iter().cloned());
            }
            self.text_cache
                .insert(text.to_string(), CachedText { glyphs, width });
        }
        &self.text_cache[text]
    }

    /// Rendered width in whole pixels
    pub fn measure(&mut self, text: &str) -> i32 {
        self.ensure_cached(text).width.ceil() as i32
    }

    pub fn line_height(&self) -> i32 {
        LINE_HEIGHT as i32
    }

    /// Rasterize `text` with its baseline at `baseline`
    fn draw(&mut self, pixmap: &mut Pixmap, text: &str, x: i32, baseline: i32, color: Rgb) {
        let glyphs = self.ensure_cached(text).glyphs.clone();
        let text_color = CosmicColor::rgba(color.r, color.g, color.b, 255);

        for glyph in &glyphs {
            let physical_glyph = glyph.physical((x as f32, baseline as f32), 1.0);

            if let Some(image) = self
                .swash_cache
                .get_image(&mut self.font_system, physical_glyph.cache_key)
            {
                let glyph_x = physical_glyph.x + image.placement.left;
                let glyph_y = physical_glyph.y - image.placement.top;

                draw_glyph_to_pixmap(
                    pixmap,
                    &image.data,
                    image.placement.width,
                    image.placement.height,
                    glyph_x,
                    glyph_y,
                    text_color,
                );
            }
        }
    }
}

/// Persistent RGBA drawing target for the picker window
pub struct Canvas {
    pixmap: Pixmap,
    text: TextRenderer,
}

impl Canvas {
    pub fn new(width: u32, height: u32, text: TextRenderer) -> Result<Self, PlatformError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            PlatformError::BufferError(format!("cannot allocate {width}x{height} canvas"))
        })?;
        Ok(Self { pixmap, text })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// RGBA bytes; every pixel is opaque
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixmap.fill(to_color(color));
    }

    pub fn blit(&mut self, image: &PixelBuffer, x: i32, y: i32) {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        blit_rgba(
            self.pixmap.data_mut(),
            w,
            h,
            image.as_rgba(),
            image.width(),
            x,
            y,
        );
    }

    pub fn fill_rect(&mut self, rect: CoreRect, color: Rgb) {
        let Some(rect) = Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &solid(color), Transform::identity(), None);
    }

    pub fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(center(first.x), center(first.y));
        for p in rest {
            pb.line_to(center(p.x), center(p.y));
        }
        pb.close();
        let Some(path) = pb.finish() else { return };

        let paint = solid(color);
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        // Cover the outline too, the way server-side polygon fills do
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    pub fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb) {
        let mut pb = PathBuilder::new();
        pb.move_to(center(from.x), center(from.y));
        pb.line_to(center(to.x), center(to.y));
        let Some(path) = pb.finish() else { return };

        let stroke = Stroke {
            width: width.max(1) as f32,
            line_cap: LineCap::Square,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
    }

    pub fn draw_text(&mut self, text: &str, x: i32, baseline: i32, color: Rgb) {
        self.text.draw(&mut self.pixmap, text, x, baseline, color);
    }

    pub fn text_width(&mut self, text: &str) -> i32 {
        self.text.measure(text)
    }

    pub fn text_height(&self) -> i32 {
        self.text.line_height()
    }
}

#[inline]
fn center(v: i32) -> f32 {
    v as f32 + 0.5
}

fn to_color(c: Rgb) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn solid(c: Rgb) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_color(c));
    paint.anti_alias = false;
    paint
}

/// Copy an RGBA image into an RGBA target at (x, y), clipping at the edges
fn blit_rgba(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: &[u8],
    src_width: u32,
    x: i32,
    y: i32,
) {
    if src_width == 0 {
        return;
    }
    let src_stride = src_width as usize * 4;
    let dst_stride = dst_width as usize * 4;

    for (row, line) in src.chunks_exact(src_stride).enumerate() {
        let dy = y + row as i32;
        if dy < 0 || dy >= dst_height as i32 {
            continue;
        }
        // Horizontal clip
        let skip = (-x).max(0) as usize;
        let start_x = x.max(0) as usize;
        if start_x >= dst_width as usize || skip >= src_width as usize {
            continue;
        }
        let count = (src_width as usize - skip).min(dst_width as usize - start_x);

        let d = dy as usize * dst_stride + start_x * 4;
        dst[d..d + count * 4].copy_from_slice(&line[skip * 4..(skip + count) * 4]);
    }
}

/// Draw a glyph image onto a pixmap with alpha blending
fn draw_glyph_to_pixmap(
    pixmap: &mut Pixmap,
    glyph_data: &[u8],
    glyph_width: u32,
    glyph_height: u32,
    dest_x: i32,
    dest_y: i32,
    color: CosmicColor,
) {
    let pixmap_width = pixmap.width() as i32;
    let pixmap_height = pixmap.height() as i32;
    let data = pixmap.data_mut();

    for gy in 0..glyph_height as i32 {
        let py = dest_y + gy;
        if py < 0 || py >= pixmap_height {
            continue;
        }

        for gx in 0..glyph_width as i32 {
            let px = dest_x + gx;
            if px < 0 || px >= pixmap_width {
                continue;
            }

            let glyph_idx = (gy as u32 * glyph_width + gx as u32) as usize;
            let Some(&alpha) = glyph_data.get(glyph_idx) else {
                continue;
            };
            if alpha == 0 {
                continue;
            }

            let pixel_idx = ((py as u32 * pixmap_width as u32 + px as u32) * 4) as usize;
            if pixel_idx + 3 >= data.len() {
                continue;
            }

            // Blend over an opaque background; alpha stays 255
            let src_a = alpha as u32;
            let inv_a = 255 - src_a;

            data[pixel_idx] =
                ((color.r() as u32 * src_a + data[pixel_idx] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 1] =
                ((color.g() as u32 * src_a + data[pixel_idx + 1] as u32 * inv_a) / 255) as u8;
            data[pixel_idx + 2] =
                ((color.b() as u32 * src_a + data[pixel_idx + 2] as u32 * inv_a) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test]
    fn test_blit_inside() {
        let mut dst = vec![0u8; 4 * 4 * 4];
        let src: Vec<u8> = [9, 8, 7, 255].repeat(4);
        blit_rgba(&mut dst, 4, 4, &src, 2, 1, 1);
        assert_eq!(pixel(&dst, 4, 1, 1), [9, 8, 7, 255]);
        assert_eq!(pixel(&dst, 4, 2, 2), [9, 8, 7, 255]);
        assert_eq!(pixel(&dst, 4, 0, 0), [0, 0, 0, 0]);
        assert_eq!(pixel(&dst, 4, 3, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut dst = vec![0u8; 3 * 3 * 4];
        let src: Vec<u8> = [1, 1, 1, 255].repeat(9);
        blit_rgba(&mut dst, 3, 3, &src, 3, -1, 2);
        assert_eq!(pixel(&dst, 3, 0, 2), [1, 1, 1, 255]);
        assert_eq!(pixel(&dst, 3, 1, 2), [1, 1, 1, 255]);
        assert_eq!(pixel(&dst, 3, 2, 2), [0, 0, 0, 0]);
        assert_eq!(pixel(&dst, 3, 0, 1), [0, 0, 0, 0]);

        // Fully outside: nothing happens
        blit_rgba(&mut dst, 3, 3, &src, 3, 10, 10);
        blit_rgba(&mut dst, 3, 3, &src, 3, -10, 0);
    }
}
