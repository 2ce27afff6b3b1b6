//! Pixel buffers for the hue/saturation spectrum and the value slider
//!
//! Buffers are row-major RGBA with opaque alpha. Platform backends convert
//! to their native byte order when blitting.

use crate::color::{Argb, Rgb, hsv_to_rgb};

const BYTES_PER_PIXEL: usize = 4;

/// Owned RGBA image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create an opaque black buffer
    pub fn new(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL];
        for px in data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    /// Write one pixel; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.data[i] = color.r;
            self.data[i + 1] = color.g;
            self.data[i + 2] = color.b;
            self.data[i + 3] = 255;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.offset(x, y)
            .map(|i| Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Fill a whole row with one color
    fn fill_row(&mut self, y: u32, color: Rgb) {
        for x in 0..self.width {
            self.set_pixel(x, y, color);
        }
    }

    /// Raw RGBA bytes, row-major
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }
}

/// Position along an axis of `span` pixels, normalized to 0.0–1.0
#[inline]
fn ratio(n: u32, span: u32) -> f32 {
    if span <= 1 {
        0.0
    } else {
        n as f32 / (span - 1) as f32
    }
}

/// Hue runs left → right, saturation top (1.0) → bottom (0.0), value fixed at 1.0.
pub fn build_spectrum(width: u32, height: u32) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height);
    for row in 0..height {
        let saturation = 1.0 - ratio(row, height);
        for col in 0..width {
            img.set_pixel(col, row, hsv_to_rgb(ratio(col, width), saturation, 1.0));
        }
    }
    img
}

/// Value runs top (1.0) → bottom (0.0) for a fixed hue/saturation.
pub fn build_value_slider(width: u32, height: u32, hue: f32, saturation: f32) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height);
    for row in 0..height {
        img.fill_row(row, hsv_to_rgb(hue, saturation, 1.0 - ratio(row, height)));
    }
    img
}

/// Square window icon: spectrum with brightness rising towards the top.
///
/// Returned row-major as opaque ARGB words, the layout `_NET_WM_ICON` expects
/// after its width/height header.
pub fn build_icon(size: u32) -> Vec<Argb> {
    let mut icon = Vec::with_capacity(size as usize * size as usize);
    for row in 0..size {
        let saturation = 1.0 - ratio(row, size);
        let value = 0.5 + saturation / 2.0;
        for col in 0..size {
            icon.push(Argb::new(255, hsv_to_rgb(ratio(col, size), saturation, value)));
        }
    }
    icon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_corners() {
        let img = build_spectrum(64, 32);
        assert_eq!(img.as_rgba().len(), 64 * 32 * 4);
        // top-left: hue 0, full saturation
        assert_eq!(img.pixel(0, 0), Some(Rgb::new(255, 0, 0)));
        // bottom row is fully desaturated
        assert_eq!(img.pixel(0, 31), Some(Rgb::new(255, 255, 255)));
        assert_eq!(img.pixel(40, 31), Some(Rgb::new(255, 255, 255)));
        // rightmost column wraps back to red
        assert_eq!(img.pixel(63, 0), img.pixel(0, 0));
    }

    #[test]
    fn test_spectrum_rows_lose_saturation_downwards() {
        let img = build_spectrum(7, 11);
        let col = 2; // hue 1/3: green
        let mut prev_r = 0u8;
        for row in 0..11 {
            let c = img.pixel(col, row).unwrap();
            assert_eq!(c.g, 255);
            assert!(c.r >= prev_r);
            prev_r = c.r;
        }
    }

    #[test]
    fn test_value_slider_gradient() {
        let img = build_value_slider(5, 256, 2.0 / 3.0, 1.0);
        assert_eq!(img.pixel(0, 0), Some(Rgb::new(0, 0, 255)));
        assert_eq!(img.pixel(4, 255), Some(Rgb::new(0, 0, 0)));
        for row in 0..256 {
            let first = img.pixel(0, row);
            for col in 1..5 {
                assert_eq!(img.pixel(col, row), first);
            }
        }
    }

    #[test]
    fn test_buffer_is_opaque() {
        let img = build_value_slider(3, 3, 0.1, 0.5);
        assert!(img.as_rgba().chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_out_of_range_pixel_access() {
        let mut img = PixelBuffer::new(2, 2);
        img.set_pixel(5, 5, Rgb::new(1, 2, 3));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(1, 1), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_degenerate_sizes() {
        let img = build_spectrum(1, 1);
        assert_eq!(img.pixel(0, 0), Some(Rgb::new(255, 0, 0)));
        assert!(build_value_slider(0, 0, 0.0, 0.0).as_rgba().is_empty());
    }

    #[test]
    fn test_icon_layout() {
        let icon = build_icon(16);
        assert_eq!(icon.len(), 256);
        assert!(icon.iter().all(|px| px.opacity() == 255));
        // top-left: hue 0, saturation 1, value 1
        assert_eq!(icon[0].rgb(), Rgb::new(255, 0, 0));
        // bottom row: saturation 0, value 0.5
        assert_eq!(icon[15 * 16].rgb(), Rgb::new(128, 128, 128));
    }
}
