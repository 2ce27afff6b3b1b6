//! Color values and HSV → RGB conversion
//!
//! The picker works in HSV (all components normalized to 0.0–1.0) and hands
//! the overlay packed 32-bit ARGB values.

use std::fmt;

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` value (upper byte ignored)
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Hue / saturation / value, each in 0.0–1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    #[inline]
    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self.hue, self.saturation, self.value)
    }
}

/// Packed `(opacity << 24) | (red << 16) | (green << 8) | blue`
///
/// This is the unit streamed to the overlay and persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb(pub u32);

impl Argb {
    pub const fn new(opacity: u8, rgb: Rgb) -> Self {
        Self(((opacity as u32) << 24) | rgb.to_hex())
    }

    pub const fn opacity(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn rgb(self) -> Rgb {
        Rgb::from_hex(self.0)
    }

    /// Scale the color channels by opacity (X11 ARGB visuals expect premultiplied pixels)
    pub fn premultiplied(self) -> Self {
        let a = self.opacity() as u32;
        let scale = |c: u8| ((c as u32 * a + 127) / 255) as u8;
        let Rgb { r, g, b } = self.rgb();
        Self::new(self.opacity(), Rgb::new(scale(r), scale(g), scale(b)))
    }
}

impl From<u32> for Argb {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[inline]
fn to_channel(x: f32) -> u8 {
    (x * 255.0).round() as u8
}

/// Convert HSV to RGB using the six-sector hexagon model (red at hue 0).
///
/// A hue of exactly 1.0 wraps around to 0.0.
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let h = if hue >= 1.0 { 0.0 } else { hue };

    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (v, p, q, t) = (to_channel(value), to_channel(p), to_channel(q), to_channel(t));

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(r, g, b)
}
