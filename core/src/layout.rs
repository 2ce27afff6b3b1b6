//! Picker window geometry
//!
//! Every region is sized as a fixed fraction of the screen height so the
//! picker keeps its proportions on any display. Geometry is computed once
//! per session and never changes afterwards.

/// A rectangular control area inside the picker window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub width: i32,
    pub height: i32,
    /// Distance from the window's left edge
    pub margin_x: i32,
    /// Distance from the window's top edge
    pub margin_y: i32,
    /// Half-size of the cursor glyph drawn on this region
    pub cursor_size: i32,
}

impl Region {
    /// First pixel column
    pub fn left(&self) -> i32 {
        self.margin_x
    }

    /// Last pixel column (inclusive)
    pub fn right(&self) -> i32 {
        self.margin_x + self.width - 1
    }

    pub fn top(&self) -> i32 {
        self.margin_y
    }

    /// Last pixel row (inclusive)
    pub fn bottom(&self) -> i32 {
        self.margin_y + self.height - 1
    }

    #[inline]
    pub fn clamp_x(&self, x: i32) -> i32 {
        x.clamp(self.left(), self.right().max(self.left()))
    }

    #[inline]
    pub fn clamp_y(&self, y: i32) -> i32 {
        y.clamp(self.top(), self.bottom().max(self.top()))
    }

    /// Strict interior test: the outermost frame of the region is excluded
    pub fn contains_strict(&self, x: i32, y: i32) -> bool {
        x > self.margin_x
            && x < self.margin_x + self.width
            && y > self.margin_y
            && y < self.margin_y + self.height
    }

    /// Horizontal position as 0.0 (left column) – 1.0 (right column)
    pub fn fraction_x(&self, x: i32) -> f32 {
        fraction(x - self.margin_x, self.width)
    }

    /// Vertical position as 0.0 (top row) – 1.0 (bottom row)
    pub fn fraction_y(&self, y: i32) -> f32 {
        fraction(y - self.margin_y, self.height)
    }

    /// Inverse of [`Region::fraction_x`]
    pub fn x_at(&self, f: f32) -> i32 {
        self.margin_x + (f * (self.width - 1).max(0) as f32).round() as i32
    }

    /// Inverse of [`Region::fraction_y`]
    pub fn y_at(&self, f: f32) -> i32 {
        self.margin_y + (f * (self.height - 1).max(0) as f32).round() as i32
    }
}

#[inline]
fn fraction(offset: i32, span: i32) -> f32 {
    if span <= 1 {
        0.0
    } else {
        offset as f32 / (span - 1) as f32
    }
}

/// Horizontal opacity slider: an "OPACITY" caption followed by a track line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpacitySlider {
    pub region: Region,
    /// Pixel width of the caption text
    pub caption_width: i32,
}

impl OpacitySlider {
    /// First x of the track (just past the caption)
    pub fn track_start(&self) -> i32 {
        self.region.margin_x + self.caption_width + self.caption_width / 2
    }

    /// Last x of the track (inclusive)
    pub fn track_end(&self) -> i32 {
        self.region.margin_x + self.region.width
    }

    /// y of the track line
    pub fn track_y(&self) -> i32 {
        self.region.margin_y
    }

    pub fn clamp_x(&self, x: i32) -> i32 {
        x.clamp(self.track_start(), self.track_end().max(self.track_start()))
    }

    /// Hit box: the track padded by the cursor half-size on every side
    pub fn hit(&self, x: i32, y: i32) -> bool {
        let cs = self.region.cursor_size;
        x >= self.track_start() - cs
            && x <= self.track_end() + cs
            && y >= self.track_y() - cs
            && y <= self.track_y() + cs
    }

    /// Track position as 0.0–1.0
    pub fn fraction(&self, x: i32) -> f32 {
        let span = self.track_end() - self.track_start();
        if span <= 0 {
            0.0
        } else {
            (x - self.track_start()) as f32 / span as f32
        }
    }

    /// 0–255 opacity for a track position (truncating)
    pub fn opacity(&self, x: i32) -> u8 {
        (self.fraction(x) * 255.0) as u8
    }

    /// Whole percent shown next to the track (truncating)
    pub fn percent(&self, x: i32) -> u32 {
        (self.fraction(x) * 100.0) as u32
    }

    pub fn x_at(&self, f: f32) -> i32 {
        let span = (self.track_end() - self.track_start()).max(0);
        self.track_start() + (f * span as f32).round() as i32
    }
}

/// Full picker layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub window_width: u32,
    pub window_height: u32,
    /// 2D hue/saturation spectrum
    pub spectrum: Region,
    /// Vertical value gradient right of the spectrum
    pub value: Region,
    /// Output color preview below the spectrum
    pub swatch: Region,
    pub opacity: OpacitySlider,
}

/// `screen_height * num / den`, truncated
#[inline]
fn frac(screen_height: u32, num: f64, den: f64) -> i32 {
    (screen_height as f64 * num / den) as i32
}

impl Layout {
    /// Derive all regions from the screen height.
    ///
    /// `caption_width` is the rendered width of the opacity caption, which
    /// decides where the opacity track starts.
    pub fn new(screen_height: u32, caption_width: i32) -> Self {
        let h = screen_height;

        let spectrum = Region {
            width: frac(h, 1.0, 3.0),
            height: frac(h, 1.0, 3.0),
            margin_x: frac(h, 1.0, 36.0),
            margin_y: frac(h, 1.0, 36.0),
            cursor_size: frac(h, 1.0, 153.6),
        };

        let value = Region {
            width: frac(h, 1.0, 30.0),
            height: spectrum.height,
            margin_x: spectrum.margin_x + spectrum.width + frac(h, 1.0, 30.0),
            margin_y: spectrum.margin_y,
            cursor_size: frac(h, 1.0, 109.0),
        };

        let swatch = Region {
            width: spectrum.width,
            height: frac(h, 1.0, 15.0),
            margin_x: spectrum.margin_x,
            margin_y: spectrum.margin_y + spectrum.height + frac(h, 1.0, 75.0),
            cursor_size: 0,
        };

        let opacity = OpacitySlider {
            region: Region {
                width: spectrum.width,
                height: 0,
                margin_x: spectrum.margin_x,
                margin_y: swatch.margin_y + swatch.height + frac(h, 1.0, 30.0),
                cursor_size: frac(h, 1.0, 109.0),
            },
            caption_width,
        };

        Self {
            window_width: frac(h, 15.0, 32.0).max(1) as u32,
            window_height: frac(h, 25.0, 48.0).max(1) as u32,
            spectrum,
            value,
            swatch,
            opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_for_1080p() {
        let l = Layout::new(1080, 42);
        assert_eq!(l.window_width, 506);
        assert_eq!(l.window_height, 562);

        assert_eq!(l.spectrum.width, 360);
        assert_eq!(l.spectrum.height, 360);
        assert_eq!(l.spectrum.margin_x, 30);
        assert_eq!(l.spectrum.margin_y, 30);
        assert_eq!(l.spectrum.cursor_size, 7);

        assert_eq!(l.value.width, 36);
        assert_eq!(l.value.margin_x, 30 + 360 + 36);
        assert_eq!(l.value.cursor_size, 9);

        assert_eq!(l.swatch.margin_y, 30 + 360 + 14);
        assert_eq!(l.swatch.height, 72);

        assert_eq!(l.opacity.track_y(), 404 + 72 + 36);
        assert_eq!(l.opacity.track_start(), 30 + 42 + 21);
        assert_eq!(l.opacity.track_end(), 390);
    }

    #[test]
    fn test_regions_fit_in_window() {
        for h in [480, 768, 1080, 1440, 2160] {
            let l = Layout::new(h, 40);
            assert!(l.value.margin_x + l.value.width + l.value.cursor_size < l.window_width as i32);
            assert!(l.opacity.track_y() + l.opacity.region.cursor_size < l.window_height as i32);
        }
    }

    #[test]
    fn test_region_clamp() {
        let r = Region {
            width: 10,
            height: 20,
            margin_x: 5,
            margin_y: 7,
            cursor_size: 2,
        };
        assert_eq!(r.clamp_x(-100), 5);
        assert_eq!(r.clamp_x(1000), 14);
        assert_eq!(r.clamp_x(9), 9);
        assert_eq!(r.clamp_y(0), 7);
        assert_eq!(r.clamp_y(27), 26);
    }

    #[test]
    fn test_strict_interior() {
        let r = Region {
            width: 10,
            height: 10,
            margin_x: 5,
            margin_y: 5,
            cursor_size: 1,
        };
        assert!(!r.contains_strict(5, 8));
        assert!(!r.contains_strict(8, 5));
        assert!(r.contains_strict(6, 6));
        assert!(r.contains_strict(14, 14));
        assert!(!r.contains_strict(15, 10));
    }

    #[test]
    fn test_fraction_round_trip() {
        let l = Layout::new(900, 30);
        let s = l.spectrum;
        assert_eq!(s.fraction_x(s.left()), 0.0);
        assert_eq!(s.fraction_x(s.right()), 1.0);
        assert_eq!(s.fraction_y(s.bottom()), 1.0);
        assert_eq!(s.x_at(s.fraction_x(s.left() + 17)), s.left() + 17);
        assert_eq!(s.y_at(1.0), s.bottom());
    }

    #[test]
    fn test_opacity_track() {
        let l = Layout::new(1080, 42);
        let o = l.opacity;
        assert_eq!(o.opacity(o.track_start()), 0);
        assert_eq!(o.opacity(o.track_end()), 255);
        assert_eq!(o.percent(o.track_end()), 100);
        assert_eq!(o.clamp_x(0), o.track_start());
        assert_eq!(o.clamp_x(10_000), o.track_end());
        assert!(o.hit(o.track_start() - o.region.cursor_size, o.track_y()));
        assert!(!o.hit(o.track_start() - o.region.cursor_size - 1, o.track_y()));
        assert!(!o.hit(o.track_end(), o.track_y() + o.region.cursor_size + 1));
    }
}
