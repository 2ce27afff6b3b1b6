//! Windowing collaborator contract
//!
//! The picker engine draws and reads input exclusively through these two
//! traits. A platform backend (X11 in `screen-overlay-window`) implements
//! them for a real window; tests implement them with recorders.

use crate::color::Rgb;
use crate::image::PixelBuffer;
use crate::input::PointerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A drawable window surface.
///
/// There is no off-screen compositing at this level: every call paints
/// over whatever is currently shown, so callers erase stale glyphs
/// themselves. `present` makes pending drawing visible.
pub trait Surface {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fill the whole surface
    fn clear(&mut self, color: Rgb);

    /// Copy an image with its top-left corner at (x, y)
    fn blit(&mut self, image: &PixelBuffer, x: i32, y: i32);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Fill a convex polygon
    fn fill_polygon(&mut self, points: &[Point], color: Rgb);

    /// Solid line of `width` pixels
    fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb);

    /// Draw text in the fixed-width label font with its baseline at `baseline`
    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, color: Rgb);

    /// Rendered width of `text` in pixels
    fn text_width(&mut self, text: &str) -> i32;

    /// Line height (ascent + descent) of the label font in pixels
    fn text_height(&mut self) -> i32;

    /// Push pending drawing to the screen
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Input delivered to the picker session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerEvent {
    /// The window (or part of it) must be repainted
    Expose,
    Pointer(PointerEvent),
    /// The user asked to close the picker window
    Close,
}

/// Blocking source of picker events
pub trait EventSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Block until the next relevant event arrives
    fn next_event(&mut self) -> Result<PickerEvent, Self::Error>;
}
