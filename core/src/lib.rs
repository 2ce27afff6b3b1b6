pub mod channel;
pub mod color;
pub mod config;
pub mod cursor;
pub mod error;
pub mod image;
pub mod input;
pub mod layout;
pub mod session;
pub mod state;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use channel::{ColorFifo, ColorReader, ColorWriter};
pub use color::{Argb, Hsv, Rgb, hsv_to_rgb};
pub use config::{AppConfig, Palette};
pub use cursor::OPACITY_CAPTION;
pub use error::{ChannelError, ConfigError, SessionError, StateError};
pub use image::{PixelBuffer, build_icon, build_spectrum, build_value_slider};
pub use input::{CursorState, DragState, InputState, PointerEvent};
pub use layout::{Layout, OpacitySlider, Region};
pub use session::PickerSession;
pub use state::{SessionRecord, StateStore};
pub use surface::{EventSource, PickerEvent, Point, Rect, Surface};
