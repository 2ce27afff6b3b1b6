//! Screen Overlay window layer
//!
//! X11 windows for the screen overlay and its color picker.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              tint              picker               │
//! │          TintWindow         PickerWindow            │
//! │   (full-screen overlay)  (Surface + EventSource)    │
//! ├─────────────────────────────────────────────────────┤
//! │                    renderer                         │
//! │            tiny-skia + cosmic-text                  │
//! │          (canvas, shapes, label text)               │
//! ├─────────────────────────────────────────────────────┤
//! │                    platform/                        │
//! │          x11 (visuals, SHM, WM hints)               │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod picker;
pub mod platform;
pub mod renderer;
pub mod tint;

// Re-export commonly used types
pub use picker::PickerWindow;
pub use platform::{PlatformError, ScreenInfo};
pub use renderer::{Canvas, TextRenderer};
pub use tint::{INITIAL_TINT, TintWindow};
