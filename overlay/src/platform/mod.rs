//! Platform layer for the overlay and picker windows
//!
//! Only X11 is supported: the overlay relies on a 32-bit ARGB visual and
//! an input shape for click-through, the picker on a true-color root visual.

pub mod x11;

/// Size of the default screen in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
}

/// Errors that can occur in platform operations
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to connect to display server
    ConnectionFailed(String),
    /// Required protocol/feature not available
    UnsupportedFeature(String),
    /// Buffer/memory allocation failed
    BufferError(String),
    /// No fixed-width font for labels
    FontUnavailable(String),
    /// Generic platform error
    Other(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformError::ConnectionFailed(s) => write!(f, "Connection failed: {}", s),
            PlatformError::UnsupportedFeature(s) => write!(f, "Unsupported feature: {}", s),
            PlatformError::BufferError(s) => write!(f, "Buffer error: {}", s),
            PlatformError::FontUnavailable(s) => write!(f, "Font unavailable: {}", s),
            PlatformError::Other(s) => write!(f, "Platform error: {}", s),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Shorthand for wrapping any displayable X11 error
pub(crate) fn other<E: std::fmt::Display>(e: E) -> PlatformError {
    PlatformError::Other(e.to_string())
}
