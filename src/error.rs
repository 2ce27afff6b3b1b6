//! Errors that end the application

use screen_overlay_core::{ChannelError, SessionError};
use screen_overlay_window::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window system error")]
    Platform(#[from] PlatformError),

    #[error("color channel error")]
    Channel(#[from] ChannelError),

    #[error("picker session failed")]
    Session(#[from] SessionError),

    #[error("picker thread exited before opening its window")]
    PickerVanished,

    #[error("picker thread panicked")]
    PickerPanicked,

    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The error and all of its causes, outermost first, joined by `: `
    pub fn report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_includes_causes() {
        let err = AppError::from(PlatformError::UnsupportedFeature("32-bit ARGB visual".into()));
        assert_eq!(
            err.report(),
            "window system error: Unsupported feature: 32-bit ARGB visual"
        );
    }

    #[test]
    fn test_report_walks_nested_sources() {
        let io = std::io::Error::other("broken pipe");
        let err = AppError::from(SessionError::Channel(ChannelError::Write(io)));
        // SessionError::Channel is transparent
        assert_eq!(
            err.report(),
            "picker session failed: failed to write color value: broken pipe"
        );
    }
}
