//! Error types for the picker engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors on the color channel
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to create fifo at {path}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} exists and is not a fifo")]
    NotAFifo { path: PathBuf },

    #[error("failed to open fifo {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove fifo {path}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write color value")]
    Write(#[source] std::io::Error),

    #[error("failed to read color value")]
    Read(#[source] std::io::Error),
}

/// Errors reading or writing the picker state file
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that end a picker session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    State(#[from] StateError),

    /// Failure reported by the window backend
    #[error("window backend failed")]
    Platform(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),
}
