//! Picker state persisted between sessions
//!
//! Fixed 20-byte record: the last ARGB pixel followed by the four cursor
//! coordinates (spectrum x, spectrum y, opacity x, value y), all native-endian.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::color::Argb;
use crate::error::StateError;
use crate::input::CursorState;

pub const RECORD_LEN: usize = 20;

/// Pixel and cursor coordinates at the end of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    pub pixel: Argb,
    pub cursors: CursorState,
}

impl SessionRecord {
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let c = &self.cursors;
        let mut out = [0u8; RECORD_LEN];
        out[0..4].copy_from_slice(&self.pixel.0.to_ne_bytes());
        for (i, v) in [c.spectrum_x, c.spectrum_y, c.opacity_x, c.value_y]
            .into_iter()
            .enumerate()
        {
            let at = 4 + i * 4;
            out[at..at + 4].copy_from_slice(&v.to_ne_bytes());
        }
        out
    }

    /// Decode a record; `None` if `bytes` is too short
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let word = |i: usize| -> Option<[u8; 4]> { bytes.get(i * 4..i * 4 + 4)?.try_into().ok() };
        Some(Self {
            pixel: Argb(u32::from_ne_bytes(word(0)?)),
            cursors: CursorState {
                spectrum_x: i32::from_ne_bytes(word(1)?),
                spectrum_y: i32::from_ne_bytes(word(2)?),
                opacity_x: i32::from_ne_bytes(word(3)?),
                value_y: i32::from_ne_bytes(word(4)?),
            },
        })
    }
}

/// File-backed store for [`SessionRecord`]
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last record. A missing or truncated file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<SessionRecord>, StateError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No picker state yet");
                return Ok(None);
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let record = SessionRecord::decode(&bytes);
        if record.is_none() {
            tracing::warn!(
                path = %self.path.display(),
                len = bytes.len(),
                "Picker state file is truncated, using defaults"
            );
        }
        Ok(record)
    }

    /// Overwrite the state file, creating its directory if needed
    pub fn save(&self, record: &SessionRecord) -> Result<(), StateError> {
        let write_err = |source| StateError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, record.encode()).map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), pixel = %record.pixel, "Saved picker state");
        Ok(())
    }
}
