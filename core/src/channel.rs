//! One-directional color stream from the picker to the overlay
//!
//! The wire format is a bare sequence of 4-byte native-endian ARGB words.
//! There is no framing: the reader takes exactly four bytes per value and a
//! short read means the writer has gone away.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use rustix::fs::{CWD, FileType, Mode, OFlags, fcntl_setfl, mknodat};
use rustix::io::Errno;

use crate::color::Argb;
use crate::error::ChannelError;

const WORD: usize = std::mem::size_of::<u32>();

/// Write end of the color channel
pub struct ColorWriter<W: Write> {
    inner: W,
}

impl<W: Write> ColorWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Send one value; flushed immediately so the overlay sees it live
    pub fn send(&mut self, pixel: Argb) -> Result<(), ChannelError> {
        self.inner
            .write_all(&pixel.0.to_ne_bytes())
            .map_err(ChannelError::Write)?;
        self.inner.flush().map_err(ChannelError::Write)
    }
}

/// Read end of the color channel
pub struct ColorReader<R: Read> {
    inner: R,
}

impl<R: Read> ColorReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Block for the next value. `Ok(None)` once the writer has closed.
    pub fn recv(&mut self) -> Result<Option<Argb>, ChannelError> {
        let mut buf = [0u8; WORD];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(Some(Argb(u32::from_ne_bytes(buf)))),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(ChannelError::Read(e)),
        }
    }
}

impl<R: Read> Iterator for ColorReader<R> {
    type Item = Result<Argb, ChannelError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv().transpose()
    }
}

/// Named pipe carrying the color stream between threads or processes
#[derive(Debug, Clone)]
pub struct ColorFifo {
    path: PathBuf,
}

impl ColorFifo {
    /// Create the FIFO (mode 0600). An existing FIFO at `path` is reused.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ChannelError> {
        let path = path.into();
        match mknodat(CWD, path.as_path(), FileType::Fifo, Mode::RUSR | Mode::WUSR, 0) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Created color fifo");
            }
            Err(Errno::EXIST) => {
                let meta = std::fs::metadata(&path).map_err(|source| ChannelError::Create {
                    path: path.clone(),
                    source,
                })?;
                if !meta.file_type().is_fifo() {
                    return Err(ChannelError::NotAFifo { path });
                }
                tracing::debug!(path = %path.display(), "Reusing existing color fifo");
            }
            Err(errno) => {
                return Err(ChannelError::Create {
                    path,
                    source: errno.into(),
                });
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the write end; blocks until a reader opens the other end
    pub fn open_writer(&self) -> Result<ColorWriter<File>, ChannelError> {
        OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map(ColorWriter::new)
            .map_err(|source| self.open_error(source))
    }

    /// Open the read end without waiting for a writer.
    ///
    /// Reads report end of stream until a writer has connected, so only read
    /// once the writer is known to be open. A writer opening after this call
    /// does not block.
    pub fn attach_reader(&self) -> Result<ColorReader<File>, ChannelError> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(OFlags::NONBLOCK.bits() as i32)
            .open(&self.path)
            .map_err(|source| self.open_error(source))?;
        // Back to blocking reads
        fcntl_setfl(&file, OFlags::empty()).map_err(|e| self.open_error(e.into()))?;
        Ok(ColorReader::new(file))
    }

    fn open_error(&self, source: io::Error) -> ChannelError {
        ChannelError::Open {
            path: self.path.clone(),
            source,
        }
    }

    /// Unlink the FIFO node
    pub fn remove(self) -> Result<(), ChannelError> {
        std::fs::remove_file(&self.path).map_err(|source| ChannelError::Remove {
            path: self.path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixStream;
    use std::thread;

    #[test]
    fn test_values_arrive_in_order_then_close() {
        let (tx, rx) = UnixStream::pair().unwrap();
        let values = [0x8011_2233, 0, 0xFFFF_FFFF, 0x0102_0304];

        let mut writer = ColorWriter::new(tx);
        for v in values {
            writer.send(Argb(v)).unwrap();
        }
        drop(writer);

        let mut reader = ColorReader::new(rx);
        for v in values {
            assert_eq!(reader.recv().unwrap(), Some(Argb(v)));
        }
        assert_eq!(reader.recv().unwrap(), None);
    }

    #[test]
    fn test_partial_word_is_end_of_stream() {
        let bytes: &[u8] = &[1, 2, 3, 4, 5, 6];
        let mut reader = ColorReader::new(bytes);
        assert_eq!(reader.recv().unwrap(), Some(Argb(u32::from_ne_bytes([1, 2, 3, 4]))));
        assert_eq!(reader.recv().unwrap(), None);
    }

    #[test]
    fn test_reader_iterates_until_close() {
        let (tx, rx) = UnixStream::pair().unwrap();
        let handle = thread::spawn(move || {
            let mut writer = ColorWriter::new(tx);
            for i in 0..100u32 {
                writer.send(Argb(i * 7)).unwrap();
            }
        });
        let got: Vec<u32> = ColorReader::new(rx).map(|r| r.unwrap().0).collect();
        handle.join().unwrap();
        assert_eq!(got, (0..100u32).map(|i| i * 7).collect::<Vec<_>>());
    }

    #[test]
    fn test_fifo_create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.fifo");
        ColorFifo::create(&path).unwrap();
        let fifo = ColorFifo::create(&path).unwrap();
        let meta = std::fs::metadata(fifo.path()).unwrap();
        assert!(meta.file_type().is_fifo());
        fifo.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_fifo_refuses_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain");
        std::fs::write(&path, b"not a pipe").unwrap();
        assert!(matches!(
            ColorFifo::create(&path),
            Err(ChannelError::NotAFifo { .. })
        ));
    }

    #[test]
    fn test_fifo_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = ColorFifo::create(dir.path().join("color.fifo")).unwrap();

        let mut reader = fifo.attach_reader().unwrap();
        let mut writer = fifo.open_writer().unwrap();
        let handle = thread::spawn(move || {
            writer.send(Argb(0x80C0_FFEE)).unwrap();
            writer.send(Argb(0x0000_0001)).unwrap();
        });

        assert_eq!(reader.recv().unwrap(), Some(Argb(0x80C0_FFEE)));
        assert_eq!(reader.recv().unwrap(), Some(Argb(0x0000_0001)));
        assert_eq!(reader.recv().unwrap(), None);
        handle.join().unwrap();
    }

    #[test]
    fn test_attached_reader_lets_writer_open_without_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = ColorFifo::create(dir.path().join("color.fifo")).unwrap();

        let mut reader = fifo.attach_reader().unwrap();
        // Same thread: this would hang if the write end still waited for a reader
        let mut writer = fifo.open_writer().unwrap();
        writer.send(Argb(0x4010_2030)).unwrap();
        writer.send(Argb(0xFF00_0000)).unwrap();
        drop(writer);

        assert_eq!(reader.recv().unwrap(), Some(Argb(0x4010_2030)));
        assert_eq!(reader.recv().unwrap(), Some(Argb(0xFF00_0000)));
        assert_eq!(reader.recv().unwrap(), None);
    }

    #[test]
    fn test_attach_reader_missing_fifo() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = ColorFifo::create(dir.path().join("color.fifo")).unwrap();
        std::fs::remove_file(fifo.path()).unwrap();
        assert!(matches!(fifo.attach_reader(), Err(ChannelError::Open { .. })));
    }
}
