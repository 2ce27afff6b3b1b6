//! Picker session lifecycle
//!
//! # Threading model
//!
//! The picker runs on its own thread and talks to the overlay only through
//! the color FIFO. Before spawning, the overlay attaches the FIFO's read end
//! so the picker's write end opens without waiting. The picker's window is
//! created INSIDE its thread via a factory, and the thread confirms back over
//! a channel once both the window and the write end exist. Any failure before
//! that point is reported through the same channel instead of leaving the
//! overlay waiting for colors that never come.

use std::fs::File;
use std::thread::{self, JoinHandle};

use screen_overlay_core::{
    AppConfig, Argb, ColorFifo, ColorReader, ColorWriter, EventSource, Layout, Palette,
    PickerSession, SessionError, SessionRecord, StateStore, Surface,
};
use screen_overlay_window::{PickerWindow, PlatformError, TintWindow};

use crate::error::AppError;

pub const PICKER_TITLE: &str = "Color picker";

pub type PickerHandle = JoinHandle<Result<SessionRecord, SessionError>>;

/// Everything the picker thread needs besides its window
#[derive(Debug, Clone)]
pub struct PickerContext {
    pub fifo: ColorFifo,
    pub store: StateStore,
    pub palette: Palette,
}

impl PickerContext {
    pub fn from_config(config: &AppConfig, fifo: &ColorFifo) -> Self {
        Self {
            fifo: fifo.clone(),
            store: StateStore::new(&config.state_file),
            palette: config.palette(),
        }
    }
}

/// Body of the picker thread once its window and write end exist
fn run_picker<P>(
    mut window: P,
    layout: Layout,
    writer: ColorWriter<File>,
    ctx: PickerContext,
) -> Result<SessionRecord, SessionError>
where
    P: Surface + EventSource,
{
    let restored = ctx.store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to read picker state, using defaults");
        None
    });

    let mut session = PickerSession::new(layout, ctx.palette, restored, writer);
    session.run(&mut window)?;
    drop(window);
    session.finish(&ctx.store)
}

/// Spawn a picker session using a factory that creates its window inside the thread.
///
/// Returns `Err` if window creation or opening the FIFO's write end fails
/// (confirmed via channel from the spawned thread). On success returns the
/// thread handle and the read end; the caller drains the reader, then joins.
pub fn spawn_picker_with_factory<P, F>(
    create_window: F,
    ctx: PickerContext,
) -> Result<(PickerHandle, ColorReader<File>), AppError>
where
    P: Surface + EventSource + 'static,
    F: FnOnce() -> Result<(P, Layout), PlatformError> + Send + 'static,
{
    let reader = ctx.fifo.attach_reader()?;

    // Use a oneshot channel to get the startup result back from spawned thread
    let (confirm_tx, confirm_rx) = std::sync::mpsc::channel::<Result<(), AppError>>();

    let handle = thread::spawn(move || {
        let (window, layout) = match create_window() {
            Ok(created) => created,
            Err(e) => {
                let _ = confirm_tx.send(Err(e.into()));
                return Err(SessionError::Platform("picker window not created".into()));
            }
        };
        let writer = match ctx.fifo.open_writer() {
            Ok(writer) => writer,
            Err(e) => {
                let _ = confirm_tx.send(Err(e.into()));
                return Err(SessionError::Platform("color channel not opened".into()));
            }
        };
        let _ = confirm_tx.send(Ok(()));
        run_picker(window, layout, writer, ctx)
    });

    match confirm_rx.recv() {
        Ok(Ok(())) => Ok((handle, reader)),
        Ok(Err(e)) => {
            let _ = handle.join();
            Err(e)
        }
        Err(_) => {
            let _ = handle.join();
            Err(AppError::PickerVanished)
        }
    }
}

/// Run one picker session, painting every received color onto the overlay.
///
/// Blocks until the picker window is closed and its state is saved.
pub fn run_picker_session(
    tint: &mut TintWindow,
    config: &AppConfig,
    fifo: &ColorFifo,
) -> Result<SessionRecord, AppError> {
    let (handle, reader) = spawn_picker_with_factory(
        || {
            let window = PickerWindow::open(PICKER_TITLE)?;
            let layout = window.layout();
            Ok((window, layout))
        },
        PickerContext::from_config(config, fifo),
    )?;

    let applied = drain_into(reader, |pixel| tint.set_color(pixel).map_err(AppError::from))?;

    let record = handle.join().map_err(|_| AppError::PickerPanicked)??;
    tracing::info!(applied, pixel = %record.pixel, "Picker session closed");
    Ok(record)
}

/// Read colors until the writer closes, handing each to `apply` in order
fn drain_into<F>(reader: ColorReader<File>, mut apply: F) -> Result<usize, AppError>
where
    F: FnMut(Argb) -> Result<(), AppError>,
{
    let mut applied = 0;
    for pixel in reader {
        let pixel = pixel?;
        tracing::debug!(%pixel, "Applying overlay color");
        apply(pixel)?;
        applied += 1;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use screen_overlay_core::{ChannelError, PickerEvent, PixelBuffer, Point, PointerEvent, Rect, Rgb};
    use std::collections::VecDeque;

    /// Headless window that replays events and ignores drawing
    struct HeadlessWindow {
        events: VecDeque<PickerEvent>,
    }

    impl Surface for HeadlessWindow {
        type Error = PlatformError;
        fn clear(&mut self, _: Rgb) {}
        fn blit(&mut self, _: &PixelBuffer, _: i32, _: i32) {}
        fn fill_rect(&mut self, _: Rect, _: Rgb) {}
        fn fill_polygon(&mut self, _: &[Point], _: Rgb) {}
        fn draw_line(&mut self, _: Point, _: Point, _: u32, _: Rgb) {}
        fn draw_text(&mut self, _: &str, _: i32, _: i32, _: Rgb) {}
        fn text_width(&mut self, text: &str) -> i32 {
            text.len() as i32 * 6
        }
        fn text_height(&mut self) -> i32 {
            13
        }
        fn present(&mut self) -> Result<(), PlatformError> {
            Ok(())
        }
    }

    impl EventSource for HeadlessWindow {
        type Error = PlatformError;
        fn next_event(&mut self) -> Result<PickerEvent, PlatformError> {
            Ok(self.events.pop_front().unwrap_or(PickerEvent::Close))
        }
    }

    fn context(dir: &std::path::Path) -> PickerContext {
        PickerContext {
            fifo: ColorFifo::create(dir.join("color.fifo")).unwrap(),
            store: StateStore::new(dir.join("picker.state")),
            palette: Palette::default(),
        }
    }

    #[test]
    fn test_session_streams_colors_and_saves_state() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let store = ctx.store.clone();
        let layout = Layout::new(720, 42);

        let press = PickerEvent::Pointer(PointerEvent::Press {
            x: layout.spectrum.left() + 10,
            y: layout.spectrum.top() + 10,
        });
        let release = PickerEvent::Pointer(PointerEvent::Release);

        let (handle, reader) = spawn_picker_with_factory(
            move || {
                let window = HeadlessWindow {
                    events: VecDeque::from([PickerEvent::Expose, press, release]),
                };
                Ok((window, layout))
            },
            ctx,
        )
        .unwrap();

        let mut received = Vec::new();
        let applied = drain_into(reader, |p| {
            received.push(p);
            Ok(())
        })
        .unwrap();
        let record = handle.join().unwrap().unwrap();

        assert_eq!(applied, 2);
        assert_eq!(received.last(), Some(&record.pixel));
        assert_eq!(store.load().unwrap(), Some(record));
    }

    #[test]
    fn test_failed_window_is_reported_without_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let result = spawn_picker_with_factory::<HeadlessWindow, _>(
            || Err(PlatformError::ConnectionFailed("no display".into())),
            ctx,
        );
        assert!(matches!(
            result,
            Err(AppError::Platform(PlatformError::ConnectionFailed(_)))
        ));
    }

    #[test]
    fn test_unopenable_write_end_is_reported_without_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let path = ctx.fifo.path().to_path_buf();

        // The node disappears after the overlay attached but before the picker opens it
        let result = spawn_picker_with_factory(
            move || {
                std::fs::remove_file(&path).unwrap();
                Ok((
                    HeadlessWindow {
                        events: VecDeque::new(),
                    },
                    Layout::new(720, 42),
                ))
            },
            ctx,
        );
        assert!(matches!(
            result,
            Err(AppError::Channel(ChannelError::Open { .. }))
        ));
    }

    #[test]
    fn test_restored_pixel_is_sent_first() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let layout = Layout::new(720, 42);

        let saved = SessionRecord {
            pixel: Argb(0x4010_2030),
            cursors: screen_overlay_core::CursorState::defaults(&layout),
        };
        ctx.store.save(&saved).unwrap();

        let (handle, reader) = spawn_picker_with_factory(
            move || {
                Ok((
                    HeadlessWindow {
                        events: VecDeque::new(),
                    },
                    layout,
                ))
            },
            ctx,
        )
        .unwrap();

        let mut received = Vec::new();
        drain_into(reader, |p| {
            received.push(p);
            Ok(())
        })
        .unwrap();
        assert_eq!(handle.join().unwrap().unwrap(), saved);
        assert_eq!(received, vec![Argb(0x4010_2030)]);
    }
}
