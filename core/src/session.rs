//! Picker session controller
//!
//! One `PickerSession` per picker window. It owns the geometry, cursor
//! positions, drag state and cursor renderers, turns window events into
//! redraws, and streams the resulting ARGB pixel to the overlay.

use std::io::Write;
use std::ops::ControlFlow;

use crate::channel::ColorWriter;
use crate::color::{Argb, Hsv};
use crate::config::Palette;
use crate::cursor::{OpacityCursor, SpectrumCursor, ValueCursor};
use crate::error::SessionError;
use crate::image::{build_spectrum, build_value_slider};
use crate::input::{CursorState, CursorUpdate, DragState, InputState, PointerEvent};
use crate::layout::Layout;
use crate::state::{SessionRecord, StateStore};
use crate::surface::{EventSource, PickerEvent, Rect, Surface};

fn platform_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> SessionError {
    SessionError::Platform(Box::new(e))
}

pub struct PickerSession<W: Write> {
    layout: Layout,
    palette: Palette,
    cursors: CursorState,
    input: InputState,
    spectrum: SpectrumCursor,
    value: ValueCursor,
    opacity: OpacityCursor,
    pixel: Argb,
    writer: ColorWriter<W>,
}

impl<W: Write> PickerSession<W> {
    /// Start a session, seeding cursors and pixel from `restored` when present.
    ///
    /// Restored coordinates are clamped to `layout`, which may differ from
    /// the one they were saved under.
    pub fn new(
        layout: Layout,
        palette: Palette,
        restored: Option<SessionRecord>,
        writer: ColorWriter<W>,
    ) -> Self {
        let spectrum_image = build_spectrum(
            layout.spectrum.width.max(0) as u32,
            layout.spectrum.height.max(0) as u32,
        );
        let mut session = Self {
            layout,
            palette,
            cursors: CursorState::defaults(&layout),
            input: InputState::new(),
            spectrum: SpectrumCursor::new(layout.spectrum, spectrum_image, palette.crosshair),
            value: ValueCursor::new(layout.value, palette.cursor, palette.background),
            opacity: OpacityCursor::new(layout.opacity, palette.cursor, palette.background),
            pixel: Argb::default(),
            writer,
        };

        match restored {
            Some(record) => {
                session.cursors = record.cursors.clamped(&layout);
                session.pixel = record.pixel;
                tracing::debug!(pixel = %record.pixel, "Restored picker state");
            }
            None => session.pixel = session.compose(),
        }
        session
    }

    /// Last pixel pushed to the channel
    pub fn pixel(&self) -> Argb {
        self.pixel
    }

    pub fn cursors(&self) -> CursorState {
        self.cursors
    }

    pub fn drag(&self) -> DragState {
        self.input.drag()
    }

    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            pixel: self.pixel,
            cursors: self.cursors,
        }
    }

    /// Color under the current cursors
    pub fn hsv(&self) -> Hsv {
        let l = &self.layout;
        Hsv::new(
            l.spectrum.fraction_x(self.cursors.spectrum_x),
            1.0 - l.spectrum.fraction_y(self.cursors.spectrum_y),
            1.0 - l.value.fraction_y(self.cursors.value_y),
        )
    }

    pub fn opacity(&self) -> u8 {
        self.layout.opacity.opacity(self.cursors.opacity_x)
    }

    fn compose(&self) -> Argb {
        Argb::new(self.opacity(), self.hsv().to_rgb())
    }

    /// Push the current pixel, then process events until the window closes
    pub fn run<P>(&mut self, window: &mut P) -> Result<(), SessionError>
    where
        P: Surface + EventSource,
    {
        self.writer.send(self.pixel)?;

        loop {
            let event = window.next_event().map_err(platform_error)?;
            if self.handle_event(window, event)?.is_break() {
                tracing::debug!("Picker window closed");
                return Ok(());
            }
            Surface::present(window).map_err(platform_error)?;
        }
    }

    /// Apply one event. Breaks when the window asked to close.
    pub fn handle_event<S: Surface>(
        &mut self,
        surface: &mut S,
        event: PickerEvent,
    ) -> Result<ControlFlow<()>, SessionError> {
        match event {
            PickerEvent::Expose => self.repaint(surface),
            PickerEvent::Pointer(pointer) => self.pointer(surface, pointer)?,
            PickerEvent::Close => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn pointer<S: Surface>(
        &mut self,
        surface: &mut S,
        event: PointerEvent,
    ) -> Result<(), SessionError> {
        let Some(update) = self.input.handle(&self.layout, &mut self.cursors, event) else {
            return Ok(());
        };

        match update {
            CursorUpdate::Spectrum => {
                self.draw_spectrum(surface);
                self.draw_value_slider(surface);
                self.draw_swatch(surface);
            }
            CursorUpdate::Value => {
                self.value.move_to(surface, self.cursors.value_y);
                self.draw_swatch(surface);
            }
            CursorUpdate::Opacity => {
                self.opacity.move_to(surface, self.cursors.opacity_x);
            }
        }

        self.pixel = self.compose();
        self.writer.send(self.pixel)?;
        Ok(())
    }

    /// Redraw every control from scratch
    fn repaint<S: Surface>(&mut self, surface: &mut S) {
        surface.clear(self.palette.background);
        self.value.reset();
        self.opacity.reset();

        self.draw_spectrum(surface);
        self.draw_value_slider(surface);
        self.value.move_to(surface, self.cursors.value_y);
        self.draw_swatch(surface);
        self.opacity.draw_caption(surface);
        self.opacity.move_to(surface, self.cursors.opacity_x);
    }

    fn draw_spectrum<S: Surface>(&mut self, surface: &mut S) {
        self.spectrum
            .move_to(surface, self.cursors.spectrum_x, self.cursors.spectrum_y);
    }

    fn draw_value_slider<S: Surface>(&self, surface: &mut S) {
        let region = &self.layout.value;
        let hsv = self.hsv();
        let image = build_value_slider(
            region.width.max(0) as u32,
            region.height.max(0) as u32,
            hsv.hue,
            hsv.saturation,
        );
        surface.blit(&image, region.margin_x, region.margin_y);
    }

    fn draw_swatch<S: Surface>(&self, surface: &mut S) {
        let r = &self.layout.swatch;
        surface.fill_rect(
            Rect::new(r.margin_x, r.margin_y, r.width, r.height),
            self.hsv().to_rgb(),
        );
    }

    /// Persist the final state and close the channel's write end
    pub fn finish(self, store: &StateStore) -> Result<SessionRecord, SessionError> {
        let record = self.record();
        store.save(&record)?;
        drop(self.writer);
        tracing::info!(pixel = %record.pixel, "Picker session finished");
        Ok(record)
    }
}
