//! The color picker window
//!
//! A fixed-size, always-on-top X11 window whose size follows the screen
//! height. Drawing goes to a [`Canvas`]; `present` pushes the canvas to the
//! window through shared memory.

use screen_overlay_core::{
    EventSource, Layout, OPACITY_CAPTION, PickerEvent, PixelBuffer, Point, PointerEvent, Rect,
    Rgb, Surface, build_icon,
};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::shm::ConnectionExt as _;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::platform::x11::{self, AtomCollection, ShmBuffer};
use crate::platform::{PlatformError, other};
use crate::renderer::{Canvas, TextRenderer};

const ICON_SIZE: u32 = 128;

pub struct PickerWindow {
    conn: RustConnection,
    window: Window,
    gc: Gcontext,
    atoms: AtomCollection,
    depth: u8,
    layout: Layout,
    canvas: Canvas,
    shm_buffer: ShmBuffer,
}

impl PickerWindow {
    /// Open and map the picker window on the default display.
    ///
    /// Fails when the display has no true-color root visual, lacks SHM, or
    /// no monospace font is installed.
    pub fn open(title: &str) -> Result<Self, PlatformError> {
        let (conn, screen_num, atoms) = x11::connect()?;
        x11::require_shm(&conn)?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let info = x11::screen_info(screen);
        let (visual, depth) = x11::find_true_color_root(screen)
            .ok_or_else(|| PlatformError::UnsupportedFeature("true-color visual".into()))?;

        let mut text = TextRenderer::new()?;
        let caption_width = text.measure(OPACITY_CAPTION);
        let layout = Layout::new(info.height, caption_width);
        let (width, height) = (layout.window_width, layout.window_height);

        let window = conn.generate_id().map_err(other)?;
        let win_aux = CreateWindowAux::new()
            .background_pixel(screen.white_pixel)
            .border_pixel(0)
            .event_mask(
                EventMask::EXPOSURE
                    | EventMask::BUTTON_PRESS
                    | EventMask::BUTTON_RELEASE
                    | EventMask::BUTTON_MOTION,
            );

        conn.create_window(
            depth,
            window,
            root,
            0,
            0,
            width as u16,
            height as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &win_aux,
        )
        .map_err(other)?;

        let gc = conn.generate_id().map_err(other)?;
        conn.create_gc(gc, window, &CreateGCAux::new())
            .map_err(other)?;

        let shm_buffer = ShmBuffer::create(&conn, width, height)?;
        let canvas = Canvas::new(width, height, text)?;

        let picker = Self {
            conn,
            window,
            gc,
            atoms,
            depth,
            layout,
            canvas,
            shm_buffer,
        };
        picker.setup_window_hints(title)?;

        picker.conn.map_window(window).map_err(other)?;
        x11::add_wm_state(
            &picker.conn,
            root,
            window,
            &picker.atoms,
            picker.atoms._NET_WM_STATE_ABOVE,
        )?;
        picker.conn.flush().map_err(other)?;

        tracing::debug!(width, height, screen_height = info.height, "Picker window mapped");
        Ok(picker)
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Title, icon, fixed size and close-button protocol
    fn setup_window_hints(&self, title: &str) -> Result<(), PlatformError> {
        x11::set_title(&self.conn, self.window, &self.atoms, title)?;

        let icon = x11::icon_property(ICON_SIZE, &build_icon(ICON_SIZE));
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms._NET_WM_ICON,
                self.atoms.CARDINAL,
                &icon,
            )
            .map_err(other)?;

        let hints = x11::fixed_size_hints(self.layout.window_width, self.layout.window_height);
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                AtomEnum::WM_NORMAL_HINTS,
                AtomEnum::WM_SIZE_HINTS,
                &hints,
            )
            .map_err(other)?;

        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms.WM_PROTOCOLS,
                AtomEnum::ATOM,
                &[self.atoms.WM_DELETE_WINDOW],
            )
            .map_err(other)?;

        Ok(())
    }
}

/// Map a raw X event to a picker event. Events the picker ignores map to `None`.
fn translate(event: Event, delete_window: Atom) -> Option<PickerEvent> {
    match event {
        // Only the last expose of a batch repaints
        Event::Expose(e) if e.count == 0 => Some(PickerEvent::Expose),
        Event::ButtonPress(e) if e.detail == 1 => Some(PickerEvent::Pointer(PointerEvent::Press {
            x: e.event_x as i32,
            y: e.event_y as i32,
        })),
        Event::ButtonRelease(e) if e.detail == 1 => Some(PickerEvent::Pointer(PointerEvent::Release)),
        Event::MotionNotify(e) => Some(PickerEvent::Pointer(PointerEvent::Motion {
            x: e.event_x as i32,
            y: e.event_y as i32,
        })),
        Event::ClientMessage(e) if e.format == 32 && e.data.as_data32()[0] == delete_window => {
            Some(PickerEvent::Close)
        }
        _ => None,
    }
}

impl Surface for PickerWindow {
    type Error = PlatformError;

    fn clear(&mut self, color: Rgb) {
        self.canvas.clear(color);
    }

    fn blit(&mut self, image: &PixelBuffer, x: i32, y: i32) {
        self.canvas.blit(image, x, y);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.canvas.fill_rect(rect, color);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        self.canvas.fill_polygon(points, color);
    }

    fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb) {
        self.canvas.draw_line(from, to, width, color);
    }

    fn draw_text(&mut self, text: &str, x: i32, baseline: i32, color: Rgb) {
        self.canvas.draw_text(text, x, baseline, color);
    }

    fn text_width(&mut self, text: &str) -> i32 {
        self.canvas.text_width(text)
    }

    fn text_height(&mut self) -> i32 {
        self.canvas.text_height()
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        x11::rgba_to_bgra(self.canvas.data(), self.shm_buffer.as_mut_slice());

        let (w, h) = (self.canvas.width() as u16, self.canvas.height() as u16);
        self.conn
            .shm_put_image(
                self.window,
                self.gc,
                w,
                h,
                0,
                0,
                w,
                h,
                0,
                0,
                self.depth,
                ImageFormat::Z_PIXMAP.into(),
                false,
                self.shm_buffer.seg_id,
                0,
            )
            .map_err(other)?;
        self.conn.flush().map_err(other)
    }
}

impl EventSource for PickerWindow {
    type Error = PlatformError;

    fn next_event(&mut self) -> Result<PickerEvent, PlatformError> {
        loop {
            let event = self
                .conn
                .wait_for_event()
                .map_err(|e| PlatformError::ConnectionFailed(e.to_string()))?;
            if let Some(event) = translate(event, self.atoms.WM_DELETE_WINDOW) {
                return Ok(event);
            }
        }
    }
}

impl Drop for PickerWindow {
    fn drop(&mut self) {
        self.shm_buffer.release(&self.conn);
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.flush();
    }
}
