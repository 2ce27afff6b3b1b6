//! Full-screen translucent overlay window
//!
//! The window's background pixel is the tint itself, so changing color is a
//! matter of swapping the background and clearing the window. Input passes
//! straight through to whatever is underneath.

use screen_overlay_core::Argb;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::platform::x11::{self, AtomCollection};
use crate::platform::{PlatformError, ScreenInfo, other};

/// Background before the first color arrives: half-transparent black
pub const INITIAL_TINT: Argb = Argb(0x8000_0000);

pub struct TintWindow {
    conn: RustConnection,
    window: Window,
    colormap: Colormap,
    screen: ScreenInfo,
    color: Argb,
}

impl TintWindow {
    /// Create and map the overlay covering the default screen
    pub fn open(title: &str, color: Argb) -> Result<Self, PlatformError> {
        let (conn, screen_num, atoms) = x11::connect()?;
        x11::require_shape(&conn)?;

        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let info = x11::screen_info(screen);

        // Find 32-bit visual for transparency
        let (visual, depth) = x11::find_argb_visual(screen)
            .ok_or_else(|| PlatformError::UnsupportedFeature("32-bit ARGB visual".into()))?;

        let colormap = conn.generate_id().map_err(other)?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, root, visual)
            .map_err(other)?;

        let window = conn.generate_id().map_err(other)?;
        let win_aux = CreateWindowAux::new()
            .background_pixel(color.premultiplied().0)
            .border_pixel(0)
            .colormap(colormap);

        conn.create_window(
            depth,
            window,
            root,
            0,
            0,
            info.width as u16,
            info.height as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &win_aux,
        )
        .map_err(other)?;

        let tint = Self {
            conn,
            window,
            colormap,
            screen: info,
            color,
        };
        tint.setup_window_hints(&atoms, title)?;
        x11::pass_input_through(&tint.conn, window)?;

        tint.conn.map_window(window).map_err(other)?;
        tint.conn.flush().map_err(other)?;

        tracing::info!(
            width = info.width,
            height = info.height,
            color = %color,
            "Overlay window mapped"
        );
        Ok(tint)
    }

    /// Set EWMH hints for overlay behavior
    fn setup_window_hints(&self, atoms: &AtomCollection, title: &str) -> Result<(), PlatformError> {
        x11::set_title(&self.conn, self.window, atoms, title)?;

        // Window state: full screen, above, skip taskbar/pager
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                atoms._NET_WM_STATE,
                atoms.ATOM,
                &[
                    atoms._NET_WM_STATE_FULLSCREEN,
                    atoms._NET_WM_STATE_ABOVE,
                    atoms._NET_WM_STATE_SKIP_TASKBAR,
                    atoms._NET_WM_STATE_SKIP_PAGER,
                ],
            )
            .map_err(other)?;

        Ok(())
    }

    pub fn screen(&self) -> ScreenInfo {
        self.screen
    }

    pub fn color(&self) -> Argb {
        self.color
    }

    /// Repaint the overlay with a new (straight-alpha) ARGB color
    pub fn set_color(&mut self, color: Argb) -> Result<(), PlatformError> {
        self.conn
            .change_window_attributes(
                self.window,
                &ChangeWindowAttributesAux::new().background_pixel(color.premultiplied().0),
            )
            .map_err(other)?;
        self.conn
            .clear_area(false, self.window, 0, 0, 0, 0)
            .map_err(other)?;
        self.conn.flush().map_err(other)?;
        self.color = color;
        Ok(())
    }
}

impl Drop for TintWindow {
    fn drop(&mut self) {
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.free_colormap(self.colormap);
        let _ = self.conn.flush();
    }
}
