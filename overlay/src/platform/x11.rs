//! X11 helpers shared by the overlay and picker windows
//!
//! Uses XCB via x11rb. The overlay needs a compositor for its translucency;
//! the picker works on any true-color display.

use std::fs::File;
use std::os::fd::AsFd;

use rustix::fs::{MemfdFlags, memfd_create};
use rustix::mm::{MapFlags, ProtFlags, mmap};
use screen_overlay_core::Argb;
use x11rb::atom_manager;
use x11rb::connection::Connection;
use x11rb::protocol::shape::{self, ConnectionExt as _};
use x11rb::protocol::shm::{self, ConnectionExt as _};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use super::{PlatformError, ScreenInfo, other};

// Atoms needed for ICCCM/EWMH hints
atom_manager! {
    pub AtomCollection: AtomCollectionCookie {
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        _NET_WM_NAME,
        _NET_WM_ICON,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_FULLSCREEN,
        _NET_WM_STATE_SKIP_TASKBAR,
        _NET_WM_STATE_SKIP_PAGER,
        UTF8_STRING,
        CARDINAL,
        ATOM,
    }
}

/// `_NET_WM_STATE` client message action
const NET_WM_STATE_ADD: u32 = 1;

/// ICCCM `WM_SIZE_HINTS` flags
const P_MIN_SIZE: u32 = 1 << 4;
const P_MAX_SIZE: u32 = 1 << 5;
const SIZE_HINTS_LEN: usize = 18;

// ─────────────────────────────────────────────────────────────────────────────
// Connection
// ─────────────────────────────────────────────────────────────────────────────

/// Open the default display and intern the atoms both windows use
pub(crate) fn connect() -> Result<(RustConnection, usize, AtomCollection), PlatformError> {
    let (conn, screen_num) =
        x11rb::connect(None).map_err(|e| PlatformError::ConnectionFailed(e.to_string()))?;

    let atoms = AtomCollection::new(&conn)
        .map_err(other)?
        .reply()
        .map_err(other)?;

    Ok((conn, screen_num, atoms))
}

pub(crate) fn screen_info(screen: &Screen) -> ScreenInfo {
    ScreenInfo {
        width: screen.width_in_pixels as u32,
        height: screen.height_in_pixels as u32,
    }
}

pub(crate) fn require_shape(conn: &RustConnection) -> Result<(), PlatformError> {
    conn.shape_query_version()
        .map_err(|_| PlatformError::UnsupportedFeature("Shape extension".into()))?
        .reply()
        .map_err(|_| PlatformError::UnsupportedFeature("Shape extension".into()))?;
    Ok(())
}

pub(crate) fn require_shm(conn: &RustConnection) -> Result<(), PlatformError> {
    conn.shm_query_version()
        .map_err(|_| PlatformError::UnsupportedFeature("SHM extension".into()))?
        .reply()
        .map_err(|_| PlatformError::UnsupportedFeature("SHM extension".into()))?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Visuals
// ─────────────────────────────────────────────────────────────────────────────

/// Find a 32-bit ARGB visual for transparency
pub(crate) fn find_argb_visual(screen: &Screen) -> Option<(Visualid, u8)> {
    for depth in &screen.allowed_depths {
        if depth.depth == 32 {
            for visual in &depth.visuals {
                if visual.class == VisualClass::TRUE_COLOR {
                    return Some((visual.visual_id, depth.depth));
                }
            }
        }
    }
    None
}

/// The root visual, provided it is at least 24-bit true color
pub(crate) fn find_true_color_root(screen: &Screen) -> Option<(Visualid, u8)> {
    screen
        .allowed_depths
        .iter()
        .filter(|d| d.depth == screen.root_depth && d.depth >= 24)
        .flat_map(|d| d.visuals.iter().map(move |v| (v, d.depth)))
        .find(|(v, _)| v.visual_id == screen.root_visual && v.class == VisualClass::TRUE_COLOR)
        .map(|(v, depth)| (v.visual_id, depth))
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared memory
// ─────────────────────────────────────────────────────────────────────────────

/// SHM buffer for efficient pixel transfer
pub(crate) struct ShmBuffer {
    pub seg_id: shm::Seg,
    ptr: *mut u8,
    size: usize,
}

impl ShmBuffer {
    /// Create a shared memory buffer for a `width × height` 32bpp image
    pub fn create(conn: &RustConnection, width: u32, height: u32) -> Result<Self, PlatformError> {
        let size = (width * height * 4) as usize;

        let fd = memfd_create(c"screen-overlay-buffer", MemfdFlags::CLOEXEC)
            .map_err(|e| PlatformError::BufferError(format!("memfd_create failed: {}", e)))?;

        rustix::fs::ftruncate(&fd, size as u64)
            .map_err(|e| PlatformError::BufferError(format!("ftruncate failed: {}", e)))?;

        let ptr = unsafe {
            mmap(
                std::ptr::null_mut(),
                size,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                fd.as_fd(),
                0,
            )
            .map_err(|e| PlatformError::BufferError(format!("mmap failed: {}", e)))?
        };

        let seg_id = conn
            .generate_id()
            .map_err(|e| PlatformError::BufferError(e.to_string()))?;

        // x11rb shm_attach_fd takes ownership of the fd
        let file = File::from(fd);
        conn.shm_attach_fd(seg_id, file, false)
            .map_err(|e| PlatformError::BufferError(format!("shm_attach_fd failed: {}", e)))?;

        Ok(Self {
            seg_id,
            ptr: ptr as *mut u8,
            size,
        })
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.size) }
    }

    /// Detach from the server and unmap
    pub fn release(&mut self, conn: &RustConnection) {
        let _ = conn.shm_detach(self.seg_id);
        unsafe {
            rustix::mm::munmap(self.ptr as *mut _, self.size).ok();
        }
        self.size = 0;
    }
}

/// Convert RGBA rows into the server's BGRA byte order
pub(crate) fn rgba_to_bgra(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        d[0] = s[2];
        d[1] = s[1];
        d[2] = s[0];
        d[3] = s[3];
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window properties
// ─────────────────────────────────────────────────────────────────────────────

/// `WM_NORMAL_HINTS` pinning the window to one size
pub(crate) fn fixed_size_hints(width: u32, height: u32) -> [u32; SIZE_HINTS_LEN] {
    let mut hints = [0u32; SIZE_HINTS_LEN];
    hints[0] = P_MIN_SIZE | P_MAX_SIZE;
    hints[5] = width;
    hints[6] = height;
    hints[7] = width;
    hints[8] = height;
    hints
}

/// `_NET_WM_ICON` payload: width, height, then ARGB pixels row by row
pub(crate) fn icon_property(size: u32, pixels: &[Argb]) -> Vec<u32> {
    let mut data = Vec::with_capacity(2 + pixels.len());
    data.push(size);
    data.push(size);
    data.extend(pixels.iter().map(|p| p.0));
    data
}

pub(crate) fn set_title(
    conn: &RustConnection,
    window: Window,
    atoms: &AtomCollection,
    title: &str,
) -> Result<(), PlatformError> {
    conn.change_property8(
        PropMode::REPLACE,
        window,
        AtomEnum::WM_NAME,
        AtomEnum::STRING,
        title.as_bytes(),
    )
    .map_err(other)?;
    conn.change_property8(
        PropMode::REPLACE,
        window,
        atoms._NET_WM_NAME,
        atoms.UTF8_STRING,
        title.as_bytes(),
    )
    .map_err(other)?;
    Ok(())
}

/// Ask the window manager to add one `_NET_WM_STATE` flag to a mapped window
pub(crate) fn add_wm_state(
    conn: &RustConnection,
    root: Window,
    window: Window,
    atoms: &AtomCollection,
    state: Atom,
) -> Result<(), PlatformError> {
    let event = ClientMessageEvent::new(
        32,
        window,
        atoms._NET_WM_STATE,
        [NET_WM_STATE_ADD, state, 0, 0, 0],
    );
    conn.send_event(
        false,
        root,
        EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
        event,
    )
    .map_err(other)?;
    Ok(())
}

/// Empty input region: pointer events fall through to windows below
pub(crate) fn pass_input_through(
    conn: &RustConnection,
    window: Window,
) -> Result<(), PlatformError> {
    conn.shape_rectangles(
        shape::SO::SET,
        shape::SK::INPUT,
        ClipOrdering::UNSORTED,
        window,
        0,
        0,
        &[],
    )
    .map_err(other)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use screen_overlay_core::Rgb;

    #[test]
    fn test_fixed_size_hints() {
        let hints = fixed_size_hints(506, 562);
        assert_eq!(hints.len(), 18);
        assert_eq!(hints[0], 0x30);
        assert_eq!(&hints[5..9], &[506, 562, 506, 562]);
        assert!(hints[1..5].iter().all(|&v| v == 0));
        assert!(hints[9..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_icon_property_header() {
        let pixels = vec![Argb::new(255, Rgb::new(1, 2, 3)); 4];
        let data = icon_property(2, &pixels);
        assert_eq!(data, vec![2, 2, 0xFF01_0203, 0xFF01_0203, 0xFF01_0203, 0xFF01_0203]);
    }

    #[test]
    fn test_rgba_to_bgra() {
        let src = [1, 2, 3, 4, 10, 20, 30, 40];
        let mut dst = [0u8; 8];
        rgba_to_bgra(&src, &mut dst);
        assert_eq!(dst, [3, 2, 1, 4, 30, 20, 10, 40]);
    }

    #[test]
    fn test_rgba_to_bgra_stops_at_shorter_buffer() {
        let src = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 4];
        rgba_to_bgra(&src, &mut dst);
        assert_eq!(dst, [3, 2, 1, 4]);
    }
}
