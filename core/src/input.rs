//! Pointer hit-testing and drag tracking
//!
//! A button press inside one of the three controls starts a drag on that
//! control; every following motion moves its cursor until the button is
//! released. Only one axis changes per event.

use crate::layout::Layout;

/// Which control currently owns pointer input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingSpectrum,
    DraggingValue,
    DraggingOpacity,
}

/// Pointer input in window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { x: i32, y: i32 },
    Motion { x: i32, y: i32 },
    Release,
}

/// Cursor coordinates of the three controls (window pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub spectrum_x: i32,
    pub spectrum_y: i32,
    pub opacity_x: i32,
    pub value_y: i32,
}

impl CursorState {
    /// Hue, saturation and value at 1/3, opacity track centered
    pub fn defaults(layout: &Layout) -> Self {
        let third = 1.0 / 3.0;
        Self {
            spectrum_x: layout.spectrum.x_at(third),
            // saturation grows upwards
            spectrum_y: layout.spectrum.y_at(1.0 - third),
            opacity_x: layout.opacity.x_at(0.5),
            value_y: layout.value.y_at(1.0 - third),
        }
    }

    /// Pull every coordinate into its control's bounds
    pub fn clamped(self, layout: &Layout) -> Self {
        Self {
            spectrum_x: layout.spectrum.clamp_x(self.spectrum_x),
            spectrum_y: layout.spectrum.clamp_y(self.spectrum_y),
            opacity_x: layout.opacity.clamp_x(self.opacity_x),
            value_y: layout.value.clamp_y(self.value_y),
        }
    }
}

/// The coordinate that an event moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorUpdate {
    Spectrum,
    Value,
    Opacity,
}

/// Drag state machine
#[derive(Debug, Default)]
pub struct InputState {
    drag: DragState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// Which control a press at (x, y) would grab; `Idle` if none
    pub fn hit_test(layout: &Layout, x: i32, y: i32) -> DragState {
        let value = &layout.value;
        if layout.spectrum.contains_strict(x, y) {
            DragState::DraggingSpectrum
        } else if x >= value.margin_x - value.cursor_size
            && x <= value.margin_x + value.width + value.cursor_size
            && y >= value.margin_y
            && y <= value.margin_y + value.height
        {
            DragState::DraggingValue
        } else if layout.opacity.hit(x, y) {
            DragState::DraggingOpacity
        } else {
            DragState::Idle
        }
    }

    /// Feed one pointer event, updating `cursors` for an active drag.
    ///
    /// Returns the control whose coordinate was written, if any.
    pub fn handle(
        &mut self,
        layout: &Layout,
        cursors: &mut CursorState,
        event: PointerEvent,
    ) -> Option<CursorUpdate> {
        let (x, y) = match event {
            PointerEvent::Release => {
                self.drag = DragState::Idle;
                return None;
            }
            PointerEvent::Press { x, y } => {
                match Self::hit_test(layout, x, y) {
                    DragState::Idle => return None,
                    hit => self.drag = hit,
                }
                (x, y)
            }
            PointerEvent::Motion { x, y } => (x, y),
        };

        match self.drag {
            DragState::Idle => None,
            DragState::DraggingSpectrum => {
                cursors.spectrum_x = layout.spectrum.clamp_x(x);
                cursors.spectrum_y = layout.spectrum.clamp_y(y);
                Some(CursorUpdate::Spectrum)
            }
            DragState::DraggingValue => {
                cursors.value_y = layout.value.clamp_y(y);
                Some(CursorUpdate::Value)
            }
            DragState::DraggingOpacity => {
                cursors.opacity_x = layout.opacity.clamp_x(x);
                Some(CursorUpdate::Opacity)
            }
        }
    }
}
