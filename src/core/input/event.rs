//=========================================================================
// Input Event Types
//
// Defines the viewer's representation of low-level pointer, touch,
// wheel and keyboard input.
//
// Input collaborators (the winit adapter in `platform`, or any host
// integration) translate their native events into `InputEvent`s. The
// viewer only ever sees page-space positions and deltas, never device
// handles.
//
// Event Flow:
// ```text
// Host / Platform Layer
//         ↓
//    InputEvent (this module)
//         ↓
//    Viewer::handle_input
//         ↓
//    CoordinateMapper → StateStore
// ```
//
//=========================================================================

//=== External Crates =====================================================

use serde::{Deserialize, Serialize};

//=== KeyCode =============================================================

/// Physical keys the viewer reacts to.
///
/// Arrow keys and the `h`/`j`/`k`/`l` cluster move the view. Everything
/// else maps to `Unidentified` and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    //--- Arrow Keys -------------------------------------------------------
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    //--- Vi-style Navigation ----------------------------------------------
    KeyH,
    KeyJ,
    KeyK,
    KeyL,

    /// Fallback for keys not mapped by the input layer.
    Unidentified,
}

impl KeyCode {
    /// Keys that pan horizontally.
    pub const HORIZONTAL: [KeyCode; 4] = [
        KeyCode::ArrowLeft,
        KeyCode::ArrowRight,
        KeyCode::KeyH,
        KeyCode::KeyL,
    ];

    /// Keys that pan vertically.
    pub const VERTICAL: [KeyCode; 4] = [
        KeyCode::ArrowUp,
        KeyCode::ArrowDown,
        KeyCode::KeyK,
        KeyCode::KeyJ,
    ];
}

//=== WheelDelta ==========================================================

/// Scroll wheel payload.
///
/// Hosts report wheel movement in one of three conventions. `DeltaY` and
/// `Legacy` shrink the field of view for positive values, `Detail` grows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    /// Vertical delta in wheel units (120 per notch).
    DeltaY(f32),

    /// Single-axis delta reported by older hosts.
    Legacy(f32),

    /// Line-based detail count (positive = scroll down).
    Detail(f32),
}

//=== PointerDelta ========================================================

/// Raw movement since the last drag sample, in page units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDelta {
    pub dx: f32,
    pub dy: f32,
}

impl PointerDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

//=== InputEvent ==========================================================

/// Low-level input event delivered to the viewer.
///
/// Positions are page-space (`pageX`/`pageY` style); only their
/// differences matter to the coordinate model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    //--- Mouse ------------------------------------------------------------
    /// Primary button pressed at the given position.
    PointerDown { x: f32, y: f32 },

    /// Cursor moved. Ignored unless the primary button is held.
    PointerMoved { x: f32, y: f32 },

    /// Primary button released.
    PointerUp,

    /// Cursor left the viewport; ends any drag.
    PointerLeave,

    //--- Touch ------------------------------------------------------------
    /// First touch began at the given position.
    TouchStart { x: f32, y: f32 },

    /// Touch moved. Only single-finger moves drag the view.
    TouchMoved { x: f32, y: f32, touches: usize },

    /// Touch ended or was cancelled.
    TouchEnd,

    //--- Wheel / Keyboard -------------------------------------------------
    Wheel(WheelDelta),
    KeyDown(KeyCode),
    KeyUp(KeyCode),

    //--- Window -----------------------------------------------------------
    /// Host viewport changed size.
    Resized { width: f32, height: f32 },

    /// Host window lost focus; releases every held input.
    Blur,

    /// Unrecognized or unsupported event, silently ignored.
    Unidentified,
}

impl InputEvent {
    /// Returns `true` for events that begin or continue a drag gesture.
    pub fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::PointerDown { .. }
                | Self::PointerMoved { .. }
                | Self::TouchStart { .. }
                | Self::TouchMoved { .. }
        )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
