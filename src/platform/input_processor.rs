//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit window events into viewer InputEvents.
//
// Architecture:
//   WindowEvent → InputProcessor → InputEvent → Viewer::handle_input
//
// Stateful tracking: the last cursor position is cached so button
// presses carry a position (Winit reports them without one), and active
// touches are tracked by id so multi-touch gestures can be told apart from
// single-finger drags. Unmapped keys and buttons are filtered (None).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::trace;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, WheelDelta};
use crate::core::render::RenderBackend;
use crate::viewer::Viewer;

/// Browser-style wheel units per scrolled line.
const WHEEL_UNITS_PER_LINE: f32 = 120.0;

//=== InputProcessor ======================================================

/// Converts Winit events to viewer InputEvents with cursor and touch tracking.
#[derive(Debug, Default)]
pub struct InputProcessor {
    cursor: PhysicalPosition<f32>,
    touches: HashMap<u64, PhysicalPosition<f32>>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Converts `event` and forwards it to `viewer`.
    ///
    /// Returns whether the event was relevant to the viewer.
    pub fn dispatch<B: RenderBackend>(&mut self, event: &WindowEvent, viewer: &mut Viewer<B>) -> bool {
        match self.process_window_event(event) {
            Some(input) => {
                viewer.handle_input(input);
                true
            }
            None => false,
        }
    }

    /// Converts a Winit window event, or `None` if the viewer ignores it.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.process_mouse_move(position.x as f32, position.y as f32))
            }
            WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeave),
            WindowEvent::MouseInput { state, button, .. } => self.process_mouse_button(*button, *state),
            WindowEvent::MouseWheel { delta, .. } => Some(self.process_wheel(*delta)),
            WindowEvent::Touch(touch) => self.process_touch(
                touch.id,
                touch.phase,
                touch.location.x as f32,
                touch.location.y as f32,
            ),
            WindowEvent::KeyboardInput { event: key_event, .. } => self.process_key_event(key_event),
            WindowEvent::Focused(focused) => self.process_focus(*focused),
            WindowEvent::Resized(size) => Some(InputEvent::Resized {
                width: size.width as f32,
                height: size.height as f32,
            }),
            _ => None,
        }
    }

    //--- Pointer ----------------------------------------------------------

    /// Records the cursor position and reports the move.
    pub fn process_mouse_move(&mut self, x: f32, y: f32) -> InputEvent {
        self.cursor = PhysicalPosition::new(x, y);
        InputEvent::PointerMoved { x, y }
    }

    /// Left button only; the press is reported at the last cursor position.
    pub fn process_mouse_button(&self, button: MouseButton, state: ElementState) -> Option<InputEvent> {
        if button != MouseButton::Left {
            trace!(target: "platform", "Ignoring {:?} button", button);
            return None;
        }

        match state {
            ElementState::Pressed => Some(InputEvent::PointerDown {
                x: self.cursor.x,
                y: self.cursor.y,
            }),
            ElementState::Released => Some(InputEvent::PointerUp),
        }
    }

    /// Lines are scaled to browser wheel units; pixels pass through.
    pub fn process_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        let units = match delta {
            MouseScrollDelta::LineDelta(_, y) => y * WHEEL_UNITS_PER_LINE,
            MouseScrollDelta::PixelDelta(position) => position.y as f32,
        };
        InputEvent::Wheel(WheelDelta::DeltaY(units))
    }

    //--- Touch ------------------------------------------------------------

    /// Tracks touches by id; only the first finger starts a drag and only
    /// the last one lifted ends it. When a gesture drops back to a single
    /// finger, the drag restarts from that finger's position.
    pub fn process_touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) -> Option<InputEvent> {
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, PhysicalPosition::new(x, y));
                (self.touches.len() == 1).then_some(InputEvent::TouchStart { x, y })
            }
            TouchPhase::Moved => {
                self.touches.insert(id, PhysicalPosition::new(x, y));
                Some(InputEvent::TouchMoved {
                    x,
                    y,
                    touches: self.touches.len(),
                })
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id)?;
                match self.touches.len() {
                    0 => Some(InputEvent::TouchEnd),
                    1 => self.touches.values().next().map(|remaining| {
                        trace!(target: "platform", "Touch {} lifted, drag continues", id);
                        InputEvent::TouchStart {
                            x: remaining.x,
                            y: remaining.y,
                        }
                    }),
                    _ => None,
                }
            }
        }
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    //--- Keyboard / Focus -------------------------------------------------

    /// Converts a Winit key event (filters unmapped keys).
    pub fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let key = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        Self::key_input_event(key, key_event.state)
    }

    /// Losing focus releases held input; gaining it is not an input.
    pub fn process_focus(&mut self, focused: bool) -> Option<InputEvent> {
        if focused {
            return None;
        }
        self.touches.clear();
        Some(InputEvent::Blur)
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_input_event(key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }

        match state {
            ElementState::Pressed => Some(InputEvent::KeyDown(key)),
            ElementState::Released => Some(InputEvent::KeyUp(key)),
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to viewer navigation keys.
///
/// Arrows and h/j/k/l are mapped; every other key is `Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        match code {
            WinitKeyCode::ArrowUp => KeyCode::ArrowUp,
            WinitKeyCode::ArrowDown => KeyCode::ArrowDown,
            WinitKeyCode::ArrowLeft => KeyCode::ArrowLeft,
            WinitKeyCode::ArrowRight => KeyCode::ArrowRight,
            WinitKeyCode::KeyH => KeyCode::KeyH,
            WinitKeyCode::KeyJ => KeyCode::KeyJ,
            WinitKeyCode::KeyK => KeyCode::KeyK,
            WinitKeyCode::KeyL => KeyCode::KeyL,
            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
