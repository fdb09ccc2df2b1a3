//=========================================================================
// Input Contract
//
// Portable input vocabulary shared by every input collaborator.
//
// Responsibilities:
// - Describe pointer, touch, wheel and keyboard input independent of the
//   host windowing system
// - Carry raw page-space positions; the coordinate mapper turns them
//   into pointer coordinate deltas
//
// Notes:
// Device controllers (mouse, touch, keyboard, device orientation, VR)
// live outside this crate. They only have to produce `InputEvent`s.
//
//=========================================================================

//=== Submodules ==========================================================
pub mod event;

//=== Public API ==========================================================
pub use event::{InputEvent, KeyCode, PointerDelta, WheelDelta};
