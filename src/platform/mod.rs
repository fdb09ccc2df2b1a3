//=========================================================================
// Platform Subsystem
//
// Bridges Winit window events into the viewer's platform-neutral input.
//
// Architecture:
// ```text
//  Host Event Loop (owns the window):
//  ┌──────────────────────────────┐
//  │  WindowEvent                 │
//  │   ↓                          │
//  │  InputProcessor              │
//  │   ├─ Converts Winit types    │
//  │   ├─ Tracks cursor position  │
//  │   └─ Counts active touches   │
//  │   ↓                          │
//  │  InputEvent                  │
//  │   ↓                          │
//  │  Viewer::handle_input        │
//  └──────────────────────────────┘
// ```
//
// The host keeps ownership of the event loop and the window; this module
// never creates either. Only the conversion layer depends on Winit, so
// `core` stays usable with any windowing backend.
//
//=========================================================================

//=== Module Declarations =================================================

mod input_processor;

//=== Public API ==========================================================

pub use input_processor::InputProcessor;
