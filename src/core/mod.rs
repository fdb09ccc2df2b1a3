//=========================================================================
// Core Systems
//=========================================================================
//
// Rendering-agnostic machinery of the viewer.
//
// Architecture:
//   state       → constrained store every subsystem reads and writes
//   projection  → registry, activation protocol, built-in modes
//   coords      → input deltas → pointer coordinates → look direction
//   geometry    → mesh shape selection from media aspect ratio
//   input       → platform-neutral input events
//   render      → backend contract and camera rig
//
// Nothing in here owns a window or a GPU resource; the `viewer` module
// wires these pieces to a `RenderBackend`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod constants;
pub mod coords;
pub mod geometry;
pub mod input;
pub mod projection;
pub mod render;
pub mod state;

//=== Public API ==========================================================

pub use geometry::{GeometryKind, MediaDimensions, MeshDescriptor};
pub use input::{InputEvent, KeyCode, PointerDelta, WheelDelta};
pub use projection::{
    Activation, AnimationStatus, NotApplicable, ProjectionContext, ProjectionHandler,
    ProjectionKind, ProjectionRegistry,
};
pub use render::{CameraRig, MeshHandle, RenderBackend};
pub use state::{AccessPolicy, Orientation, PointerCoordinates, StateCache, StateStore};
