//=========================================================================
// State System
//=========================================================================
//
// Mutable viewer state and the write constraints guarding it.
//
// Architecture:
//   StateStore
//     ├─ AccessPolicy (installed by the active projection)
//     ├─ PointerCoordinates / Orientation / StateCache
//     └─ Rotations (frame-clock auto rotation)
//
//=========================================================================

//=== Module Declarations =================================================

mod access_policy;
mod rotation;
mod state_store;

//=== Public API ==========================================================

pub use access_policy::{AccessPolicy, Constraint};
pub use rotation::{IntervalRotation, RotationAxis, RotationSpec, Rotations};
pub use state_store::{
    Orientation, PointerCoordinates, StateCache, StateConfig, StateStore, StateUpdate,
    ViewportSize,
};
