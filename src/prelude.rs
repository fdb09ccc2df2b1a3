//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use panoview::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Viewer facade
pub use crate::viewer::{AutoRotation, ConfigError, Viewer, ViewerBuilder, ViewerEvent, ViewerOptions};

// Projections
pub use crate::core::projection::{
    Activation, AnimationStatus, NotApplicable, ProjectionContext, ProjectionHandler,
    ProjectionKind,
};

// State
pub use crate::core::state::{
    AccessPolicy, Orientation, PointerCoordinates, RotationAxis, RotationSpec, StateCache,
};

// Geometry and rendering
pub use crate::core::geometry::{GeometryKind, MediaDimensions, MeshDescriptor};
pub use crate::core::render::{CameraRig, MeshHandle, RenderBackend};

// Input
pub use crate::core::input::{InputEvent, KeyCode, PointerDelta, WheelDelta};
pub use crate::platform::InputProcessor;
