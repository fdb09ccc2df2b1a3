//=========================================================================
// Viewer Constants
//=========================================================================
//
// Shared limits and defaults for coordinates, field of view and camera
// lens values. Pointer coordinates are expressed in degrees
// (longitude / latitude), orientation in radians.
//
//=========================================================================

//=== Field of View =======================================================

/// Field of view applied on ready when the options do not provide one.
pub const DEFAULT_FOV: f32 = 90.0;

/// Lower bound for wheel-driven field of view changes.
pub const MIN_WHEEL_DISTANCE: f32 = 5.0;

/// Upper bound for wheel-driven field of view changes.
pub const MAX_WHEEL_DISTANCE: f32 = 500.0;

/// Default multiplier applied to wheel deltas.
pub const DEFAULT_SCROLL_VELOCITY: f32 = 0.09;

//=== Pointer Coordinates =================================================

pub const MIN_X_COORDINATE: f32 = 0.0;
pub const MAX_X_COORDINATE: f32 = 360.0;
pub const MIN_Y_COORDINATE: f32 = -85.0;
pub const MAX_Y_COORDINATE: f32 = 85.0;

/// Coordinates pinned by refresh while a non-panoramic projection is active.
pub const FLAT_POINTER_X: f32 = 90.0;
pub const FLAT_POINTER_Y: f32 = 0.0;

/// Pointer units applied per keyboard step.
pub const DEFAULT_KEYBOARD_STEP: f32 = 4.0;

//=== Camera Lens =========================================================

pub const DEFAULT_CAMERA_LENS_VALUE: f32 = 35.0;
pub const TINY_PLANET_CAMERA_LENS_VALUE: f32 = 7.5;

/// Widest field of view the tiny planet projection will request.
pub const MAX_TINY_PLANET_FOV: f32 = 130.0;

/// Widest field of view the fisheye projection will request.
pub const MAX_FISHEYE_FOV: f32 = 120.0;
