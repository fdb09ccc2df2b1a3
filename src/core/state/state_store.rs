//=========================================================================
// State Store
//=========================================================================
//
// Single owner of all mutable viewer state.
//
// Architecture:
//   writers (mouse, touch, keyboard, VR, resize, animation)
//        ↓
//   update(StateUpdate) ── AccessPolicy gate ──→ fields
//        ↓
//   readers (refresh, camera positioning, projections)
//
// Writes that a constraint forbids are accepted and dropped; nothing in
// here panics or reports an error. Events are emitted by callers after a
// successful logical operation, never by the store itself.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::access_policy::{AccessPolicy, Constraint};
use super::rotation::Rotations;
use crate::core::constants::{
    DEFAULT_KEYBOARD_STEP, DEFAULT_SCROLL_VELOCITY, FLAT_POINTER_X, FLAT_POINTER_Y,
    MAX_X_COORDINATE, MAX_Y_COORDINATE, MIN_X_COORDINATE, MIN_Y_COORDINATE,
};
use crate::core::geometry::GeometryKind;
use crate::core::input::KeyCode;
use crate::core::projection::ProjectionKind;

//=== Value Types =========================================================

/// Logical look direction in radians.
///
/// `x` is a yaw offset, `y` the polar angle from the up axis
/// (`π/2` looks at the horizon).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
}

impl Orientation {
    /// Facing the horizon with no yaw offset.
    pub const HORIZON: Self = Self { x: 0.0, y: FRAC_PI_2 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Accumulated pointer coordinates in degrees (longitude / latitude).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerCoordinates {
    pub pointer_x: f32,
    pub pointer_y: f32,
}

impl PointerCoordinates {
    pub fn new(pointer_x: f32, pointer_y: f32) -> Self {
        Self { pointer_x, pointer_y }
    }
}

/// Advisory cache merged field by field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateCache {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer_y: Option<f32>,
}

impl StateCache {
    /// Overwrites every field present in `other`.
    pub fn merge(&mut self, other: StateCache) {
        if other.pointer_x.is_some() {
            self.pointer_x = other.pointer_x;
        }
        if other.pointer_y.is_some() {
            self.pointer_y = other.pointer_y;
        }
    }
}

impl From<PointerCoordinates> for StateCache {
    fn from(coords: PointerCoordinates) -> Self {
        Self {
            pointer_x: Some(coords.pointer_x),
            pointer_y: Some(coords.pointer_y),
        }
    }
}

/// Viewport size in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

//=== StateConfig =========================================================

/// Construction-time defaults restored by [`StateStore::reset`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateConfig {
    pub inverted: bool,
    pub allow_wheel: bool,
    pub resizable: bool,
    pub cube_map: bool,
    pub image: bool,
    pub scroll_velocity: f32,
    pub keyboard_step: f32,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            inverted: false,
            allow_wheel: true,
            resizable: true,
            cube_map: false,
            image: false,
            scroll_velocity: DEFAULT_SCROLL_VELOCITY,
            keyboard_step: DEFAULT_KEYBOARD_STEP,
        }
    }
}

//=== StateUpdate =========================================================

/// A single write routed through [`StateStore::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateUpdate {
    //--- Coordinates ------------------------------------------------------
    PointerX(f32),
    PointerY(f32),
    Orientation(Orientation),
    DragStart(Vec2),

    //--- Camera -----------------------------------------------------------
    Fov(f32),
    OriginalFov(f32),
    ScrollVelocity(f32),
    Radius(f32),

    //--- Layout -----------------------------------------------------------
    Size(ViewportSize),
    Geometry(Option<GeometryKind>),

    //--- Flags ------------------------------------------------------------
    Ready(bool),
    Mousedown(bool),
    Touching(bool),
    Animating(bool),
    Focused(bool),
    Fullscreen(bool),
    Resizable(bool),
    VrEnabled(bool),
    Inverted(bool),
    AllowWheel(bool),
    ShouldUpdate(bool),
}

//=== StateStore ==========================================================

/// Constrained, observable store for every piece of viewer state.
pub struct StateStore {
    config: StateConfig,
    policy: AccessPolicy,

    //--- Coordinates ------------------------------------------------------
    pointer: PointerCoordinates,
    orientation: Orientation,
    dragstart: Vec2,
    cache: StateCache,

    //--- Camera -----------------------------------------------------------
    fov: Option<f32>,
    original_fov: Option<f32>,
    scroll_velocity: f32,
    radius: f32,

    //--- Layout -----------------------------------------------------------
    size: ViewportSize,
    original_size: Option<ViewportSize>,
    geometry: Option<GeometryKind>,
    requested_projection: Option<ProjectionKind>,

    //--- Input ------------------------------------------------------------
    keys_down: HashSet<KeyCode>,
    rotations: Rotations,

    //--- Flags ------------------------------------------------------------
    is_ready: bool,
    is_mousedown: bool,
    is_touching: bool,
    is_animating: bool,
    is_focused: bool,
    is_fullscreen: bool,
    is_resizable: bool,
    is_vr_enabled: bool,
    is_inverted: bool,
    allow_wheel: bool,
    should_update: bool,
}

impl StateStore {
    //--- Construction -----------------------------------------------------

    pub fn new(config: StateConfig) -> Self {
        Self {
            config,
            policy: AccessPolicy::unrestricted(),
            pointer: PointerCoordinates::default(),
            orientation: Orientation::default(),
            dragstart: Vec2::ZERO,
            cache: StateCache::default(),
            fov: None,
            original_fov: None,
            scroll_velocity: config.scroll_velocity,
            radius: 0.0,
            size: ViewportSize::default(),
            original_size: None,
            geometry: None,
            requested_projection: None,
            keys_down: HashSet::new(),
            rotations: Rotations::default(),
            is_ready: false,
            is_mousedown: false,
            is_touching: false,
            is_animating: false,
            is_focused: false,
            is_fullscreen: false,
            is_resizable: config.resizable,
            is_vr_enabled: false,
            is_inverted: config.inverted,
            allow_wheel: config.allow_wheel,
            should_update: true,
        }
    }

    /// Restores every field to its construction-time default.
    ///
    /// Clears the cache, the access policy and any interval rotation.
    pub fn reset(&mut self) {
        debug!("Resetting state store");
        *self = Self::new(self.config);
    }

    //--- Writes -----------------------------------------------------------

    /// Applies `update` unless the access policy or a non-finite value
    /// rejects it. Returns whether the write took effect.
    pub fn update(&mut self, update: StateUpdate) -> bool {
        match update {
            StateUpdate::PointerX(x) => {
                if self.policy.is_constrained_with(Constraint::AxisX) {
                    trace!("pointer_x write dropped: axis locked");
                    return false;
                }
                Self::write_finite(&mut self.pointer.pointer_x, x, "pointer_x")
            }
            StateUpdate::PointerY(y) => {
                if self.policy.is_constrained_with(Constraint::AxisY) {
                    trace!("pointer_y write dropped: axis locked");
                    return false;
                }
                Self::write_finite(&mut self.pointer.pointer_y, y, "pointer_y")
            }
            StateUpdate::Orientation(orientation) => {
                if !orientation.is_finite() {
                    debug!("Ignoring non-finite orientation {:?}", orientation);
                    return false;
                }
                self.orientation = orientation;
                true
            }
            StateUpdate::DragStart(position) => {
                if !position.is_finite() {
                    return false;
                }
                self.dragstart = position;
                true
            }
            StateUpdate::Fov(fov) => {
                if !fov.is_finite() {
                    debug!("Ignoring non-finite fov {}", fov);
                    return false;
                }
                self.fov = Some(fov);
                true
            }
            StateUpdate::OriginalFov(fov) => {
                if !fov.is_finite() {
                    return false;
                }
                self.original_fov = Some(fov);
                true
            }
            StateUpdate::ScrollVelocity(velocity) => {
                Self::write_finite(&mut self.scroll_velocity, velocity, "scroll_velocity")
            }
            StateUpdate::Radius(radius) => Self::write_finite(&mut self.radius, radius, "radius"),
            StateUpdate::Size(size) => {
                if !(size.width.is_finite() && size.height.is_finite()) {
                    return false;
                }
                self.size = size;
                if self.original_size.is_none() {
                    self.original_size = Some(size);
                }
                true
            }
            StateUpdate::Geometry(kind) => {
                self.geometry = kind;
                true
            }
            StateUpdate::Ready(value) => Self::write_flag(&mut self.is_ready, value),
            StateUpdate::Mousedown(value) => Self::write_flag(&mut self.is_mousedown, value),
            StateUpdate::Touching(value) => Self::write_flag(&mut self.is_touching, value),
            StateUpdate::Animating(value) => Self::write_flag(&mut self.is_animating, value),
            StateUpdate::Focused(value) => Self::write_flag(&mut self.is_focused, value),
            StateUpdate::Fullscreen(value) => Self::write_flag(&mut self.is_fullscreen, value),
            StateUpdate::Resizable(value) => Self::write_flag(&mut self.is_resizable, value),
            StateUpdate::VrEnabled(value) => Self::write_flag(&mut self.is_vr_enabled, value),
            StateUpdate::Inverted(value) => Self::write_flag(&mut self.is_inverted, value),
            StateUpdate::AllowWheel(value) => Self::write_flag(&mut self.allow_wheel, value),
            StateUpdate::ShouldUpdate(value) => Self::write_flag(&mut self.should_update, value),
        }
    }

    /// Merges `cache` unless the cache is constrained.
    pub fn merge_cache(&mut self, cache: StateCache) -> bool {
        if self.policy.is_constrained_with(Constraint::Cache) {
            trace!("cache merge dropped: cache locked");
            return false;
        }
        self.cache.merge(cache);
        true
    }

    /// Clamps `pointer_y` and wraps `pointer_x` into range.
    ///
    /// Refresh-cycle write; bypasses the axis locks.
    pub fn normalize_pointer(&mut self) {
        let PointerCoordinates { mut pointer_x, pointer_y } = self.pointer;

        let pointer_y = pointer_y.clamp(MIN_Y_COORDINATE, MAX_Y_COORDINATE);

        if pointer_x > MAX_X_COORDINATE {
            pointer_x -= MAX_X_COORDINATE;
        } else if pointer_x < MIN_X_COORDINATE {
            pointer_x += MAX_X_COORDINATE;
        }

        self.pointer = PointerCoordinates::new(pointer_x, pointer_y);
    }

    /// Pins the pointer to the flat-mode position.
    ///
    /// Refresh-cycle write; bypasses the axis locks.
    pub fn pin_pointer(&mut self) {
        self.pointer = PointerCoordinates::new(FLAT_POINTER_X, FLAT_POINTER_Y);
    }

    /// Installs the constraint set of the active projection.
    pub fn set_policy(&mut self, policy: AccessPolicy) {
        self.policy = policy;
    }

    pub(crate) fn set_requested_projection(&mut self, kind: Option<ProjectionKind>) {
        self.requested_projection = kind;
    }

    /// Records a key press. Returns `true` if the key was not already held.
    pub(crate) fn press_key(&mut self, key: KeyCode) -> bool {
        self.keys_down.insert(key)
    }

    pub(crate) fn release_key(&mut self, key: KeyCode) -> bool {
        self.keys_down.remove(&key)
    }

    /// Releases every held input (window blur).
    pub(crate) fn release_all(&mut self) {
        self.is_mousedown = false;
        self.is_touching = false;
        self.keys_down.clear();
    }

    pub(crate) fn rotations_mut(&mut self) -> &mut Rotations {
        &mut self.rotations
    }

    //--- Internal Helpers -------------------------------------------------

    fn write_finite(slot: &mut f32, value: f32, name: &str) -> bool {
        if !value.is_finite() {
            debug!("Ignoring non-finite {} write: {}", name, value);
            return false;
        }
        *slot = value;
        true
    }

    fn write_flag(slot: &mut bool, value: bool) -> bool {
        *slot = value;
        true
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns whether the installed policy asserts `constraint`.
    pub fn is_constrained_with(&self, constraint: Constraint) -> bool {
        self.policy.is_constrained_with(constraint)
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn coords(&self) -> PointerCoordinates {
        self.pointer
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn dragstart(&self) -> Vec2 {
        self.dragstart
    }

    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    pub fn fov(&self) -> Option<f32> {
        self.fov
    }

    pub fn original_fov(&self) -> Option<f32> {
        self.original_fov
    }

    pub fn scroll_velocity(&self) -> f32 {
        self.scroll_velocity
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn original_size(&self) -> Option<ViewportSize> {
        self.original_size
    }

    pub fn geometry(&self) -> Option<GeometryKind> {
        self.geometry
    }

    pub fn requested_projection(&self) -> Option<&ProjectionKind> {
        self.requested_projection.as_ref()
    }

    pub fn rotations(&self) -> &Rotations {
        &self.rotations
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_keydown(&self) -> bool {
        !self.keys_down.is_empty()
    }

    /// Returns `true` while any drag or key input is held.
    pub fn is_interacting(&self) -> bool {
        self.is_mousedown || self.is_touching || self.is_keydown()
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn is_image(&self) -> bool {
        self.config.image
    }

    pub fn is_mousedown(&self) -> bool {
        self.is_mousedown
    }

    pub fn is_touching(&self) -> bool {
        self.is_touching
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn is_resizable(&self) -> bool {
        self.is_resizable
    }

    pub fn is_vr_enabled(&self) -> bool {
        self.is_vr_enabled
    }

    pub fn is_inverted(&self) -> bool {
        self.is_inverted
    }

    pub fn allow_wheel(&self) -> bool {
        self.allow_wheel
    }

    pub fn should_update(&self) -> bool {
        self.should_update
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(StateConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
