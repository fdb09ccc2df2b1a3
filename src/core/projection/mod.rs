//=========================================================================
// Projection System
//=========================================================================
//
// Named projection modes, the handler contract they implement and the
// registry that activates and animates them.
//
// Architecture:
//   ProjectionRegistry
//     ├─ handlers: HashMap<ProjectionKind, Box<dyn ProjectionHandler>>
//     ├─ current: Option<ProjectionKind>
//     └─ animation: AnimationController
//
// Flow:
//   apply(kind) → try_activate(ctx) ─ Err(reason) → scratch discarded
//                                   └ Ok        → policy committed,
//                                                 animation (re)started
//   tick()      → ProjectionHandler::tick(ctx) → Continue | Done
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::geometry::GeometryKind;
use crate::core::render::{CameraRig, RenderBackend};
use crate::core::state::{AccessPolicy, StateStore, StateUpdate};

//=== Module Declarations =================================================

pub mod animation;
mod equilinear;
mod fisheye;
mod flat;
mod registry;
mod tinyplanet;

//=== Public API ==========================================================

pub use animation::{AnimationController, AnimationHandle};
pub use equilinear::Equilinear;
pub use fisheye::Fisheye;
pub use flat::Flat;
pub use registry::ProjectionRegistry;
pub use tinyplanet::TinyPlanet;

//=== ProjectionKind ======================================================

/// Identifies a projection mode.
///
/// Names are normalized (lowercased, whitespace removed) before lookup,
/// so `"Tiny Planet"` and `"tinyplanet"` name the same mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    Flat,
    Fisheye,
    Equilinear,
    TinyPlanet,
    Custom(String),
}

impl ProjectionKind {
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "flat" => Self::Flat,
            "fisheye" => Self::Fisheye,
            "equilinear" => Self::Equilinear,
            "tinyplanet" => Self::TinyPlanet,
            _ => Self::Custom(normalized),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Flat => "flat",
            Self::Fisheye => "fisheye",
            Self::Equilinear => "equilinear",
            Self::TinyPlanet => "tinyplanet",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for ProjectionKind {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

//=== Activation Results ==================================================

/// Successful outcome of a projection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The projection is current and fully applied.
    Active,

    /// The projection is current and its animation is running.
    Animating,

    /// The viewer is not ready; the request is held until it is.
    Deferred,
}

/// Why a projection request was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotApplicable {
    Unregistered,
    AlreadyActive,
    NotReady,
    CameraMissing,
    UnsupportedGeometry(GeometryKind),
}

impl fmt::Display for NotApplicable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unregistered => write!(f, "Projection is not registered"),
            Self::AlreadyActive => write!(f, "Projection is already active"),
            Self::NotReady => write!(f, "Viewer is not ready"),
            Self::CameraMissing => write!(f, "No camera is available"),
            Self::UnsupportedGeometry(kind) => {
                write!(f, "Projection does not support {} geometry", kind)
            }
        }
    }
}

impl std::error::Error for NotApplicable {}

/// Result of one animation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    Continue,
    Done,
}

//=== ProjectionHandler ===================================================

/// Behaviour of a single projection mode.
///
/// `try_activate` either vetoes with a [`NotApplicable`] reason or
/// configures the context: constraints, lens, field of view and an
/// optional animation request. Vetoes must be decided before any state
/// is written.
///
/// ```rust
/// # use panoview::prelude::*;
/// struct Locked;
///
/// impl ProjectionHandler for Locked {
///     fn try_activate(&mut self, ctx: &mut ProjectionContext<'_>) -> Result<(), NotApplicable> {
///         ctx.require_camera()?;
///         ctx.set_constraints(AccessPolicy::unrestricted().lock_x(true).lock_y(true));
///         Ok(())
///     }
/// }
/// ```
pub trait ProjectionHandler {
    /// Applies the projection or explains why it cannot.
    fn try_activate(&mut self, ctx: &mut ProjectionContext<'_>) -> Result<(), NotApplicable>;

    /// Advances a running animation by one frame.
    ///
    /// Default implementation finishes immediately.
    fn tick(&mut self, _ctx: &mut ProjectionContext<'_>) -> AnimationStatus {
        AnimationStatus::Done
    }
}

//=== ProjectionScope =====================================================

/// Borrowed viewer resources a projection operates on.
pub struct ProjectionScope<'a> {
    pub state: &'a mut StateStore,
    pub camera: Option<&'a mut CameraRig>,
    pub backend: &'a mut dyn RenderBackend,
}

//=== ProjectionContext ===================================================

/// Working set handed to a [`ProjectionHandler`].
///
/// During activation the constraints start out unrestricted and only
/// reach the state store if the handler succeeds. During a tick they
/// start from the installed policy and are written back afterwards.
pub struct ProjectionContext<'a> {
    pub state: &'a mut StateStore,
    camera: Option<&'a mut CameraRig>,
    backend: &'a mut dyn RenderBackend,
    current: Option<ProjectionKind>,
    constraints: AccessPolicy,
    animate: bool,
}

impl<'a> ProjectionContext<'a> {
    pub(crate) fn new(
        scope: ProjectionScope<'a>,
        current: Option<ProjectionKind>,
        constraints: AccessPolicy,
    ) -> Self {
        Self {
            state: scope.state,
            camera: scope.camera,
            backend: scope.backend,
            current,
            constraints,
            animate: false,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Projection that was current when this context was built.
    pub fn current(&self) -> Option<&ProjectionKind> {
        self.current.as_ref()
    }

    pub fn constraints(&self) -> &AccessPolicy {
        &self.constraints
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    /// Fails with [`NotApplicable::CameraMissing`] when no camera exists.
    pub fn require_camera(&self) -> Result<(), NotApplicable> {
        if self.has_camera() {
            Ok(())
        } else {
            Err(NotApplicable::CameraMissing)
        }
    }

    /// Current camera target, if a camera exists.
    pub fn camera_target(&self) -> Option<Vec3> {
        self.camera.as_deref().map(CameraRig::target)
    }

    /// Field of view the camera currently renders with.
    pub fn camera_fov(&self) -> Option<f32> {
        self.camera.as_deref().map(CameraRig::fov)
    }

    //--- Configuration ----------------------------------------------------

    pub fn set_constraints(&mut self, policy: AccessPolicy) {
        self.constraints = policy;
    }

    pub fn constraints_mut(&mut self) -> &mut AccessPolicy {
        &mut self.constraints
    }

    /// Asks the registry to run this handler's `tick` every frame.
    pub fn request_animation(&mut self) {
        self.animate = true;
    }

    //--- Camera Commands --------------------------------------------------

    pub fn set_lens(&mut self, lens: f32) {
        if let Some(camera) = self.camera.as_deref_mut() {
            camera.set_lens(&mut *self.backend, lens);
        }
    }

    /// Stores `fov` and forwards it to the camera.
    pub fn set_fov(&mut self, fov: f32) {
        if !self.state.update(StateUpdate::Fov(fov)) {
            return;
        }
        self.set_camera_fov(fov);
    }

    /// Changes only what the camera renders; the stored fov is untouched.
    pub fn set_camera_fov(&mut self, fov: f32) {
        if let Some(camera) = self.camera.as_deref_mut() {
            camera.set_focal_length(&mut *self.backend, fov);
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        if let Some(camera) = self.camera.as_deref_mut() {
            camera.look_at(&mut *self.backend, target);
        }
    }

    //--- Outcome ----------------------------------------------------------

    pub(crate) fn into_outcome(self) -> (&'a mut StateStore, AccessPolicy, bool) {
        (self.state, self.constraints, self.animate)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        assert_eq!(ProjectionKind::from_name("Tiny Planet"), ProjectionKind::TinyPlanet);
        assert_eq!(ProjectionKind::from_name(" FLAT "), ProjectionKind::Flat);
        assert_eq!(ProjectionKind::from("fishEye"), ProjectionKind::Fisheye);
        assert_eq!(
            ProjectionKind::from_name("Little Star"),
            ProjectionKind::Custom("littlestar".to_string())
        );
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(ProjectionKind::TinyPlanet.to_string(), "tinyplanet");
        assert_eq!(ProjectionKind::Custom("mirror".into()).to_string(), "mirror");
    }

    #[test]
    fn veto_reasons_are_distinguishable() {
        let reasons = [
            NotApplicable::Unregistered,
            NotApplicable::AlreadyActive,
            NotApplicable::NotReady,
            NotApplicable::CameraMissing,
            NotApplicable::UnsupportedGeometry(GeometryKind::Cylinder),
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in &reasons[i + 1..] {
                assert_ne!(a, b);
                assert_ne!(a.to_string(), b.to_string());
            }
        }
    }
}
