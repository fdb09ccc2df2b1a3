//=========================================================================
// Tiny Planet Projection
//=========================================================================
//
// Looks straight down through a very short lens so a spherical panorama
// wraps into a small globe.
//
// Flow:
//   try_activate → vetoes (camera, ready, geometry, duplicate)
//                → y locked, horizontal keys locked, lens + fov
//   first tick   → camera pointed down, orientation pinned,
//                  axis locks swapped (x locked, y free) → Done
//
// Cylindrical media cannot wrap into a planet and is refused.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::PI;

use glam::Vec3;
use log::debug;

//=== Internal Dependencies ===============================================

use super::{AnimationStatus, NotApplicable, ProjectionContext, ProjectionHandler, ProjectionKind};
use crate::core::constants::{
    DEFAULT_FOV, MAX_TINY_PLANET_FOV, MIN_X_COORDINATE, TINY_PLANET_CAMERA_LENS_VALUE,
};
use crate::core::geometry::GeometryKind;
use crate::core::input::KeyCode;
use crate::core::state::{AccessPolicy, Orientation, StateUpdate};

/// Vertical component of the one-shot look target.
const PLANET_LOOK_Y: f32 = -180.0;

/// Widening applied to the original field of view.
const FOV_SCALE: f32 = 2.0;

//=== TinyPlanet ==========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct TinyPlanet;

impl ProjectionHandler for TinyPlanet {
    fn try_activate(&mut self, ctx: &mut ProjectionContext<'_>) -> Result<(), NotApplicable> {
        ctx.require_camera()?;

        if !ctx.state.is_ready() {
            return Err(NotApplicable::NotReady);
        }

        if ctx.state.geometry() == Some(GeometryKind::Cylinder) {
            return Err(NotApplicable::UnsupportedGeometry(GeometryKind::Cylinder));
        }

        if ctx.current() == Some(&ProjectionKind::TinyPlanet) {
            return Err(NotApplicable::AlreadyActive);
        }

        ctx.set_constraints(
            AccessPolicy::unrestricted()
                .lock_y(true)
                .lock_cache(true)
                .lock_keys(KeyCode::HORIZONTAL),
        );

        let original = ctx.state.original_fov().unwrap_or(DEFAULT_FOV);
        ctx.set_lens(TINY_PLANET_CAMERA_LENS_VALUE);
        ctx.set_fov((original * FOV_SCALE).min(MAX_TINY_PLANET_FOV));

        debug!(target: "projection", "Tiny planet animation begin");
        ctx.request_animation();

        Ok(())
    }

    fn tick(&mut self, ctx: &mut ProjectionContext<'_>) -> AnimationStatus {
        let z = ctx
            .camera_target()
            .map(|target| target.z)
            .filter(|z| *z != 0.0 && z.is_finite())
            .unwrap_or(-1.0);

        ctx.look_at(Vec3::new(MIN_X_COORDINATE, PLANET_LOOK_Y, z));
        ctx.state.update(StateUpdate::Orientation(Orientation::new(0.0, PI)));

        let constraints = ctx.constraints_mut();
        constraints.x = true;
        constraints.y = false;

        debug!(target: "projection", "Tiny planet animation end");
        AnimationStatus::Done
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projection::{Activation, ProjectionRegistry, ProjectionScope};
    use crate::core::render::recording::RecordingBackend;
    use crate::core::render::CameraRig;
    use crate::core::state::{Constraint, StateStore};

    //--- Test Helpers -----------------------------------------------------

    struct Fixture {
        state: StateStore,
        camera: CameraRig,
        backend: RecordingBackend,
        registry: ProjectionRegistry,
    }

    impl Fixture {
        fn ready(geometry: GeometryKind) -> Self {
            let mut state = StateStore::default();
            state.update(StateUpdate::Ready(true));
            state.update(StateUpdate::Geometry(Some(geometry)));
            state.update(StateUpdate::OriginalFov(60.0));
            Self {
                state,
                camera: CameraRig::new(),
                backend: RecordingBackend::default(),
                registry: ProjectionRegistry::with_builtins(),
            }
        }

        fn apply(&mut self, kind: ProjectionKind) -> Result<Activation, NotApplicable> {
            let scope = ProjectionScope {
                state: &mut self.state,
                camera: Some(&mut self.camera),
                backend: &mut self.backend,
            };
            self.registry.apply(&kind, scope)
        }

        fn tick(&mut self) -> Option<AnimationStatus> {
            let scope = ProjectionScope {
                state: &mut self.state,
                camera: Some(&mut self.camera),
                backend: &mut self.backend,
            };
            self.registry.tick(scope)
        }
    }

    //=====================================================================
    // Vetoes
    //=====================================================================

    #[test]
    fn cylinder_geometry_is_refused() {
        let mut fixture = Fixture::ready(GeometryKind::Cylinder);
        fixture.apply(ProjectionKind::Equilinear).unwrap();
        let policy = fixture.state.policy().clone();

        assert_eq!(
            fixture.apply(ProjectionKind::TinyPlanet),
            Err(NotApplicable::UnsupportedGeometry(GeometryKind::Cylinder))
        );
        assert_eq!(fixture.registry.current(), Some(&ProjectionKind::Equilinear));
        assert_eq!(*fixture.state.policy(), policy);
        assert!(!fixture.registry.is_animating());
    }

    #[test]
    fn not_ready_is_refused() {
        let mut fixture = Fixture::ready(GeometryKind::Sphere);
        fixture.state.update(StateUpdate::Ready(false));

        assert_eq!(fixture.apply(ProjectionKind::TinyPlanet), Err(NotApplicable::NotReady));
    }

    #[test]
    fn missing_camera_is_refused() {
        let mut fixture = Fixture::ready(GeometryKind::Sphere);
        let scope = ProjectionScope {
            state: &mut fixture.state,
            camera: None,
            backend: &mut fixture.backend,
        };

        assert_eq!(
            fixture.registry.apply(&ProjectionKind::TinyPlanet, scope),
            Err(NotApplicable::CameraMissing)
        );
    }

    //=====================================================================
    // Activation / Animation
    //=====================================================================

    #[test]
    fn activation_locks_y_and_sets_lens() {
        let mut fixture = Fixture::ready(GeometryKind::Sphere);

        assert_eq!(fixture.apply(ProjectionKind::TinyPlanet), Ok(Activation::Animating));

        assert!(fixture.state.is_constrained_with(Constraint::AxisY));
        assert!(!fixture.state.is_constrained_with(Constraint::AxisX));
        assert!(!fixture.state.policy().allows_key(KeyCode::KeyH));
        assert!(fixture.state.policy().allows_key(KeyCode::ArrowUp));
        assert_eq!(fixture.camera.lens(), TINY_PLANET_CAMERA_LENS_VALUE);
        assert_eq!(fixture.state.fov(), Some(120.0));
    }

    #[test]
    fn fov_is_capped() {
        let mut fixture = Fixture::ready(GeometryKind::Box);
        fixture.state.update(StateUpdate::OriginalFov(90.0));

        fixture.apply(ProjectionKind::TinyPlanet).unwrap();

        assert_eq!(fixture.state.fov(), Some(MAX_TINY_PLANET_FOV));
    }

    #[test]
    fn single_tick_flips_axis_locks() {
        let mut fixture = Fixture::ready(GeometryKind::Sphere);
        fixture.apply(ProjectionKind::TinyPlanet).unwrap();

        assert_eq!(fixture.tick(), Some(AnimationStatus::Done));

        assert!(fixture.state.is_constrained_with(Constraint::AxisX));
        assert!(!fixture.state.is_constrained_with(Constraint::AxisY));
        assert!(fixture.state.is_constrained_with(Constraint::Cache));
        assert_eq!(fixture.camera.target(), Vec3::new(MIN_X_COORDINATE, PLANET_LOOK_Y, -1.0));
        assert_eq!(fixture.state.orientation(), Orientation::new(0.0, PI));
        assert!(!fixture.registry.is_animating());
        assert_eq!(fixture.tick(), None);
    }

    #[test]
    fn duplicate_request_is_a_no_op() {
        let mut fixture = Fixture::ready(GeometryKind::Sphere);
        fixture.apply(ProjectionKind::TinyPlanet).unwrap();
        fixture.tick();
        let calls = fixture.backend.calls.len();

        assert_eq!(fixture.apply(ProjectionKind::TinyPlanet), Err(NotApplicable::AlreadyActive));
        assert_eq!(fixture.backend.calls.len(), calls);
    }
}
