//=========================================================================
// Fisheye Projection
//=========================================================================
//
// Widens the field of view and eases the camera toward it.
//
// The stored fov jumps to the target immediately; only the camera's
// rendered focal length is animated, one easing step per tick, until it
// lands within tolerance of the target.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{AnimationStatus, NotApplicable, ProjectionContext, ProjectionHandler};
use crate::core::constants::{DEFAULT_CAMERA_LENS_VALUE, DEFAULT_FOV, MAX_FISHEYE_FOV};
use crate::core::state::{AccessPolicy, Orientation, StateUpdate};

/// Share of the remaining distance covered per tick.
const EASING: f32 = 0.25;

/// Distance (degrees) at which the animation snaps to the target.
const TOLERANCE: f32 = 0.5;

/// Widening applied to the original field of view.
const FOV_SCALE: f32 = 1.5;

//=== Fisheye =============================================================

#[derive(Debug, Clone, Copy)]
pub struct Fisheye {
    target_fov: f32,
}

impl Fisheye {
    pub fn new() -> Self {
        Self { target_fov: DEFAULT_FOV }
    }

    /// Field of view the animation converges to.
    pub fn target_fov(&self) -> f32 {
        self.target_fov
    }
}

impl Default for Fisheye {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectionHandler for Fisheye {
    fn try_activate(&mut self, ctx: &mut ProjectionContext<'_>) -> Result<(), NotApplicable> {
        ctx.require_camera()?;

        let original = ctx.state.original_fov().unwrap_or(DEFAULT_FOV);
        self.target_fov = (original * FOV_SCALE).min(MAX_FISHEYE_FOV);

        ctx.set_constraints(AccessPolicy::unrestricted());
        ctx.set_lens(DEFAULT_CAMERA_LENS_VALUE);
        ctx.state.update(StateUpdate::Fov(self.target_fov));
        ctx.state.update(StateUpdate::Orientation(Orientation::HORIZON));
        ctx.request_animation();

        Ok(())
    }

    fn tick(&mut self, ctx: &mut ProjectionContext<'_>) -> AnimationStatus {
        let Some(current) = ctx.camera_fov() else {
            return AnimationStatus::Done;
        };

        let next = current + (self.target_fov - current) * EASING;

        if (self.target_fov - next).abs() <= TOLERANCE {
            ctx.set_camera_fov(self.target_fov);
            AnimationStatus::Done
        } else {
            ctx.set_camera_fov(next);
            AnimationStatus::Continue
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projection::{Activation, ProjectionKind, ProjectionRegistry, ProjectionScope};
    use crate::core::render::recording::RecordingBackend;
    use crate::core::render::CameraRig;
    use crate::core::state::StateStore;

    struct Fixture {
        state: StateStore,
        camera: CameraRig,
        backend: RecordingBackend,
        registry: ProjectionRegistry,
    }

    impl Fixture {
        fn new(original_fov: f32) -> Self {
            let mut state = StateStore::default();
            state.update(StateUpdate::OriginalFov(original_fov));
            state.update(StateUpdate::Fov(original_fov));
            Self {
                state,
                camera: CameraRig::new(),
                backend: RecordingBackend::default(),
                registry: ProjectionRegistry::with_builtins(),
            }
        }

        fn apply(&mut self) -> Result<Activation, NotApplicable> {
            let scope = ProjectionScope {
                state: &mut self.state,
                camera: Some(&mut self.camera),
                backend: &mut self.backend,
            };
            self.registry.apply(&ProjectionKind::Fisheye, scope)
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

    #[test]
    fn fisheye_widens_fov_within_cap() {
        let mut fixture = Fixture::new(60.0);
        assert_eq!(fixture.apply(), Ok(Activation::Animating));
        assert_eq!(fixture.state.fov(), Some(90.0));

        let mut fixture = Fixture::new(100.0);
        fixture.apply().unwrap();
        assert_eq!(fixture.state.fov(), Some(MAX_FISHEYE_FOV));
    }

    #[test]
    fn animation_converges_on_target() {
        let mut fixture = Fixture::new(60.0);
        fixture.camera.set_focal_length(&mut RecordingBackend::default(), 60.0);
        fixture.apply().unwrap();

        let mut frames = 0;
        while fixture.tick() == Some(AnimationStatus::Continue) {
            frames += 1;
            assert!(frames < 100, "fisheye animation never finished");
        }

        assert!(frames > 1);
        assert_eq!(fixture.camera.fov(), 90.0);
        assert_eq!(fixture.backend.last_focal_length(), Some(90.0));
        assert!(!fixture.state.is_animating());
    }

    #[test]
    fn focal_length_moves_monotonically() {
        let mut fixture = Fixture::new(60.0);
        fixture.camera.set_focal_length(&mut RecordingBackend::default(), 60.0);
        fixture.apply().unwrap();

        let mut last = fixture.camera.fov();
        while fixture.tick() == Some(AnimationStatus::Continue) {
            assert!(fixture.camera.fov() > last);
            last = fixture.camera.fov();
        }
    }
}
