//=========================================================================
// Flat Projection
//=========================================================================
//
// Shows the media on a plane with navigation disabled.
//
// The policy drops the panoramic flag, so every refresh pins the pointer
// to the flat position; both axes, the cache and all navigation keys are
// locked. The viewer rebuilds the mesh as a plane afterwards.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{NotApplicable, ProjectionContext, ProjectionHandler};
use crate::core::constants::DEFAULT_CAMERA_LENS_VALUE;
use crate::core::input::KeyCode;
use crate::core::state::{AccessPolicy, Orientation, StateUpdate};

//=== Flat ================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Flat;

impl Flat {
    /// Constraint set installed while the flat projection is current.
    pub fn policy() -> AccessPolicy {
        AccessPolicy::unrestricted()
            .panoramic(false)
            .lock_x(true)
            .lock_y(true)
            .lock_cache(true)
            .lock_keys(KeyCode::HORIZONTAL)
            .lock_keys(KeyCode::VERTICAL)
    }
}

impl ProjectionHandler for Flat {
    fn try_activate(&mut self, ctx: &mut ProjectionContext<'_>) -> Result<(), NotApplicable> {
        ctx.require_camera()?;

        ctx.set_constraints(Self::policy());
        ctx.set_lens(DEFAULT_CAMERA_LENS_VALUE);
        if let Some(fov) = ctx.state.original_fov() {
            ctx.set_fov(fov);
        }
        ctx.state.update(StateUpdate::Orientation(Orientation::HORIZON));

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coords;
    use crate::core::input::PointerDelta;
    use crate::core::projection::{Activation, ProjectionKind, ProjectionRegistry, ProjectionScope};
    use crate::core::render::recording::RecordingBackend;
    use crate::core::render::CameraRig;
    use crate::core::state::{Constraint, PointerCoordinates, StateStore};

    #[test]
    fn flat_locks_navigation_and_pins_pointer() {
        let mut state = StateStore::default();
        let mut camera = CameraRig::new();
        let mut backend = RecordingBackend::default();
        let mut registry = ProjectionRegistry::with_builtins();

        let scope = ProjectionScope {
            state: &mut state,
            camera: Some(&mut camera),
            backend: &mut backend,
        };
        assert_eq!(registry.apply(&ProjectionKind::Flat, scope), Ok(Activation::Active));

        assert!(state.is_constrained_with(Constraint::NonPanoramic));
        assert!(state.is_constrained_with(Constraint::Cache));
        for key in KeyCode::HORIZONTAL.into_iter().chain(KeyCode::VERTICAL) {
            assert!(!state.policy().allows_key(key));
        }
        assert_eq!(state.requested_projection(), Some(&ProjectionKind::Flat));

        coords::apply_drag(&mut state, PointerDelta::new(40.0, 40.0));
        coords::refresh(&mut state);
        assert_eq!(state.coords(), PointerCoordinates::new(90.0, 0.0));
    }

    #[test]
    fn flat_restores_original_fov_and_lens() {
        let mut state = StateStore::default();
        state.update(StateUpdate::OriginalFov(75.0));
        state.update(StateUpdate::Fov(150.0));
        let mut camera = CameraRig::new();
        camera.set_lens(&mut RecordingBackend::default(), 7.5);
        let mut backend = RecordingBackend::default();

        let scope = ProjectionScope {
            state: &mut state,
            camera: Some(&mut camera),
            backend: &mut backend,
        };
        ProjectionRegistry::with_builtins()
            .apply(&ProjectionKind::Flat, scope)
            .unwrap();

        assert_eq!(state.fov(), Some(75.0));
        assert_eq!(camera.lens(), DEFAULT_CAMERA_LENS_VALUE);
        assert_eq!(state.orientation(), Orientation::HORIZON);
    }

    #[test]
    fn flat_requires_camera() {
        let mut state = StateStore::default();
        let mut backend = RecordingBackend::default();

        let scope = ProjectionScope { state: &mut state, camera: None, backend: &mut backend };
        assert_eq!(
            ProjectionRegistry::with_builtins().apply(&ProjectionKind::Flat, scope),
            Err(NotApplicable::CameraMissing)
        );
        assert!(!state.is_constrained_with(Constraint::NonPanoramic));
    }
}
