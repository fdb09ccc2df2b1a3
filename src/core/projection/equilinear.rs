//=========================================================================
// Equilinear Projection
//=========================================================================
//
// Default panoramic view: nothing locked, default lens, the original
// field of view and a level horizon.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{NotApplicable, ProjectionContext, ProjectionHandler};
use crate::core::constants::DEFAULT_CAMERA_LENS_VALUE;
use crate::core::state::{AccessPolicy, Orientation, StateUpdate};

//=== Equilinear ==========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Equilinear;

impl ProjectionHandler for Equilinear {
    fn try_activate(&mut self, ctx: &mut ProjectionContext<'_>) -> Result<(), NotApplicable> {
        ctx.require_camera()?;

        ctx.set_constraints(AccessPolicy::unrestricted());
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
