//=========================================================================
// Render Boundary
//=========================================================================
//
// Contract with the external rendering collaborator, plus the camera rig
// mirrored on this side of the boundary.
//
// Architecture:
//   Viewer / Projections
//        ↓ (CameraRig mirrors target, lens, fov)
//   RenderBackend (mesh creation, camera commands, frame submission)
//
// The rig keeps the last values it forwarded so projections can read
// the camera target without querying the backend.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::constants::{DEFAULT_CAMERA_LENS_VALUE, DEFAULT_FOV};
use crate::core::geometry::MeshDescriptor;

//=== MeshHandle ==========================================================

/// Opaque handle to a mesh owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

//=== RenderBackend =======================================================

/// Rendering collaborator driven by the viewer.
///
/// Implementations own the GPU (or canvas) resources. Every method is
/// called on the render thread, once per logical operation.
pub trait RenderBackend {
    /// Builds a mesh for the given geometry and binds the media to it.
    fn create_mesh(&mut self, descriptor: &MeshDescriptor) -> MeshHandle;

    /// Sets the camera lens (focal length in millimetres).
    fn set_camera_lens(&mut self, lens: f32);

    /// Sets the camera's vertical field of view in degrees.
    fn set_camera_focal_length(&mut self, fov: f32);

    /// Points the camera at `target`.
    fn camera_look_at(&mut self, target: Vec3);

    /// Draws one frame.
    fn submit_frame(&mut self, mesh: Option<MeshHandle>, camera: &CameraRig);

    /// Resizes the drawing surface.
    fn set_viewport_size(&mut self, _width: f32, _height: f32) {}
}

//=== CameraRig ===========================================================

/// Viewer-side mirror of the backend camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    target: Vec3,
    position: Vec3,
    lens: f32,
    fov: f32,
    aspect: f32,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            target: Vec3::NEG_Z,
            position: Vec3::ZERO,
            lens: DEFAULT_CAMERA_LENS_VALUE,
            fov: DEFAULT_FOV,
            aspect: 1.0,
        }
    }

    //--- Commands ---------------------------------------------------------

    pub fn set_lens(&mut self, backend: &mut dyn RenderBackend, lens: f32) {
        self.lens = lens;
        backend.set_camera_lens(lens);
    }

    pub fn set_focal_length(&mut self, backend: &mut dyn RenderBackend, fov: f32) {
        self.fov = fov;
        backend.set_camera_focal_length(fov);
    }

    /// Looks at `target`; the camera sits opposite the target.
    pub fn look_at(&mut self, backend: &mut dyn RenderBackend, target: Vec3) {
        self.target = target;
        self.position = -target;
        backend.camera_look_at(target);
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 && width.is_finite() {
            self.aspect = width / height;
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn lens(&self) -> f32 {
        self.lens
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Test Support
//=========================================================================

/// Backend that records every call, shared by the crate's unit tests.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum BackendCall {
        CreateMesh(MeshDescriptor),
        Lens(f32),
        FocalLength(f32),
        LookAt(Vec3),
        Submit(Option<MeshHandle>),
        Viewport(f32, f32),
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub(crate) calls: Vec<BackendCall>,
        next_mesh: u64,
    }

    impl RecordingBackend {
        pub(crate) fn frames(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, BackendCall::Submit(_)))
                .count()
        }

        pub(crate) fn meshes(&self) -> Vec<&MeshDescriptor> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    BackendCall::CreateMesh(descriptor) => Some(descriptor),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn last_focal_length(&self) -> Option<f32> {
            self.calls.iter().rev().find_map(|call| match call {
                BackendCall::FocalLength(fov) => Some(*fov),
                _ => None,
            })
        }
    }

    impl RenderBackend for RecordingBackend {
        fn create_mesh(&mut self, descriptor: &MeshDescriptor) -> MeshHandle {
            self.calls.push(BackendCall::CreateMesh(descriptor.clone()));
            self.next_mesh += 1;
            MeshHandle(self.next_mesh)
        }

        fn set_camera_lens(&mut self, lens: f32) {
            self.calls.push(BackendCall::Lens(lens));
        }

        fn set_camera_focal_length(&mut self, fov: f32) {
            self.calls.push(BackendCall::FocalLength(fov));
        }

        fn camera_look_at(&mut self, target: Vec3) {
            self.calls.push(BackendCall::LookAt(target));
        }

        fn submit_frame(&mut self, mesh: Option<MeshHandle>, _camera: &CameraRig) {
            self.calls.push(BackendCall::Submit(mesh));
        }

        fn set_viewport_size(&mut self, width: f32, height: f32) {
            self.calls.push(BackendCall::Viewport(width, height));
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
