//=========================================================================
// Viewer
//=========================================================================
//
// Host-facing panorama viewer.
//
// Architecture:
// ```text
//     ViewerBuilder ──build(backend)──> Viewer<B>
//         │                               ├─ StateStore
//         ├─ with_options()               ├─ ProjectionRegistry
//         └─ with_channel_capacity()      ├─ CameraRig + B: RenderBackend
//                                         └─ EventChannel ──> host
// ```
//
// Per tick (`update`):
//   rotations → refresh → position camera → animation tick → draw → Update
//
// Projection requests made before `ready` are held and applied exactly
// once when the viewer becomes ready.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::TAU;
use std::time::Duration;

use crossbeam_channel::Receiver;
use glam::{Vec2, Vec3};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::constants::{DEFAULT_CAMERA_LENS_VALUE, DEFAULT_FOV};
use crate::core::coords;
use crate::core::geometry::{
    mesh_radius, select_geometry, GeometryFlags, GeometryKind, MediaDimensions, MeshDescriptor,
    UnknownGeometry,
};
use crate::core::input::{InputEvent, PointerDelta};
use crate::core::projection::{
    Activation, NotApplicable, ProjectionHandler, ProjectionKind, ProjectionRegistry,
    ProjectionScope,
};
use crate::core::render::{CameraRig, MeshHandle, RenderBackend};
use crate::core::state::{
    Orientation, PointerCoordinates, RotationAxis, RotationSpec, StateCache, StateStore,
    StateUpdate, ViewportSize,
};

//=== Module Declarations =================================================

mod event;
mod options;

//=== Public API ==========================================================

pub use event::ViewerEvent;
pub use options::{AutoRotation, ConfigError, ViewerOptions};

use event::EventChannel;

//=== ViewerBuilder =======================================================

/// Builder for configuring and constructing a [`Viewer`].
///
/// # Default Values
///
/// - **Options**: [`ViewerOptions::default`] (equilinear projection)
/// - **Channel capacity**: 256 events
///
/// # Examples
///
/// ```no_run
/// # use panoview::prelude::*;
/// # fn backend() -> impl RenderBackend { unimplemented!() }
/// let options = ViewerOptions::from_json(r#"{ "projection": "fisheye" }"#)?;
///
/// let mut viewer = ViewerBuilder::new()
///     .with_options(options)
///     .with_channel_capacity(64)
///     .build(backend());
///
/// viewer.ready(MediaDimensions::new(4096.0, 2048.0));
/// # Ok::<(), ConfigError>(())
/// ```
pub struct ViewerBuilder {
    options: ViewerOptions,
    channel_capacity: usize,
}

impl ViewerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            options: ViewerOptions::default(),
            channel_capacity: 256,
        }
    }

    pub fn with_options(mut self, options: ViewerOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets how many undrained events are kept before new ones are dropped.
    ///
    /// Default: 256
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds a viewer drawing through `backend`.
    pub fn build<B: RenderBackend>(self, backend: B) -> Viewer<B> {
        info!(
            "Building viewer (projection: {}, channel: {})",
            self.options.projection, self.channel_capacity
        );

        let pending = ProjectionKind::from_name(&self.options.projection);

        Viewer {
            state: StateStore::new(self.options.state_config()),
            projections: ProjectionRegistry::with_builtins(),
            camera: None,
            backend,
            mesh: None,
            geometry_override: self.options.geometry,
            dimensions: MediaDimensions::default(),
            pending_projection: Some(pending),
            events: EventChannel::new(self.channel_capacity),
            options: self.options,
        }
    }
}

impl Default for ViewerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Viewer ==============================================================

/// Panoramic media viewer driving a [`RenderBackend`].
///
/// The host feeds it input through [`Viewer::handle_input`] and calls
/// [`Viewer::update`] once per frame.
pub struct Viewer<B: RenderBackend> {
    options: ViewerOptions,
    state: StateStore,
    projections: ProjectionRegistry,
    camera: Option<CameraRig>,
    backend: B,
    mesh: Option<MeshHandle>,
    geometry_override: Option<GeometryKind>,
    dimensions: MediaDimensions,
    pending_projection: Option<ProjectionKind>,
    events: EventChannel,
}

impl<B: RenderBackend> Viewer<B> {
    //--- Construction -----------------------------------------------------

    /// Creates a viewer with default options.
    pub fn new(backend: B) -> Self {
        ViewerBuilder::new().build(backend)
    }

    //--- Lifecycle --------------------------------------------------------

    /// Marks the media as loaded with the given dimensions.
    ///
    /// Creates the camera, applies the configured fov, orientation,
    /// size and rotations, builds the mesh and applies the held
    /// projection request.
    pub fn ready(&mut self, dimensions: MediaDimensions) {
        info!("Viewer ready ({}x{})", dimensions.width, dimensions.height);

        self.dimensions = dimensions;

        if self.camera.is_none() {
            let mut camera = CameraRig::new();
            camera.set_lens(&mut self.backend, DEFAULT_CAMERA_LENS_VALUE);
            self.camera = Some(camera);
        }

        self.state.update(StateUpdate::Ready(true));
        self.set_fov(self.options.fov.unwrap_or(DEFAULT_FOV));
        self.state.update(StateUpdate::Orientation(self.options.initial_orientation()));

        if let Some(size) = self.options.size {
            self.size(size.width, size.height);
        }

        let rotate = self.options.rotate;
        for (axis, spec) in [(RotationAxis::X, rotate.x), (RotationAxis::Y, rotate.y)] {
            if spec.is_some() {
                self.rotate(axis, spec);
            }
        }

        self.rebuild_geometry(true);
        self.events.emit(ViewerEvent::Ready);

        if let Some(kind) = self.pending_projection.take() {
            debug!("Applying deferred projection {}", kind);
            if let Err(reason) = self.apply_projection(kind.clone()) {
                warn!("Deferred projection {} not applied: {}", kind, reason);
            }
        }
    }

    /// Replaces the media; the mesh is rebuilt for the new dimensions and
    /// the configured field of view is applied again.
    pub fn set_source(&mut self, dimensions: MediaDimensions) {
        debug!("Source changed ({}x{})", dimensions.width, dimensions.height);
        self.dimensions = dimensions;
        if self.state.is_ready() {
            self.rebuild_geometry(true);
            self.set_fov(self.options.fov.unwrap_or(DEFAULT_FOV));
        }
    }

    /// Tears the viewer down to its pre-ready state.
    ///
    /// Registered projections survive and the configured projection is
    /// held again for the next `ready`; everything else is reset.
    pub fn destroy(&mut self) {
        info!("Destroying viewer");

        self.projections.clear();
        self.state.reset();
        self.camera = None;
        self.mesh = None;
        self.pending_projection = Some(ProjectionKind::from_name(&self.options.projection));
        self.dimensions = MediaDimensions::default();

        self.events.emit(ViewerEvent::Destroyed);
    }

    //--- Projections ------------------------------------------------------

    /// Requests the projection named `name`.
    ///
    /// Before the viewer is ready the request is held and
    /// [`Activation::Deferred`] is returned; a later request replaces it.
    pub fn set_projection(&mut self, name: &str) -> Result<Activation, NotApplicable> {
        let kind = ProjectionKind::from_name(name);

        if !self.projections.contains(&kind) {
            debug!("Unknown projection {:?}", name);
            return Err(NotApplicable::Unregistered);
        }

        if !self.state.is_ready() {
            debug!("Deferring projection {} until ready", kind);
            self.pending_projection = Some(kind);
            return Ok(Activation::Deferred);
        }

        self.apply_projection(kind)
    }

    /// Currently active projection.
    pub fn projection(&self) -> Option<&ProjectionKind> {
        self.projections.current()
    }

    /// Registers a projection handler under `name`.
    pub fn define_projection<H>(&mut self, name: &str, handler: H)
    where
        H: ProjectionHandler + 'static,
    {
        self.projections.define(ProjectionKind::from_name(name), handler);
    }

    fn apply_projection(&mut self, kind: ProjectionKind) -> Result<Activation, NotApplicable> {
        let scope = ProjectionScope {
            state: &mut self.state,
            camera: self.camera.as_mut(),
            backend: &mut self.backend,
        };

        let activation = self.projections.apply(&kind, scope)?;

        self.rebuild_geometry(false);
        self.events.emit(ViewerEvent::ProjectionChanged(kind));

        Ok(activation)
    }

    //--- Geometry ---------------------------------------------------------

    pub fn geometry(&self) -> Option<GeometryKind> {
        self.state.geometry()
    }

    /// Forces the geometry named `name` regardless of media shape.
    pub fn set_geometry(&mut self, name: &str) -> Result<GeometryKind, UnknownGeometry> {
        let kind: GeometryKind = name.parse()?;
        self.geometry_override = Some(kind);
        if self.state.is_ready() {
            self.rebuild_geometry(false);
        }
        Ok(kind)
    }

    /// Recomputes the geometry and builds a mesh when needed.
    ///
    /// Without `force` the mesh is only rebuilt if the kind changed.
    fn rebuild_geometry(&mut self, force: bool) -> Option<GeometryKind> {
        let flags = GeometryFlags {
            override_kind: self.geometry_override,
            cube_map: self.options.cube_map,
            force_flat: self.state.requested_projection() == Some(&ProjectionKind::Flat),
        };

        let previous = self.state.geometry();

        let Some(kind) = select_geometry(self.dimensions.ratio(), flags) else {
            warn!(
                "No geometry for media {}x{}, skipping mesh",
                self.dimensions.width, self.dimensions.height
            );
            self.state.update(StateUpdate::Geometry(None));
            self.mesh = None;
            return None;
        };

        if !force && previous == Some(kind) && self.mesh.is_some() {
            return Some(kind);
        }

        let radius = mesh_radius(self.dimensions, previous);
        self.state.update(StateUpdate::Radius(radius));
        self.state.update(StateUpdate::Geometry(Some(kind)));

        debug!("Building {} mesh (radius {})", kind, radius);
        self.mesh = Some(self.backend.create_mesh(&MeshDescriptor::new(kind, radius)));

        Some(kind)
    }

    //--- Coordinates ------------------------------------------------------

    pub fn coords(&self) -> PointerCoordinates {
        self.state.coords()
    }

    /// Writes the given coordinates; locked axes ignore the write.
    pub fn set_coords(&mut self, x: Option<f32>, y: Option<f32>) -> PointerCoordinates {
        if let Some(y) = y {
            self.state.update(StateUpdate::PointerY(y));
        }
        if let Some(x) = x {
            self.state.update(StateUpdate::PointerX(x));
        }
        self.state.coords()
    }

    pub fn cache(&self) -> &StateCache {
        self.state.cache()
    }

    pub fn merge_cache(&mut self, cache: StateCache) -> bool {
        self.state.merge_cache(cache)
    }

    pub fn orientation(&self) -> Orientation {
        self.state.orientation()
    }

    //--- Field of View ----------------------------------------------------

    pub fn fov(&self) -> Option<f32> {
        self.state.fov()
    }

    /// Sets the field of view. The first value set becomes the original.
    pub fn set_fov(&mut self, fov: f32) {
        if !fov.is_finite() {
            debug!("Ignoring non-finite fov {}", fov);
            return;
        }

        if self.state.fov().is_none() {
            self.state.update(StateUpdate::OriginalFov(fov));
        }
        self.state.update(StateUpdate::Fov(fov));

        if let Some(camera) = self.camera.as_mut() {
            camera.set_focal_length(&mut self.backend, fov);
        }
    }

    //--- Input ------------------------------------------------------------

    /// Routes one input event to the coordinate model.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.state.update(StateUpdate::Mousedown(true));
                coords::begin_drag(&mut self.state, Vec2::new(x, y));
            }
            InputEvent::PointerMoved { x, y } => {
                if self.state.is_mousedown() {
                    coords::drag_to(&mut self.state, Vec2::new(x, y));
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.state.update(StateUpdate::Mousedown(false));
            }
            InputEvent::TouchStart { x, y } => {
                self.state.update(StateUpdate::Touching(true));
                coords::begin_drag(&mut self.state, Vec2::new(x, y));
            }
            InputEvent::TouchMoved { x, y, touches } => {
                if self.state.is_touching() && touches == 1 {
                    coords::drag_to(&mut self.state, Vec2::new(x, y));
                }
            }
            InputEvent::TouchEnd => {
                self.state.update(StateUpdate::Touching(false));
            }
            InputEvent::Wheel(delta) => {
                if let Some(fov) = coords::apply_wheel(&mut self.state, delta) {
                    if let Some(camera) = self.camera.as_mut() {
                        camera.set_focal_length(&mut self.backend, fov);
                    }
                    self.events.emit(ViewerEvent::Wheel { fov });
                }
            }
            InputEvent::KeyDown(key) => {
                self.state.press_key(key);
                let step = self.state.config().keyboard_step;
                if let Some(delta) = coords::key_delta(key, step, self.state.policy()) {
                    coords::apply_drag(&mut self.state, delta);
                }
            }
            InputEvent::KeyUp(key) => {
                self.state.release_key(key);
            }
            InputEvent::Resized { width, height } => self.resize(width, height),
            InputEvent::Blur => self.blur(),
            InputEvent::Unidentified => {}
        }
    }

    //--- Frame Loop -------------------------------------------------------

    /// Runs one tick: rotations, refresh, camera, animation, draw.
    ///
    /// `dt` is the time since the previous call and only drives interval
    /// rotations. Nothing happens before the viewer is ready.
    pub fn update(&mut self, dt: Duration) {
        if !self.state.is_ready() || !self.state.should_update() {
            return;
        }

        self.apply_rotations(dt);
        self.refresh();
        self.position_camera();

        let scope = ProjectionScope {
            state: &mut self.state,
            camera: self.camera.as_mut(),
            backend: &mut self.backend,
        };
        self.projections.tick(scope);

        self.draw();
        self.events.emit(ViewerEvent::Update);
    }

    /// Normalizes the pointer for the active projection.
    pub fn refresh(&mut self) {
        let panoramic = coords::refresh(&mut self.state);

        if panoramic && !self.projections.is_animating() {
            if let (Some(camera), Some(fov)) = (self.camera.as_mut(), self.state.fov()) {
                if camera.fov() != fov {
                    camera.set_focal_length(&mut self.backend, fov);
                }
            }
        }

        self.events.emit(ViewerEvent::Refresh);
    }

    /// Submits a frame. Returns `false` when there is no camera yet.
    ///
    /// In VR mode the frame is left to the VR presenter.
    pub fn draw(&mut self) -> bool {
        let Some(camera) = self.camera.as_ref() else {
            return false;
        };

        if !self.state.is_vr_enabled() {
            self.backend.submit_frame(self.mesh, camera);
        }

        self.events.emit(ViewerEvent::Draw);
        true
    }

    fn apply_rotations(&mut self, dt: Duration) {
        let rotations = self.state.rotations_mut();
        let dx = rotations.x.advance(dt);
        let dy = rotations.y.advance(dt);

        if (dx == 0.0 && dy == 0.0) || self.state.is_interacting() {
            return;
        }

        let Orientation { x, y } = self.state.orientation();
        let x = (x + dx).rem_euclid(TAU);
        self.state.update(StateUpdate::Orientation(Orientation::new(x, y + dy)));
    }

    fn position_camera(&mut self) {
        let target = coords::look_direction(self.state.coords(), self.state.orientation());
        if let Some(camera) = self.camera.as_mut() {
            camera.look_at(&mut self.backend, target);
        }
    }

    /// Points the camera at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(camera) = self.camera.as_mut() {
            camera.look_at(&mut self.backend, target);
            self.events.emit(ViewerEvent::LookAt(target));
        }
    }

    //--- Rotation ---------------------------------------------------------

    /// Starts (`Some`) or stops (`None`) the interval rotation on `axis`.
    pub fn rotate(&mut self, axis: RotationAxis, spec: Option<RotationSpec>) {
        let rotation = self.state.rotations_mut().axis_mut(axis);
        match spec {
            Some(spec) => {
                debug!("Rotating {:?} by {} every {:?}", axis, spec.value, spec.every);
                rotation.start(spec);
            }
            None => rotation.stop(),
        }
    }

    //--- Layout -----------------------------------------------------------

    /// Sets the viewport size.
    pub fn size(&mut self, width: f32, height: f32) {
        let size = ViewportSize { width, height };
        if !self.state.update(StateUpdate::Size(size)) {
            return;
        }

        if let Some(camera) = self.camera.as_mut() {
            camera.set_aspect(width, height);
        }
        self.backend.set_viewport_size(width, height);
        self.events.emit(ViewerEvent::Size(size));
    }

    /// Host container resized; ignored unless resizable and windowed.
    ///
    /// When the size is already current the original field of view is
    /// restored instead.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !self.state.is_resizable() || self.state.is_fullscreen() {
            debug!("Resize to {}x{} ignored", width, height);
            return;
        }

        if self.state.size() == (ViewportSize { width, height }) {
            if let Some(original) = self.state.original_fov() {
                debug!("Size unchanged, restoring fov {}", original);
                self.set_fov(original);
            }
            return;
        }

        self.size(width, height);
        self.events.emit(ViewerEvent::Resize(self.state.size()));
    }

    /// Pixel dimensions of the current media.
    pub fn dimensions(&self) -> MediaDimensions {
        self.dimensions
    }

    //--- Focus ------------------------------------------------------------

    pub fn focus(&mut self) {
        self.state.update(StateUpdate::Focused(true));
        self.events.emit(ViewerEvent::Focus);
    }

    pub fn unfocus(&mut self) {
        self.state.update(StateUpdate::Focused(false));
        self.events.emit(ViewerEvent::Blur);
    }

    /// Window lost focus: releases every held input.
    pub fn blur(&mut self) {
        self.state.release_all();
        self.events.emit(ViewerEvent::Blur);
    }

    //--- VR ---------------------------------------------------------------

    pub fn enable_vr_mode(&mut self) {
        self.state.update(StateUpdate::VrEnabled(true));
        self.events.emit(ViewerEvent::VrModeChanged(true));
    }

    pub fn disable_vr_mode(&mut self) {
        self.state.update(StateUpdate::VrEnabled(false));
        self.events.emit(ViewerEvent::VrModeChanged(false));
        self.draw();
    }

    //--- Accessors --------------------------------------------------------

    /// Receiver for viewer events; all clones share one queue.
    pub fn events(&self) -> Receiver<ViewerEvent> {
        self.events.receiver()
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn camera(&self) -> Option<&CameraRig> {
        self.camera.as_ref()
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Applies a raw drag delta, as pointer input would.
    pub fn drag(&mut self, delta: PointerDelta) -> PointerCoordinates {
        coords::apply_drag(&mut self.state, delta)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
