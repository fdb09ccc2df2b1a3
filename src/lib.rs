//=========================================================================
// Panoview: Library Root
//
// Projection engine and orientation state for a panoramic (360°)
// media viewer.
//
// Responsibilities:
// - Own the constrained viewer state and the coordinate model
// - Register, activate and animate projection modes
// - Pick mesh geometry from media shape
// - Drive an external `RenderBackend`; nothing is rendered here
//
// Typical usage:
// ```no_run
// use panoview::prelude::*;
//
// fn run<B: RenderBackend>(backend: B) {
//     let mut viewer = Viewer::new(backend);
//     viewer.ready(MediaDimensions::new(4096.0, 2048.0));
//     viewer.update(std::time::Duration::from_millis(16));
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the rendering-agnostic systems. `viewer` is the host
// facade. `platform` translates winit window events into input events.
//
pub mod core;
pub mod platform;
pub mod prelude;
pub mod viewer;

//--- Public Exports ------------------------------------------------------

pub use viewer::{Viewer, ViewerBuilder, ViewerEvent, ViewerOptions};
