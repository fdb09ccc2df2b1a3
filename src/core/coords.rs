//=========================================================================
// Coordinate Mapper
//=========================================================================
//
// Converts raw input into pointer coordinates and pointer coordinates
// into a camera look direction.
//
// Flow:
//   drag / touch / key ──→ apply_drag() ──→ StateStore (gated) + cache
//   wheel              ──→ apply_wheel() ──→ fov (clamped)
//   render tick        ──→ refresh() ──→ clamp / wrap, or pin when flat
//                      ──→ look_direction() ──→ camera target
//
// Sign convention: a non-inverted drag adds dx to x but subtracts dy
// from y, so dragging down raises the view. Inverted mode flips both.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::constants::{DEFAULT_FOV, MAX_WHEEL_DISTANCE, MIN_WHEEL_DISTANCE};
use crate::core::input::{KeyCode, PointerDelta, WheelDelta};
use crate::core::state::{AccessPolicy, Orientation, PointerCoordinates, StateCache, StateStore, StateUpdate};

/// Keeps the polar angle off the poles so the look direction never
/// degenerates.
const POLE_EPSILON: f32 = 1e-4;

//=== Drag Handling =======================================================

/// Applies a raw drag delta to the pointer coordinates.
///
/// Axis writes go through the access policy; the computed coordinates
/// are offered to the cache afterwards (also gated). Returns the
/// coordinates actually stored.
pub fn apply_drag(state: &mut StateStore, delta: PointerDelta) -> PointerCoordinates {
    let PointerCoordinates { pointer_x: x, pointer_y: y } = state.coords();

    let (x, y) = if state.is_inverted() {
        (x - delta.dx, y + delta.dy)
    } else {
        (x + delta.dx, y - delta.dy)
    };

    state.update(StateUpdate::PointerX(x));
    state.update(StateUpdate::PointerY(y));
    state.merge_cache(StateCache {
        pointer_x: Some(x),
        pointer_y: Some(y),
    });

    state.coords()
}

/// Records the page position where a drag begins.
pub fn begin_drag(state: &mut StateStore, position: Vec2) {
    state.update(StateUpdate::DragStart(position));
}

/// Continues a drag to `position`, applying the offset from the last
/// sample and making `position` the new drag origin.
pub fn drag_to(state: &mut StateStore, position: Vec2) -> PointerCoordinates {
    let offset = position - state.dragstart();
    state.update(StateUpdate::DragStart(position));
    apply_drag(state, PointerDelta::new(offset.x, offset.y))
}

//=== Refresh =============================================================

/// Per-tick normalization.
///
/// Panoramic projections get `pointer_y` clamped and `pointer_x`
/// wrapped, then cached. Non-panoramic projections get the pointer
/// pinned to the flat position regardless of stored drift.
/// Returns whether the panoramic branch ran.
pub fn refresh(state: &mut StateStore) -> bool {
    if state.policy().panoramic {
        state.normalize_pointer();
        let coords = state.coords();
        state.merge_cache(coords.into());
        true
    } else {
        state.pin_pointer();
        false
    }
}

//=== Wheel ===============================================================

/// Adjusts the field of view from wheel input.
///
/// Ignored entirely (returns `None`) when wheel input is disallowed.
/// The result is clamped to `[MIN_WHEEL_DISTANCE, MAX_WHEEL_DISTANCE]`.
pub fn apply_wheel(state: &mut StateStore, delta: WheelDelta) -> Option<f32> {
    if !state.allow_wheel() {
        trace!("wheel ignored: disabled");
        return None;
    }

    let velocity = state.scroll_velocity();
    let fov = state.fov().unwrap_or(DEFAULT_FOV);

    let fov = match delta {
        WheelDelta::DeltaY(d) | WheelDelta::Legacy(d) => fov - d * velocity,
        WheelDelta::Detail(d) => fov + d * velocity,
    };

    if !fov.is_finite() {
        return None;
    }

    let fov = fov.clamp(MIN_WHEEL_DISTANCE, MAX_WHEEL_DISTANCE);
    state.update(StateUpdate::Fov(fov));
    Some(fov)
}

//=== Keyboard ============================================================

/// Maps a navigation key to a drag delta of `step` units.
///
/// Keys locked by the policy, and keys that do not navigate, yield `None`.
pub fn key_delta(key: KeyCode, step: f32, policy: &AccessPolicy) -> Option<PointerDelta> {
    if !policy.allows_key(key) {
        trace!("key {:?} ignored: locked", key);
        return None;
    }

    match key {
        KeyCode::ArrowLeft | KeyCode::KeyH => Some(PointerDelta::new(-step, 0.0)),
        KeyCode::ArrowRight | KeyCode::KeyL => Some(PointerDelta::new(step, 0.0)),
        KeyCode::ArrowUp | KeyCode::KeyK => Some(PointerDelta::new(0.0, -step)),
        KeyCode::ArrowDown | KeyCode::KeyJ => Some(PointerDelta::new(0.0, step)),
        KeyCode::Unidentified => None,
    }
}

//=== Look Direction ======================================================

/// Unit vector the camera faces for the given pointer and orientation.
///
/// `pointer_x` is a longitude added to the orientation yaw; `pointer_y`
/// is a latitude subtracted from the orientation polar angle.
pub fn look_direction(coords: PointerCoordinates, orientation: Orientation) -> Vec3 {
    let theta = coords.pointer_x.to_radians() + orientation.x;
    let phi = (orientation.y - coords.pointer_y.to_radians()).clamp(POLE_EPSILON, PI - POLE_EPSILON);

    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{
        FLAT_POINTER_X, FLAT_POINTER_Y, MAX_X_COORDINATE, MAX_Y_COORDINATE, MIN_Y_COORDINATE,
    };
    use crate::core::state::StateConfig;

    //--- Test Helpers -----------------------------------------------------

    fn store() -> StateStore {
        StateStore::default()
    }

    fn inverted_store() -> StateStore {
        StateStore::new(StateConfig { inverted: true, ..StateConfig::default() })
    }

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{:?} != {:?}", a, b);
    }

    //=====================================================================
    // Drag Sign Convention
    //=====================================================================

    /// x adds and y subtracts under the default mode. The vertical
    /// asymmetry is kept as observed; this test pins it.
    #[test]
    fn drag_adds_x_and_subtracts_y() {
        let mut state = store();
        let coords = apply_drag(&mut state, PointerDelta::new(10.0, 4.0));
        assert_eq!(coords, PointerCoordinates::new(10.0, -4.0));
    }

    #[test]
    fn inverted_drag_flips_both_axes() {
        let mut state = inverted_store();
        let coords = apply_drag(&mut state, PointerDelta::new(10.0, 4.0));
        assert_eq!(coords, PointerCoordinates::new(-10.0, 4.0));
    }

    #[test]
    fn drag_updates_cache() {
        let mut state = store();
        apply_drag(&mut state, PointerDelta::new(3.0, 1.0));
        assert_eq!(state.cache().pointer_x, Some(3.0));
        assert_eq!(state.cache().pointer_y, Some(-1.0));
    }

    #[test]
    fn locked_axis_ignores_drag() {
        let mut state = store();
        state.set_policy(AccessPolicy::unrestricted().lock_y(true).lock_cache(true));

        let coords = apply_drag(&mut state, PointerDelta::new(5.0, 5.0));

        assert_eq!(coords, PointerCoordinates::new(5.0, 0.0));
        assert_eq!(*state.cache(), StateCache::default());
    }

    #[test]
    fn drag_to_uses_offset_from_last_sample() {
        let mut state = store();
        begin_drag(&mut state, Vec2::new(100.0, 100.0));

        drag_to(&mut state, Vec2::new(110.0, 90.0));
        let coords = drag_to(&mut state, Vec2::new(115.0, 90.0));

        assert_eq!(coords, PointerCoordinates::new(15.0, 10.0));
        assert_eq!(state.dragstart(), Vec2::new(115.0, 90.0));
    }

    //=====================================================================
    // Refresh
    //=====================================================================

    #[test]
    fn refresh_keeps_y_in_range_after_any_drag() {
        let mut state = store();
        for dy in [-1000.0, -90.0, 0.0, 45.0, 3000.0] {
            apply_drag(&mut state, PointerDelta::new(0.0, dy));
            refresh(&mut state);
            let y = state.coords().pointer_y;
            assert!((MIN_Y_COORDINATE..=MAX_Y_COORDINATE).contains(&y), "y = {}", y);
        }
    }

    #[test]
    fn refresh_wraps_x_once() {
        let mut state = store();
        state.update(StateUpdate::PointerX(MAX_X_COORDINATE + 25.0));
        refresh(&mut state);
        assert_eq!(state.coords().pointer_x, 25.0);

        state.update(StateUpdate::PointerX(-15.0));
        refresh(&mut state);
        assert_eq!(state.coords().pointer_x, MAX_X_COORDINATE - 15.0);
    }

    #[test]
    fn refresh_caches_normalized_coords() {
        let mut state = store();
        state.update(StateUpdate::PointerY(400.0));
        refresh(&mut state);
        assert_eq!(state.cache().pointer_y, Some(MAX_Y_COORDINATE));
    }

    #[test]
    fn flat_refresh_pins_pointer_after_drags() {
        let mut state = store();
        state.set_policy(AccessPolicy::unrestricted().panoramic(false));

        for (dx, dy) in [(50.0, 20.0), (-300.0, 7.0), (12.5, -99.0)] {
            apply_drag(&mut state, PointerDelta::new(dx, dy));
        }

        assert!(!refresh(&mut state));
        assert_eq!(state.coords(), PointerCoordinates::new(FLAT_POINTER_X, FLAT_POINTER_Y));
    }

    //=====================================================================
    // Wheel
    //=====================================================================

    #[test]
    fn wheel_delta_y_scales_by_velocity() {
        let mut state = store();
        state.update(StateUpdate::Fov(90.0));
        state.update(StateUpdate::ScrollVelocity(0.05));

        let fov = apply_wheel(&mut state, WheelDelta::DeltaY(-120.0)).unwrap();

        assert!((fov - 96.0).abs() < 1e-4);
        assert_eq!(state.fov(), Some(fov));
    }

    #[test]
    fn wheel_detail_grows_fov() {
        let mut state = store();
        state.update(StateUpdate::Fov(90.0));
        state.update(StateUpdate::ScrollVelocity(1.0));

        assert_eq!(apply_wheel(&mut state, WheelDelta::Detail(3.0)), Some(93.0));
    }

    #[test]
    fn wheel_is_clamped() {
        let mut state = store();
        state.update(StateUpdate::Fov(90.0));
        state.update(StateUpdate::ScrollVelocity(10.0));

        assert_eq!(apply_wheel(&mut state, WheelDelta::DeltaY(120.0)), Some(MIN_WHEEL_DISTANCE));
        assert_eq!(apply_wheel(&mut state, WheelDelta::Legacy(-1000.0)), Some(MAX_WHEEL_DISTANCE));
    }

    #[test]
    fn wheel_ignored_when_disallowed() {
        let mut state = store();
        state.update(StateUpdate::Fov(90.0));
        state.update(StateUpdate::AllowWheel(false));

        assert_eq!(apply_wheel(&mut state, WheelDelta::DeltaY(-120.0)), None);
        assert_eq!(state.fov(), Some(90.0));
    }

    //=====================================================================
    // Keyboard
    //=====================================================================

    #[test]
    fn navigation_keys_map_to_deltas() {
        let policy = AccessPolicy::unrestricted();
        assert_eq!(key_delta(KeyCode::ArrowLeft, 2.0, &policy), Some(PointerDelta::new(-2.0, 0.0)));
        assert_eq!(key_delta(KeyCode::KeyL, 2.0, &policy), Some(PointerDelta::new(2.0, 0.0)));
        assert_eq!(key_delta(KeyCode::KeyK, 2.0, &policy), Some(PointerDelta::new(0.0, -2.0)));
        assert_eq!(key_delta(KeyCode::ArrowDown, 2.0, &policy), Some(PointerDelta::new(0.0, 2.0)));
        assert_eq!(key_delta(KeyCode::Unidentified, 2.0, &policy), None);
    }

    #[test]
    fn locked_keys_are_filtered() {
        let policy = AccessPolicy::unrestricted().lock_keys(KeyCode::HORIZONTAL);
        assert_eq!(key_delta(KeyCode::ArrowRight, 2.0, &policy), None);
        assert!(key_delta(KeyCode::ArrowUp, 2.0, &policy).is_some());
    }

    //=====================================================================
    // Look Direction
    //=====================================================================

    #[test]
    fn flat_pointer_faces_positive_z() {
        let direction = look_direction(
            PointerCoordinates::new(FLAT_POINTER_X, FLAT_POINTER_Y),
            Orientation::HORIZON,
        );
        assert_close(direction, Vec3::Z);
    }

    #[test]
    fn origin_pointer_faces_positive_x() {
        let direction = look_direction(PointerCoordinates::default(), Orientation::HORIZON);
        assert_close(direction, Vec3::X);
    }

    #[test]
    fn look_direction_is_unit_and_avoids_poles() {
        let up = look_direction(PointerCoordinates::new(0.0, 90.0), Orientation::HORIZON);
        assert!((up.length() - 1.0).abs() < 1e-4);
        assert!(up.y < 1.0);
    }
}
