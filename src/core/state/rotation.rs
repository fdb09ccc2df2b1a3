//=========================================================================
// Interval Rotations
//=========================================================================
//
// Automatic orientation drift ("auto-rotate") driven by the frame clock.
//
// Each axis owns an `IntervalRotation`. The host's per-frame `dt` is
// accumulated and every full `every` period yields one `value` step.
// The viewer discards steps while the user is interacting, so the period
// keeps running underneath a drag.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

//=== RotationAxis ========================================================

/// Orientation axis targeted by an interval rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationAxis {
    X,
    Y,
}

//=== RotationSpec ========================================================

/// Requested interval rotation: add `value` radians every `every`.
///
/// A zero period applies the step once and stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationSpec {
    pub value: f32,
    #[serde(with = "millis")]
    pub every: Duration,
}

impl RotationSpec {
    pub fn new(value: f32, every: Duration) -> Self {
        Self { value, every }
    }
}

//=== IntervalRotation ====================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntervalRotation {
    value: f32,
    every: Duration,
    elapsed: Duration,
    active: bool,
}

impl IntervalRotation {
    /// Starts (or restarts) the rotation, resetting the running period.
    pub fn start(&mut self, spec: RotationSpec) {
        self.value = spec.value;
        self.every = spec.every;
        self.elapsed = Duration::ZERO;
        self.active = spec.value != 0.0 && spec.value.is_finite();
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advances the period by `dt` and returns the step due, if any.
    ///
    /// At most one step is applied per call; periods missed during a long
    /// frame are dropped and only the remainder is carried over.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        if !self.active {
            return 0.0;
        }

        if self.every.is_zero() {
            self.active = false;
            return self.value;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.every {
            return 0.0;
        }

        let remainder = self.elapsed.as_nanos() % self.every.as_nanos();
        self.elapsed = Duration::from_nanos(remainder as u64);

        self.value
    }
}

//=== Rotations ===========================================================

/// Interval rotations for both orientation axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotations {
    pub x: IntervalRotation,
    pub y: IntervalRotation,
}

impl Rotations {
    pub fn axis_mut(&mut self, axis: RotationAxis) -> &mut IntervalRotation {
        match axis {
            RotationAxis::X => &mut self.x,
            RotationAxis::Y => &mut self.y,
        }
    }

    pub fn is_active(&self) -> bool {
        self.x.is_active() || self.y.is_active()
    }
}

//--- Serde Helpers -------------------------------------------------------

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
