//=========================================================================
// Access Policy
//=========================================================================
//
// Constraint set produced by the active projection.
//
// The policy is an advisory lock: every writer that goes through the
// state store is checked against it, but nothing stops code holding the
// raw fields from bypassing it.
//
// Consumers:
//   StateStore::update       → x / y axis locks
//   StateStore::merge_cache  → cache lock
//   CoordinateMapper         → panoramic flag, locked keys
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use crate::core::input::KeyCode;

//=== Constraint ==========================================================

/// Individual constraint that can be queried on an [`AccessPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Horizontal pointer coordinate rejects external writes.
    AxisX,

    /// Vertical pointer coordinate rejects external writes.
    AxisY,

    /// Cache merges are no-ops.
    Cache,

    /// Refresh pins the pointer instead of normalizing it.
    NonPanoramic,

    /// Keyboard key is ignored by keyboard control.
    Key(KeyCode),
}

//=== AccessPolicy ========================================================

/// Per-projection write constraints.
///
/// Replaced wholesale whenever a projection activates. Handlers may also
/// mutate it mid-transition (tiny planet swaps its axis locks after the
/// first tick). The default value is the unrestricted policy installed
/// when no projection is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub x: bool,
    pub y: bool,
    pub cache: bool,
    pub panoramic: bool,
    pub keys: HashSet<KeyCode>,
}

impl AccessPolicy {
    //--- Construction -----------------------------------------------------

    /// Nothing locked, panoramic refresh enabled.
    pub fn unrestricted() -> Self {
        Self {
            x: false,
            y: false,
            cache: false,
            panoramic: true,
            keys: HashSet::new(),
        }
    }

    pub fn lock_x(mut self, locked: bool) -> Self {
        self.x = locked;
        self
    }

    pub fn lock_y(mut self, locked: bool) -> Self {
        self.y = locked;
        self
    }

    pub fn lock_cache(mut self, locked: bool) -> Self {
        self.cache = locked;
        self
    }

    pub fn panoramic(mut self, panoramic: bool) -> Self {
        self.panoramic = panoramic;
        self
    }

    /// Adds keys to the locked set.
    pub fn lock_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = KeyCode>,
    {
        self.keys.extend(keys);
        self
    }

    //--- Queries ----------------------------------------------------------

    /// Returns whether the policy currently asserts `constraint`.
    pub fn is_constrained_with(&self, constraint: Constraint) -> bool {
        match constraint {
            Constraint::AxisX => self.x,
            Constraint::AxisY => self.y,
            Constraint::Cache => self.cache,
            Constraint::NonPanoramic => !self.panoramic,
            Constraint::Key(key) => self.keys.contains(&key),
        }
    }

    /// Returns `true` if keyboard control may act on `key`.
    pub fn allows_key(&self, key: KeyCode) -> bool {
        !self.keys.contains(&key)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::unrestricted()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unrestricted() {
        let policy = AccessPolicy::default();
        assert!(!policy.is_constrained_with(Constraint::AxisX));
        assert!(!policy.is_constrained_with(Constraint::AxisY));
        assert!(!policy.is_constrained_with(Constraint::Cache));
        assert!(!policy.is_constrained_with(Constraint::NonPanoramic));
        assert!(policy.allows_key(KeyCode::ArrowLeft));
    }

    #[test]
    fn builder_sets_each_flag() {
        let policy = AccessPolicy::unrestricted()
            .lock_x(true)
            .lock_cache(true)
            .panoramic(false)
            .lock_keys([KeyCode::KeyH, KeyCode::KeyL]);

        assert!(policy.is_constrained_with(Constraint::AxisX));
        assert!(!policy.is_constrained_with(Constraint::AxisY));
        assert!(policy.is_constrained_with(Constraint::Cache));
        assert!(policy.is_constrained_with(Constraint::NonPanoramic));
        assert!(policy.is_constrained_with(Constraint::Key(KeyCode::KeyH)));
        assert!(!policy.allows_key(KeyCode::KeyL));
        assert!(policy.allows_key(KeyCode::ArrowUp));
    }
}
