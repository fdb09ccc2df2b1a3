//=========================================================================
// Animation Controller
//=========================================================================
//
// Tracks the single running projection animation.
//
// At most one animation exists at a time. Starting a new one supersedes
// the old; cancelling is idempotent. The controller owns no timers; the
// registry advances it once per render tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::ProjectionKind;

//=== AnimationHandle =====================================================

/// A running animation and the projection driving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationHandle {
    pub owner: ProjectionKind,
    pub ticks: u64,
}

//=== AnimationController =================================================

#[derive(Debug, Default)]
pub struct AnimationController {
    running: Option<AnimationHandle>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an animation owned by `owner`, replacing any running one.
    pub fn animate(&mut self, owner: ProjectionKind) -> &AnimationHandle {
        if let Some(previous) = self.running.take() {
            debug!(target: "projection", "Animation for {} superseded by {}", previous.owner, owner);
        }
        self.running.insert(AnimationHandle { owner, ticks: 0 })
    }

    /// Stops the running animation. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.running.take() {
            Some(handle) => {
                debug!(
                    target: "projection",
                    "Animation for {} cancelled after {} ticks", handle.owner, handle.ticks
                );
                true
            }
            None => false,
        }
    }

    /// Counts one frame for the running animation.
    pub fn advance(&mut self) -> Option<&AnimationHandle> {
        let handle = self.running.as_mut()?;
        handle.ticks += 1;
        Some(handle)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn owner(&self) -> Option<&ProjectionKind> {
        self.running.as_ref().map(|handle| &handle.owner)
    }

    pub fn handle(&self) -> Option<&AnimationHandle> {
        self.running.as_ref()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
