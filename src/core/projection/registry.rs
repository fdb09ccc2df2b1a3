//=========================================================================
// Projection Registry
//=========================================================================
//
// Stores projection handlers by kind and runs the activation protocol.
//
// Handlers are registered once and referenced by kind, so a handler
// keeps its own state between activations. Only one projection is
// current at a time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::animation::AnimationController;
use super::{
    Activation, AnimationStatus, NotApplicable, ProjectionContext, ProjectionHandler,
    ProjectionKind, ProjectionScope,
};
use crate::core::state::{AccessPolicy, StateUpdate};

//=== ProjectionRegistry ==================================================

pub struct ProjectionRegistry {
    handlers: HashMap<ProjectionKind, Box<dyn ProjectionHandler>>,
    current: Option<ProjectionKind>,
    animation: AnimationController,
}

impl ProjectionRegistry {
    //--- Construction -----------------------------------------------------

    /// Creates an empty registry with no current projection.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            current: None,
            animation: AnimationController::new(),
        }
    }

    /// Creates a registry holding the four built-in projections.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.define(ProjectionKind::Flat, super::Flat);
        registry.define(ProjectionKind::Fisheye, super::Fisheye::new());
        registry.define(ProjectionKind::Equilinear, super::Equilinear);
        registry.define(ProjectionKind::TinyPlanet, super::TinyPlanet);
        registry
    }

    //--- Registration -----------------------------------------------------

    /// Registers `handler` under `kind`, replacing any previous handler.
    pub fn define<H>(&mut self, kind: ProjectionKind, handler: H)
    where
        H: ProjectionHandler + 'static,
    {
        debug!(target: "projection", "Defining projection {}", kind);
        if self.handlers.insert(kind.clone(), Box::new(handler)).is_some() {
            warn!(target: "projection", "Projection {} was already defined and has been replaced", kind);
        }
    }

    //--- Activation -------------------------------------------------------

    /// Activates `kind`.
    ///
    /// A veto leaves the current projection, the installed policy and any
    /// running animation untouched. Success supersedes the running
    /// animation, installs the handler's constraints and starts its
    /// animation if it asked for one.
    pub fn apply(
        &mut self,
        kind: &ProjectionKind,
        scope: ProjectionScope<'_>,
    ) -> Result<Activation, NotApplicable> {
        let Some(handler) = self.handlers.get_mut(kind) else {
            debug!(target: "projection", "Projection {} is not registered", kind);
            return Err(NotApplicable::Unregistered);
        };

        if self.current.as_ref() == Some(kind) {
            return Err(NotApplicable::AlreadyActive);
        }

        let mut ctx = ProjectionContext::new(scope, self.current.clone(), AccessPolicy::unrestricted());

        if let Err(reason) = handler.try_activate(&mut ctx) {
            debug!(target: "projection", "Projection {} declined: {}", kind, reason);
            return Err(reason);
        }

        let (state, policy, animate) = ctx.into_outcome();

        self.animation.cancel();
        state.set_policy(policy);
        state.set_requested_projection(Some(kind.clone()));
        self.current = Some(kind.clone());

        info!(target: "projection", "Projection changed to {}", kind);

        if animate {
            self.animation.animate(kind.clone());
            state.update(StateUpdate::Animating(true));
            Ok(Activation::Animating)
        } else {
            state.update(StateUpdate::Animating(false));
            Ok(Activation::Active)
        }
    }

    //--- Animation --------------------------------------------------------

    /// Runs one frame of the current animation, if any.
    pub fn tick(&mut self, scope: ProjectionScope<'_>) -> Option<AnimationStatus> {
        let owner = self.animation.owner()?.clone();

        let Some(handler) = self.handlers.get_mut(&owner) else {
            warn!(target: "projection", "Animation owner {} has no handler", owner);
            self.animation.cancel();
            scope.state.update(StateUpdate::Animating(false));
            return None;
        };

        let policy = scope.state.policy().clone();
        let mut ctx = ProjectionContext::new(scope, self.current.clone(), policy);

        self.animation.advance();
        let status = handler.tick(&mut ctx);

        let (state, policy, _) = ctx.into_outcome();
        state.set_policy(policy);

        if status == AnimationStatus::Done {
            self.animation.cancel();
            state.update(StateUpdate::Animating(false));
        }

        Some(status)
    }

    /// Cancels the running animation. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.animation.cancel()
    }

    //--- Teardown ---------------------------------------------------------

    /// Cancels any animation and forgets the current projection.
    ///
    /// Handlers stay registered.
    pub fn clear(&mut self) {
        self.animation.cancel();
        if let Some(kind) = self.current.take() {
            debug!(target: "projection", "Cleared current projection {}", kind);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains(&self, kind: &ProjectionKind) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn current(&self) -> Option<&ProjectionKind> {
        self.current.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }
}

impl Default for ProjectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
