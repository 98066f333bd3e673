//! Stack transition controller.
//!
//! Decides how a resolved screen reaches the stack host and issues the
//! commands. Planning is a pure function of the host state and the route
//! directives ([`TransitionPlan::compute`]); applying a plan happens under a
//! transition lock so concurrent `open`/`pop` requests reach the host one at a
//! time.
//!
//! Plan rules, in order:
//!
//! 1. A presented modal is dismissed first. When the route is modal and the
//!    open is animated, that dismissal is forced to be non-animated so two
//!    animations never overlap.
//! 2. `resets` replaces the whole stack with the screen.
//! 3. `modal` presents the screen, wrapping it in a fresh navigation container
//!    unless it already is one.
//! 4. A screen already on the stack is popped back to, anything else is pushed.

use crate::error::{Result, RouterError};
use crate::host::StackHost;
use crate::options::RouteDirectives;
use crate::screen::{same_screen, ScreenHandle};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Modal state of the stack host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackState {
    NoModalPresented,
    ModalPresented,
}

impl StackState {
    #[must_use]
    pub fn of(host: &dyn StackHost) -> Self {
        if host.is_presenting() {
            StackState::ModalPresented
        } else {
            StackState::NoModalPresented
        }
    }
}

/// The stack command that delivers the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StackAction {
    ReplaceAll { animated: bool },
    Present { wrap: bool, animated: bool },
    PopTo { animated: bool },
    Push { animated: bool },
}

/// Commands to issue for one `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionPlan {
    /// Dismiss the presented modal first, with this `animated` flag
    pub dismiss: Option<bool>,
    #[serde(flatten)]
    pub action: StackAction,
}

impl TransitionPlan {
    #[must_use]
    pub fn compute(
        state: StackState,
        directives: &RouteDirectives,
        screen_is_container: bool,
        screen_in_stack: bool,
        animated: bool,
    ) -> Self {
        let dismiss = match state {
            StackState::ModalPresented => Some(animated && !directives.modal),
            StackState::NoModalPresented => None,
        };

        let action = if directives.resets {
            StackAction::ReplaceAll { animated }
        } else if directives.modal {
            StackAction::Present {
                wrap: !screen_is_container,
                animated,
            }
        } else if screen_in_stack {
            StackAction::PopTo { animated }
        } else {
            StackAction::Push { animated }
        };

        Self { dismiss, action }
    }
}

/// What `pop` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopOutcome {
    DismissedModal,
    PoppedScreen,
}

/// Holds the attachable stack host and serializes transitions against it
#[derive(Default)]
pub struct TransitionController {
    host: RwLock<Option<Arc<dyn StackHost>>>,
    lock: Mutex<()>,
}

impl TransitionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `host`, returning the previously attached one
    pub fn attach(&self, host: Arc<dyn StackHost>) -> Option<Arc<dyn StackHost>> {
        info!("Stack host attached");
        self.host.write().replace(host)
    }

    pub fn detach(&self) -> Option<Arc<dyn StackHost>> {
        let previous = self.host.write().take();
        if previous.is_some() {
            info!("Stack host detached");
        }
        previous
    }

    #[must_use]
    pub fn host(&self) -> Option<Arc<dyn StackHost>> {
        self.host.read().as_ref().map(Arc::clone)
    }

    fn require_host(&self) -> Result<Arc<dyn StackHost>> {
        self.host().ok_or(RouterError::Detached {
            collaborator: "stack host",
        })
    }

    /// Modal state of the attached host
    pub fn state(&self) -> Result<StackState> {
        Ok(StackState::of(self.require_host()?.as_ref()))
    }

    /// Plan and issue the commands that bring `screen` on screen
    pub fn apply(
        &self,
        screen: ScreenHandle,
        directives: &RouteDirectives,
        animated: bool,
    ) -> Result<TransitionPlan> {
        let host = self.require_host()?;
        let _guard = self.lock.lock();

        let in_stack = host
            .screens()
            .iter()
            .any(|s| same_screen(s.as_ref(), screen.as_ref()));
        let plan = TransitionPlan::compute(
            StackState::of(host.as_ref()),
            directives,
            screen.is_navigation_container(),
            in_stack,
            animated,
        );
        debug!(screen_id = %screen.id(), plan = ?plan, "Transition planned");

        if let Some(dismiss_animated) = plan.dismiss {
            host.dismiss_presented(dismiss_animated);
        }

        match plan.action {
            StackAction::ReplaceAll { animated } => {
                host.replace_all(vec![Arc::clone(&screen)], animated)
            }
            StackAction::Present { wrap, animated } => {
                let target = if wrap {
                    let wrapper = host.wrap_in_container(Arc::clone(&screen));
                    let (from, to) = (screen.state(), wrapper.state());
                    to.set_transition_style(from.transition_style());
                    to.set_presentation_style(from.presentation_style());
                    wrapper
                } else {
                    Arc::clone(&screen)
                };
                host.present(target, animated);
            }
            StackAction::PopTo { animated } => host.pop_to(&screen, animated),
            StackAction::Push { animated } => host.push(Arc::clone(&screen), animated),
        }

        info!(
            screen_id = %screen.id(),
            screen = %screen.title(),
            action = ?plan.action,
            dismissed = plan.dismiss.is_some(),
            "Navigation applied"
        );
        Ok(plan)
    }

    /// Dismiss the presented modal, or pop the top screen when none is presented
    pub fn pop(&self, animated: bool) -> Result<PopOutcome> {
        let host = self.require_host()?;
        let _guard = self.lock.lock();

        let outcome = if host.is_presenting() {
            host.dismiss_presented(animated);
            PopOutcome::DismissedModal
        } else {
            host.pop(animated);
            PopOutcome::PoppedScreen
        };
        info!(outcome = ?outcome, animated, "Pop applied");
        Ok(outcome)
    }
}

impl std::fmt::Debug for TransitionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionController")
            .field("attached", &self.host.read().is_some())
            .finish()
    }
}
