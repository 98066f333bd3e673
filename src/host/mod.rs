//! # Host Module
//!
//! Collaborator contracts the router drives but never owns.
//!
//! - [`StackHost`] - the navigation/presentation stack (push/pop, modal
//!   present/dismiss). The router holds it through an attachable slot and may
//!   run with none attached (navigation then fails with `Detached`).
//! - [`UrlOpener`] - hands absolute URLs to the operating environment.
//!
//! Commands are fire-and-forget: the router issues them and returns without
//! waiting for animations, and hosts never call back into the router.
//!
//! [`MemoryStackHost`] and [`RecordingUrlOpener`] are in-memory implementations
//! for headless use, the `routable simulate` command, and tests.

mod memory;

pub use memory::{HostCommand, MemoryStackHost, NavigationContainer, RecordingUrlOpener, ScreenRef};

use crate::screen::ScreenHandle;
use url::Url;

/// The external navigation/presentation stack
///
/// Methods take `&self`; implementations use interior mutability and must
/// tolerate being called from whichever thread the router runs on.
pub trait StackHost: Send + Sync {
    /// Current navigation stack, bottom first
    fn screens(&self) -> Vec<ScreenHandle>;

    fn push(&self, screen: ScreenHandle, animated: bool);

    /// Pop the top screen. Popping an empty stack is up to the host.
    fn pop(&self, animated: bool);

    /// Pop until `screen` is on top
    fn pop_to(&self, screen: &ScreenHandle, animated: bool);

    fn replace_all(&self, screens: Vec<ScreenHandle>, animated: bool);

    /// Present `screen` modally over the stack
    fn present(&self, screen: ScreenHandle, animated: bool);

    fn dismiss_presented(&self, animated: bool);

    /// The modally presented screen, if any
    fn presented(&self) -> Option<ScreenHandle>;

    /// Create a fresh navigation container holding `root` as its only screen,
    /// pushed without animation
    fn wrap_in_container(&self, root: ScreenHandle) -> ScreenHandle;

    fn is_presenting(&self) -> bool {
        self.presented().is_some()
    }
}

/// Opens URLs outside the navigation stack (e.g. an external browser)
pub trait UrlOpener: Send + Sync {
    fn open_url(&self, url: &Url);
}
