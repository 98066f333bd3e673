//! # Router Module
//!
//! Maps string paths to screens and drives the navigation stack.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route templates (`users/:id`) into matchable segments
//! - Resolving a path to the first registered matching route, with the path
//!   parameters it binds
//! - Caching one live screen per path for `shared` routes
//! - Turning a resolved screen plus its route directives into push, pop-to,
//!   replace or modal present/dismiss commands on the stack host
//!
//! ## Architecture
//!
//! - [`pattern`] - template compilation and matching
//! - [`table`] - insertion-ordered route registry
//! - [`resolver`] - path resolution with a per-path memo
//! - [`transition`] - transition planning and the serialized stack controller
//! - [`Router`] - the facade composing the above
//!
//! ## Example
//!
//! ```rust
//! use routable::host::MemoryStackHost;
//! use routable::options::RouteOptions;
//! use routable::router::{Opened, Router};
//! use routable::screen::{PlaceholderScreen, RouteCallback};
//! use std::sync::Arc;
//!
//! let router = Router::new();
//! router.map("home", PlaceholderScreen::factory("home"), RouteOptions::new().resets()).unwrap();
//! router.map("login", PlaceholderScreen::factory("login"), RouteOptions::new().modal()).unwrap();
//! router.map_callback("logout", RouteCallback::new(|| {}), RouteOptions::new()).unwrap();
//!
//! let host = Arc::new(MemoryStackHost::new());
//! router.attach_stack_host(host.clone());
//!
//! router.open("home", false).unwrap();
//! router.open("login", true).unwrap();
//! assert!(matches!(router.open("logout", true).unwrap(), Opened::Callback { arity: 0 }));
//! assert_eq!(host.stack_len(), 1);
//! ```
//!
//! ## Performance
//!
//! Uncached resolution is a linear scan over the table (O(routes x segments)).
//! Successful resolutions are memoized per exact path, so repeated opens of
//! the same path cost one hash lookup.

mod core;
pub mod pattern;
pub mod resolver;
pub mod table;
#[cfg(test)]
mod tests;
pub mod transition;

pub use self::core::{default_router, install_default, take_default, Opened, Router};
pub use pattern::{matches, PatternMatch, RouteParams, RouteTemplate, Segment};
pub use resolver::{OptionsResolver, ResolvedRoute};
pub use table::{RouteDescriptor, RouteSummary, RouteTable};
pub use transition::{PopOutcome, StackAction, StackState, TransitionController, TransitionPlan};
