//! # routable
//!
//! **routable** maps URL-like paths (`users/42`, `login`, `logout/7`) to screens
//! and drives a navigation/presentation stack owned by the host UI framework.
//!
//! ## Overview
//!
//! Routes are registered as templates with literal and `:param` segments. Each
//! route targets a screen factory or an inline callback and carries a small set
//! of directives:
//!
//! - `modal` - present the screen modally, wrapped in a navigation container
//! - `shared` - keep one live screen per path until the screen unloads
//! - `resets` - replace the whole stack with the screen
//! - `transition` / `presentation` - modal styles, validated when mapped
//!
//! Opening a path resolves it (first registered matching template wins),
//! builds or reuses the screen, and issues push, pop-to, replace or
//! present/dismiss commands to the attached [`host::StackHost`].
//!
//! ## Architecture
//!
//! - **[`router`]** - pattern matching, route table, resolution cache,
//!   transition controller and the [`router::Router`] facade
//! - **[`screen`]** - the screen abstraction, factories, callbacks and the
//!   shared-instance cache
//! - **[`host`]** - stack host and URL opener contracts, with in-memory
//!   implementations
//! - **[`options`]** - typed route options and style enums
//! - **[`manifest`]** - YAML/JSON route manifests
//! - **[`runtime_config`]** / **[`logging`]** - environment driven configuration
//! - **[`cli`]** - the `routable` command line tool
//!
//! ### Open Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router
//!     participant Resolver as OptionsResolver
//!     participant Cache as ScreenCache
//!     participant Ctl as TransitionController
//!     participant Host as StackHost
//!
//!     Caller->>Router: open("users/42", animated)
//!     Router->>Resolver: resolve(path)
//!     Resolver-->>Router: ResolvedRoute {descriptor, params}
//!     alt callback route
//!         Router->>Router: invoke callback(params)
//!         Router-->>Caller: Opened::Callback
//!     end
//!     Router->>Cache: get(path) (shared routes)
//!     Router->>Router: factory.build(params), configurator
//!     Router->>Ctl: apply(screen, directives)
//!     Ctl->>Host: dismiss / replace_all / present / pop_to / push
//!     Router-->>Caller: Opened::Navigated
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use routable::host::MemoryStackHost;
//! use routable::options::RouteOptions;
//! use routable::router::Router;
//! use routable::screen::PlaceholderScreen;
//! use std::sync::Arc;
//!
//! let router = Router::new();
//! router.map("home", PlaceholderScreen::factory("home"), RouteOptions::new().resets()).unwrap();
//! router.map("users/:id", PlaceholderScreen::factory("user"), RouteOptions::new()).unwrap();
//!
//! let host = Arc::new(MemoryStackHost::new());
//! router.attach_stack_host(host.clone());
//! router.open("home", false).unwrap();
//! router.open("users/42", true).unwrap();
//! assert_eq!(host.stack_titles(), vec!["home", "user"]);
//!
//! assert!(router.open("nowhere", true).unwrap_err().is_not_found());
//! ```
//!
//! ## Logging
//!
//! Every resolution and navigation emits `tracing` events. Binaries install a
//! subscriber with [`logging::init_logging_with_config`].

pub mod cli;
pub mod error;
pub mod host;
pub mod ids;
pub mod logging;
pub mod manifest;
pub mod options;
pub mod router;
pub mod runtime_config;
pub mod screen;

pub use error::{Result, RouterError};
pub use manifest::{RouteManifest, ScreenRegistry};
pub use options::{PresentationStyle, RouteDirectives, RouteOptions, TransitionStyle};
pub use router::{Opened, Router};
pub use screen::{RouteCallback, Screen, ScreenFactory, ScreenHandle, ScreenState};
