//! # Runtime Configuration Module
//!
//! Environment-driven tuning for the router's resolution path.
//!
//! ## Environment Variables
//!
//! ### `ROUTABLE_RESOLVE_CACHE`
//!
//! `on` (default) memoizes every successful path resolution. `off` makes each
//! call scan the route table, which also sidesteps stale resolutions after a
//! template is re-mapped. Accepts `on|off|true|false|1|0`.
//!
//! ### `ROUTABLE_SLOW_RESOLVE_US`
//!
//! Resolutions slower than this many microseconds are logged at `warn`.
//! Default: `1000`.
//!
//! ## Usage
//!
//! ```rust
//! use routable::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("resolve cache: {}", config.resolve_cache);
//! ```
//!
//! The same fields can be embedded in a route manifest under `config:`.

use serde::{Deserialize, Serialize};
use std::env;

/// Default slow-resolution threshold in microseconds
pub const DEFAULT_SLOW_RESOLVE_US: u64 = 1000;

/// Router runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Memoize successful resolutions per exact path (default: on)
    pub resolve_cache: bool,
    /// Warn when a resolution takes longer than this (default: 1000us)
    pub slow_resolve_us: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            resolve_cache: true,
            slow_resolve_us: DEFAULT_SLOW_RESOLVE_US,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let resolve_cache = lookup("ROUTABLE_RESOLVE_CACHE")
            .and_then(|v| parse_switch(&v))
            .unwrap_or(defaults.resolve_cache);
        let slow_resolve_us = lookup("ROUTABLE_SLOW_RESOLVE_US")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.slow_resolve_us);
        RouterConfig {
            resolve_cache,
            slow_resolve_us,
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
