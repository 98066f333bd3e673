//! # Route Manifests
//!
//! Declarative route tables loaded from YAML or JSON.
//!
//! ```yaml
//! config:
//!   resolve_cache: true
//! routes:
//!   - template: home
//!     screen: home
//!     resets: true
//!   - template: users/:id
//!     screen: user
//!     shared: true
//!   - template: login
//!     screen: login
//!     modal: true
//!     transition: flip
//!     presentation: form_sheet
//!   - template: logout
//!     callback: logout
//! ```
//!
//! Screen and callback names are looked up in a [`ScreenRegistry`]. Routes are
//! mapped in file order, which is also their resolution order.

use crate::options::RouteOptions;
use crate::router::Router;
use crate::runtime_config::RouterConfig;
use crate::screen::{PlaceholderScreen, RouteCallback, ScreenFactory};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// One route entry
///
/// Unknown keys are rejected so a misspelt option fails the load instead of
/// mapping a route without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestRoute {
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    #[serde(default)]
    pub modal: bool,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub resets: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<String>,
}

impl ManifestRoute {
    /// The route's options in the form `map` accepts
    #[must_use]
    pub fn options(&self) -> RouteOptions {
        RouteOptions {
            modal: self.modal,
            shared: self.shared,
            resets: self.resets,
            transition: self.transition.clone(),
            presentation: self.presentation.clone(),
        }
    }
}

/// A parsed route manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteManifest {
    #[serde(default)]
    pub config: Option<RouterConfig>,
    #[serde(default)]
    pub routes: Vec<ManifestRoute>,
}

impl RouteManifest {
    /// Load a manifest, choosing JSON or YAML by file extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let manifest = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .with_context(|| format!("parsing manifest {}", path.display()))?;

        info!(
            path = %path.display(),
            routes_count = manifest.routes.len(),
            "Route manifest loaded"
        );
        Ok(manifest)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Configuration for a router built from this manifest: the embedded
    /// `config` section, or the environment when absent
    #[must_use]
    pub fn router_config(&self) -> RouterConfig {
        self.config.unwrap_or_else(RouterConfig::from_env)
    }

    /// Build a router and map every route onto it
    pub fn build_router(&self, registry: &ScreenRegistry) -> Result<Router> {
        let router = Router::with_config(self.router_config());
        self.apply(&router, registry)?;
        Ok(router)
    }

    /// Map every route onto `router`, in file order.
    ///
    /// Names and options of all routes are checked before the first one is
    /// mapped, so a bad entry leaves the router untouched.
    pub fn apply(&self, router: &Router, registry: &ScreenRegistry) -> Result<usize> {
        let mut prepared = Vec::with_capacity(self.routes.len());
        for route in &self.routes {
            let template = &route.template;
            let factory = match &route.screen {
                Some(name) => Some(
                    registry
                        .factory(name)
                        .with_context(|| format!("route '{template}': unknown screen '{name}'"))?,
                ),
                None => None,
            };
            let callback = match &route.callback {
                Some(name) => Some(
                    registry
                        .callback(name)
                        .with_context(|| format!("route '{template}': unknown callback '{name}'"))?,
                ),
                None => None,
            };
            if factory.is_none() && callback.is_none() {
                bail!("route '{template}' names neither a screen nor a callback");
            }
            let options = route.options();
            options
                .validate()
                .with_context(|| format!("route '{template}'"))?;
            prepared.push((route, factory, options, callback));
        }

        for (route, factory, options, callback) in prepared {
            router
                .define(&route.template, factory, &options, callback)
                .with_context(|| format!("route '{}'", route.template))?;
        }
        Ok(self.routes.len())
    }
}

/// Named screen factories and callbacks referenced by manifests
#[derive(Debug, Default, Clone)]
pub struct ScreenRegistry {
    screens: HashMap<String, ScreenFactory>,
    callbacks: HashMap<String, RouteCallback>,
    placeholders: bool,
}

impl ScreenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that answers unknown names with placeholders: screens become
    /// [`PlaceholderScreen`]s and callbacks only log their invocation
    #[must_use]
    pub fn with_placeholders() -> Self {
        Self {
            placeholders: true,
            ..Self::default()
        }
    }

    pub fn register_screen(
        &mut self,
        name: impl Into<String>,
        factory: ScreenFactory,
    ) -> &mut Self {
        self.screens.insert(name.into(), factory);
        self
    }

    pub fn register_callback(
        &mut self,
        name: impl Into<String>,
        callback: RouteCallback,
    ) -> &mut Self {
        self.callbacks.insert(name.into(), callback);
        self
    }

    #[must_use]
    pub fn factory(&self, name: &str) -> Option<ScreenFactory> {
        if let Some(factory) = self.screens.get(name) {
            return Some(factory.clone());
        }
        self.placeholders.then(|| {
            debug!(screen = %name, "Using placeholder screen");
            PlaceholderScreen::factory(name)
        })
    }

    #[must_use]
    pub fn callback(&self, name: &str) -> Option<RouteCallback> {
        if let Some(callback) = self.callbacks.get(name) {
            return Some(callback.clone());
        }
        self.placeholders.then(|| {
            let name = name.to_string();
            RouteCallback::with_params(move |params| {
                info!(callback = %name, params = ?params, "Placeholder callback invoked");
            })
        })
    }
}
