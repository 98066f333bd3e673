//! Options resolver - path to descriptor resolution with a per-path cache.
//!
//! Resolution scans the route table in insertion order and stops at the first
//! template that matches, so among ambiguous templates the one mapped first
//! wins.
//!
//! Successful resolutions are memoized by the exact path string. The cache is
//! never invalidated by `map`: a path resolved before a template was re-mapped
//! keeps its original resolution until [`OptionsResolver::clear`] is called.
//! Failed resolutions are never cached.

use super::pattern::{split_segments, RouteParams};
use super::table::{RouteDescriptor, RouteTable};
use crate::error::{Result, RouterError};
use crate::runtime_config::RouterConfig;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A path resolved against the route table
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub descriptor: Arc<RouteDescriptor>,
    pub params: RouteParams,
    pub matched_path: String,
}

impl ResolvedRoute {
    /// Template string of the matched route
    #[must_use]
    pub fn template(&self) -> &str {
        self.descriptor.template.as_str()
    }
}

impl Serialize for ResolvedRoute {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ResolvedRoute", 4)?;
        s.serialize_field("path", &self.matched_path)?;
        s.serialize_field("template", self.template())?;
        s.serialize_field("params", &self.params)?;
        s.serialize_field("route", &self.descriptor.summary())?;
        s.end()
    }
}

/// Resolves paths and memoizes the results
#[derive(Debug)]
pub struct OptionsResolver {
    cache: Mutex<HashMap<String, Arc<ResolvedRoute>>>,
    enabled: bool,
    slow_threshold: Duration,
}

impl Default for OptionsResolver {
    fn default() -> Self {
        Self::new(&RouterConfig::default())
    }
}

impl OptionsResolver {
    #[must_use]
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            enabled: config.resolve_cache,
            slow_threshold: Duration::from_micros(config.slow_resolve_us),
        }
    }

    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.enabled
    }

    /// Resolve `path`, consulting the cache first
    pub fn resolve(&self, table: &RouteTable, path: &str) -> Result<Arc<ResolvedRoute>> {
        if self.enabled {
            if let Some(hit) = self.cache.lock().get(path) {
                debug!(path = %path, template = %hit.template(), "Resolution cache hit");
                return Ok(Arc::clone(hit));
            }
        }

        debug!(path = %path, routes_count = table.len(), "Route resolution attempt");
        let start = Instant::now();
        let found = scan(table, path);
        let elapsed = start.elapsed();

        let Some((descriptor, params)) = found else {
            warn!(
                path = %path,
                routes_count = table.len(),
                duration_us = elapsed.as_micros(),
                "No route matched"
            );
            return Err(RouterError::not_found(path));
        };

        if elapsed > self.slow_threshold {
            warn!(
                path = %path,
                template = %descriptor.template,
                params = ?params,
                duration_us = elapsed.as_micros(),
                "Slow route resolution detected"
            );
        } else {
            info!(
                path = %path,
                template = %descriptor.template,
                params = ?params,
                duration_us = elapsed.as_micros(),
                "Route matched"
            );
        }

        let resolved = Arc::new(ResolvedRoute {
            descriptor,
            params,
            matched_path: path.to_string(),
        });
        if self.enabled {
            // Another caller may have resolved the same path concurrently; keep the first
            let mut cache = self.cache.lock();
            let entry = cache
                .entry(path.to_string())
                .or_insert_with(|| Arc::clone(&resolved));
            return Ok(Arc::clone(entry));
        }
        Ok(resolved)
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    #[must_use]
    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.lock().contains_key(path)
    }

    /// Forget every memoized resolution
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        info!(entries = cache.len(), "Resolution cache cleared");
        cache.clear();
    }
}

/// First template, in insertion order, that matches `path`
fn scan(table: &RouteTable, path: &str) -> Option<(Arc<RouteDescriptor>, RouteParams)> {
    let parts = split_segments(path);
    table.iter().find_map(|descriptor| {
        descriptor
            .template
            .match_segments(&parts)
            .map(|params| (Arc::clone(descriptor), params))
    })
}
