//! Route table - insertion-ordered template registry.

use super::pattern::RouteTemplate;
use crate::error::Result;
use crate::options::{RouteDirectives, RouteOptions};
use crate::screen::{RouteCallback, ScreenFactory};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything registered for one template
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub template: RouteTemplate,
    pub factory: Option<ScreenFactory>,
    pub directives: RouteDirectives,
    /// Takes precedence over `factory` at open time
    pub callback: Option<RouteCallback>,
}

impl RouteDescriptor {
    #[must_use]
    pub fn is_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Serializable summary for listings
    #[must_use]
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            template: self.template.as_str().to_string(),
            target: if self.callback.is_some() {
                "callback"
            } else if self.factory.is_some() {
                "screen"
            } else {
                "none"
            },
            directives: self.directives,
        }
    }
}

/// Listing row for a registered route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub template: String,
    pub target: &'static str,
    #[serde(flatten)]
    pub directives: RouteDirectives,
}

/// Insertion-ordered mapping of template string to descriptor
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<Arc<RouteDescriptor>>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the descriptor for `template`.
    ///
    /// Options are validated before anything is stored. Re-defining an
    /// existing template replaces its descriptor but keeps its original
    /// position in resolution order.
    pub fn define(
        &mut self,
        template: &str,
        factory: Option<ScreenFactory>,
        options: &RouteOptions,
        callback: Option<RouteCallback>,
    ) -> Result<Arc<RouteDescriptor>> {
        let directives = options.validate()?;
        let descriptor = Arc::new(RouteDescriptor {
            template: RouteTemplate::parse(template),
            factory,
            directives,
            callback,
        });

        match self.index.get(template) {
            Some(&pos) => {
                debug!(template = %template, position = pos, "Route redefined");
                self.entries[pos] = Arc::clone(&descriptor);
            }
            None => {
                self.index.insert(template.to_string(), self.entries.len());
                self.entries.push(Arc::clone(&descriptor));
            }
        }

        info!(
            template = %template,
            modal = directives.modal,
            shared = directives.shared,
            resets = directives.resets,
            callback = descriptor.is_callback(),
            routes_count = self.entries.len(),
            "Route mapped"
        );
        Ok(descriptor)
    }

    #[must_use]
    pub fn get(&self, template: &str) -> Option<Arc<RouteDescriptor>> {
        self.index
            .get(template)
            .map(|&pos| Arc::clone(&self.entries[pos]))
    }

    /// Descriptors in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteDescriptor>> {
        self.entries.iter()
    }

    #[must_use]
    pub fn templates(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|d| d.template.as_str().to_string())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterError;
    use crate::screen::PlaceholderScreen;

    #[test]
    fn test_define_preserves_insertion_order() {
        let mut table = RouteTable::new();
        for t in ["users", "users/:id", "about"] {
            table
                .define(
                    t,
                    Some(PlaceholderScreen::factory(t)),
                    &RouteOptions::new(),
                    None,
                )
                .unwrap();
        }
        assert_eq!(table.templates(), vec!["users", "users/:id", "about"]);
    }

    #[test]
    fn test_redefine_overwrites_in_place() {
        let mut table = RouteTable::new();
        let opts = RouteOptions::new();
        table
            .define("a", Some(PlaceholderScreen::factory("a")), &opts, None)
            .unwrap();
        table
            .define("b", Some(PlaceholderScreen::factory("b")), &opts, None)
            .unwrap();
        table
            .define(
                "a",
                None,
                &RouteOptions::new().modal(),
                Some(RouteCallback::new(|| {})),
            )
            .unwrap();

        assert_eq!(table.templates(), vec!["a", "b"]);
        let a = table.get("a").unwrap();
        assert!(a.directives.modal);
        assert!(a.is_callback());
    }

    #[test]
    fn test_invalid_option_stores_nothing() {
        let mut table = RouteTable::new();
        let err = table
            .define(
                "x",
                Some(PlaceholderScreen::factory("x")),
                &RouteOptions::new().transition("bogus"),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidOption { .. }));
        assert!(table.is_empty());
        assert!(table.get("x").is_none());
    }

    #[test]
    fn test_summary_target() {
        let mut table = RouteTable::new();
        let d = table
            .define(
                "logout",
                None,
                &RouteOptions::new(),
                Some(RouteCallback::new(|| {})),
            )
            .unwrap();
        let s = d.summary();
        assert_eq!(s.target, "callback");
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["template"], "logout");
        assert_eq!(json["modal"], false);
    }
}
