//! Router facade - the public `map` / `open` / `pop` / `open_external` surface.

use super::resolver::{OptionsResolver, ResolvedRoute};
use super::table::{RouteDescriptor, RouteTable};
use super::transition::{PopOutcome, TransitionController, TransitionPlan};
use crate::error::{Result, RouterError};
use crate::host::{StackHost, UrlOpener};
use crate::options::{RouteDirectives, RouteOptions};
use crate::runtime_config::RouterConfig;
use crate::screen::{RouteCallback, ScreenCache, ScreenFactory, ScreenHandle};
use arc_swap::ArcSwapOption;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Result of a successful `open`
#[derive(Debug, Clone)]
pub enum Opened {
    /// The route's inline callback ran; the stack was not touched
    Callback { arity: usize },
    /// The screen was delivered to the stack host
    Navigated {
        screen: ScreenHandle,
        plan: TransitionPlan,
    },
}

impl Opened {
    /// The navigated screen, if any
    #[must_use]
    pub fn screen(&self) -> Option<&ScreenHandle> {
        match self {
            Opened::Navigated { screen, .. } => Some(screen),
            Opened::Callback { .. } => None,
        }
    }
}

/// URL-pattern router driving a navigation stack
///
/// Construct one explicitly and pass it to whatever needs it. A process-wide
/// default can be installed with [`install_default`].
///
/// # Example
///
/// ```
/// use routable::host::MemoryStackHost;
/// use routable::options::RouteOptions;
/// use routable::router::Router;
/// use routable::screen::PlaceholderScreen;
/// use std::sync::Arc;
///
/// let router = Router::new();
/// router.map("users/:id", PlaceholderScreen::factory("user"), RouteOptions::new()).unwrap();
///
/// let host = Arc::new(MemoryStackHost::new());
/// router.attach_stack_host(host.clone());
/// router.open("users/42", true).unwrap();
/// assert_eq!(host.stack_titles(), vec!["user"]);
/// ```
pub struct Router {
    config: RouterConfig,
    table: RwLock<RouteTable>,
    resolver: OptionsResolver,
    screens: ScreenCache,
    transitions: TransitionController,
    url_opener: RwLock<Option<Arc<dyn UrlOpener>>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Router with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Router configured from `ROUTABLE_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_config(RouterConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        debug!(config = ?config, "Router created");
        Self {
            config,
            table: RwLock::new(RouteTable::new()),
            resolver: OptionsResolver::new(&config),
            screens: ScreenCache::new(),
            transitions: TransitionController::new(),
            url_opener: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Attach the navigation stack, replacing any previous one
    pub fn attach_stack_host(&self, host: Arc<dyn StackHost>) -> Option<Arc<dyn StackHost>> {
        self.transitions.attach(host)
    }

    pub fn detach_stack_host(&self) -> Option<Arc<dyn StackHost>> {
        self.transitions.detach()
    }

    #[must_use]
    pub fn stack_host(&self) -> Option<Arc<dyn StackHost>> {
        self.transitions.host()
    }

    /// Set (or clear) the opener used by [`Router::open_external`]
    pub fn set_url_opener(&self, opener: Option<Arc<dyn UrlOpener>>) {
        *self.url_opener.write() = opener;
    }

    /// Map `template` to a screen factory
    pub fn map(&self, template: &str, factory: ScreenFactory, options: RouteOptions) -> Result<()> {
        self.define(template, Some(factory), &options, None)
            .map(|_| ())
    }

    /// Map `template` to an inline callback
    pub fn map_callback(
        &self,
        template: &str,
        callback: RouteCallback,
        options: RouteOptions,
    ) -> Result<()> {
        self.define(template, None, &options, Some(callback))
            .map(|_| ())
    }

    /// Register a route with any combination of factory and callback.
    ///
    /// Fails with `InvalidOption` before anything is stored. Re-mapping a
    /// template does not touch resolutions already cached for concrete paths.
    pub fn define(
        &self,
        template: &str,
        factory: Option<ScreenFactory>,
        options: &RouteOptions,
        callback: Option<RouteCallback>,
    ) -> Result<Arc<RouteDescriptor>> {
        self.table
            .write()
            .define(template, factory, options, callback)
    }

    /// Open `path`
    pub fn open(&self, path: &str, animated: bool) -> Result<Opened> {
        self.open_with(path, animated, |_| {})
    }

    /// Open `path`, running `configurator` on the screen after construction
    /// and before it reaches the stack.
    ///
    /// Callback routes run their callback and return without touching the
    /// stack; the configurator is not called for them.
    pub fn open_with<F>(&self, path: &str, animated: bool, configurator: F) -> Result<Opened>
    where
        F: FnOnce(&ScreenHandle),
    {
        let resolved = self.resolve(path)?;
        let descriptor = &resolved.descriptor;

        if let Some(callback) = &descriptor.callback {
            info!(
                path = %path,
                template = %descriptor.template,
                arity = callback.arity(),
                "Route callback invoked"
            );
            callback.invoke(&resolved.params);
            return Ok(Opened::Callback {
                arity: callback.arity(),
            });
        }

        if self.transitions.host().is_none() {
            return Err(RouterError::Detached {
                collaborator: "stack host",
            });
        }

        let screen = self.build_screen(&resolved)?;
        configurator(&screen);
        let plan = self
            .transitions
            .apply(Arc::clone(&screen), &descriptor.directives, animated)?;
        Ok(Opened::Navigated { screen, plan })
    }

    /// Dismiss the presented modal, or pop the top screen
    pub fn pop(&self, animated: bool) -> Result<PopOutcome> {
        self.transitions.pop(animated)
    }

    /// Hand an absolute URL to the attached URL opener
    pub fn open_external(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| RouterError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let opener = self
            .url_opener
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(RouterError::Detached {
                collaborator: "url opener",
            })?;
        info!(url = %parsed, "Opening external URL");
        opener.open_url(&parsed);
        Ok(())
    }

    /// Registered routes in resolution order
    #[must_use]
    pub fn routes(&self) -> Vec<Arc<RouteDescriptor>> {
        self.table.read().iter().map(Arc::clone).collect()
    }

    #[must_use]
    pub fn templates(&self) -> Vec<String> {
        self.table.read().templates()
    }

    /// Resolve `path` to its route and parameters
    pub fn resolve(&self, path: &str) -> Result<Arc<ResolvedRoute>> {
        let table = self.table.read();
        self.resolver.resolve(&table, path)
    }

    /// Directives of the route `path` resolves to
    pub fn options_for_path(&self, path: &str) -> Result<RouteDirectives> {
        Ok(self.resolve(path)?.descriptor.directives)
    }

    /// The screen `open(path)` would navigate to.
    ///
    /// For shared routes this returns (and on first use creates and caches)
    /// the shared instance.
    pub fn screen_for_path(&self, path: &str) -> Result<ScreenHandle> {
        let resolved = self.resolve(path)?;
        self.build_screen(&resolved)
    }

    fn build_screen(&self, resolved: &ResolvedRoute) -> Result<ScreenHandle> {
        let descriptor = &resolved.descriptor;
        let path = resolved.matched_path.as_str();
        let directives = descriptor.directives;

        if directives.shared {
            if let Some(screen) = self.screens.get(path) {
                debug!(path = %path, screen_id = %screen.id(), "Shared screen reused");
                return Ok(screen);
            }
        }

        let factory = descriptor.factory.as_ref().ok_or_else(|| {
            RouterError::Screen(anyhow::anyhow!(
                "route '{}' has no screen factory",
                descriptor.template
            ))
        })?;
        let screen = factory.build(&resolved.params).map_err(RouterError::Screen)?;

        let state = screen.state();
        if directives.transition.is_some() {
            state.set_transition_style(directives.transition);
        }
        if directives.presentation.is_some() {
            state.set_presentation_style(directives.presentation);
        }
        debug!(
            path = %path,
            template = %descriptor.template,
            screen_id = %screen.id(),
            screen = %screen.title(),
            "Screen constructed"
        );

        if directives.shared {
            return Ok(self.screens.put(path, screen));
        }
        Ok(screen)
    }

    /// Paths currently holding a shared screen instance
    #[must_use]
    pub fn shared_screens(&self) -> Vec<String> {
        self.screens.paths()
    }

    /// The cached shared screen for `path`, without constructing one
    #[must_use]
    pub fn shared_screen(&self, path: &str) -> Option<ScreenHandle> {
        self.screens.get(path)
    }

    #[must_use]
    pub fn resolution_cache_len(&self) -> usize {
        self.resolver.cached_len()
    }

    /// Drop every memoized resolution so re-mapped templates take effect
    pub fn clear_resolution_cache(&self) {
        self.resolver.clear();
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("templates", &self.templates())
            .field("shared_screens", &self.screens)
            .field("transitions", &self.transitions)
            .finish()
    }
}

static DEFAULT_ROUTER: ArcSwapOption<Router> = ArcSwapOption::const_empty();

/// Install the process-wide default router, returning the previous one
pub fn install_default(router: Arc<Router>) -> Option<Arc<Router>> {
    info!("Default router installed");
    DEFAULT_ROUTER.swap(Some(router))
}

/// The process-wide default router, if one is installed
#[must_use]
pub fn default_router() -> Option<Arc<Router>> {
    DEFAULT_ROUTER.load_full()
}

/// Remove and return the process-wide default router
pub fn take_default() -> Option<Arc<Router>> {
    DEFAULT_ROUTER.swap(None)
}
