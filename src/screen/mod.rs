//! # Screen Module
//!
//! The screen abstraction the router is built against. Concrete screens belong
//! to the host UI framework; the router only needs:
//!
//! - a per-instance [`ScreenState`] (identity, modal styles, teardown listeners)
//! - to know whether a screen is itself a navigation container
//! - a teardown notification it can listen to
//!
//! ## Teardown
//!
//! Hosts call [`Screen::unload`] when a screen's lifecycle ends. `unload` runs
//! every listener registered through [`ScreenState::on_teardown`] and then the
//! screen's own [`Screen::did_unload`]. Both happen at most once per instance;
//! later calls are no-ops. Listeners are additive: registering one never
//! replaces the screen's own teardown.
//!
//! ## Factories and callbacks
//!
//! A route targets either a [`ScreenFactory`] or a [`RouteCallback`]. Both come
//! in a parameterless and a parameterised flavour.

mod cache;

pub use cache::ScreenCache;

use crate::ids::ScreenId;
use crate::options::{PresentationStyle, TransitionStyle};
use crate::router::RouteParams;
use parking_lot::Mutex;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a live screen
pub type ScreenHandle = Arc<dyn Screen>;

/// One-shot teardown listener
pub type TeardownListener = Box<dyn FnOnce(ScreenId) + Send>;

/// A navigable unit of UI content
pub trait Screen: Send + Sync + 'static {
    /// Router-visible state embedded in the screen
    fn state(&self) -> &ScreenState;

    /// Downcasting support for configurators and tests
    fn as_any(&self) -> &dyn Any;

    /// Human readable name used in logs and journals
    fn title(&self) -> Cow<'_, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// True when this screen is itself a full navigation container and can be
    /// presented without wrapping
    fn is_navigation_container(&self) -> bool {
        false
    }

    /// The screen's own teardown behaviour
    fn did_unload(&self) {}

    /// Signal the end of this screen's lifecycle.
    ///
    /// Do not override; customise [`Screen::did_unload`] instead.
    fn unload(&self) {
        if self.state().fire_teardown() {
            self.did_unload();
        }
    }
}

impl fmt::Debug for dyn Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.state().id())
            .field("title", &self.title())
            .finish()
    }
}

impl dyn Screen {
    /// Downcast to a concrete screen type
    #[must_use]
    pub fn downcast_ref<T: Screen>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[must_use]
    pub fn id(&self) -> ScreenId {
        self.state().id()
    }
}

/// Identity comparison between two screens
#[must_use]
pub fn same_screen(a: &dyn Screen, b: &dyn Screen) -> bool {
    a.state().id() == b.state().id()
}

#[derive(Default)]
struct Teardown {
    fired: bool,
    listeners: Vec<TeardownListener>,
}

/// Router-visible per-screen state
pub struct ScreenState {
    id: ScreenId,
    transition: Mutex<Option<TransitionStyle>>,
    presentation: Mutex<Option<PresentationStyle>>,
    teardown: Mutex<Teardown>,
}

impl ScreenState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ScreenId::new(),
            transition: Mutex::new(None),
            presentation: Mutex::new(None),
            teardown: Mutex::new(Teardown::default()),
        }
    }

    #[must_use]
    pub fn id(&self) -> ScreenId {
        self.id
    }

    #[must_use]
    pub fn transition_style(&self) -> Option<TransitionStyle> {
        *self.transition.lock()
    }

    pub fn set_transition_style(&self, style: Option<TransitionStyle>) {
        *self.transition.lock() = style;
    }

    #[must_use]
    pub fn presentation_style(&self) -> Option<PresentationStyle> {
        *self.presentation.lock()
    }

    pub fn set_presentation_style(&self, style: Option<PresentationStyle>) {
        *self.presentation.lock() = style;
    }

    /// Register a listener that runs once when the screen unloads.
    ///
    /// Returns false, dropping the listener, if teardown has already fired.
    pub fn on_teardown(&self, listener: impl FnOnce(ScreenId) + Send + 'static) -> bool {
        let mut teardown = self.teardown.lock();
        if teardown.fired {
            return false;
        }
        teardown.listeners.push(Box::new(listener));
        true
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.teardown.lock().fired
    }

    /// Run pending listeners in registration order.
    ///
    /// Returns false if teardown already fired. Listeners run without the
    /// internal lock held.
    pub(crate) fn fire_teardown(&self) -> bool {
        let listeners = {
            let mut teardown = self.teardown.lock();
            if teardown.fired {
                return false;
            }
            teardown.fired = true;
            std::mem::take(&mut teardown.listeners)
        };
        for listener in listeners {
            listener(self.id);
        }
        true
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenState")
            .field("id", &self.id)
            .field("transition", &self.transition_style())
            .field("presentation", &self.presentation_style())
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}

type BuildFn = dyn Fn(&RouteParams) -> anyhow::Result<ScreenHandle> + Send + Sync;

/// Produces screen instances for a route
#[derive(Clone)]
pub struct ScreenFactory {
    build: Arc<BuildFn>,
    takes_params: bool,
}

impl ScreenFactory {
    /// Factory using a no-argument initializer
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> ScreenHandle + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move |_| Ok(f())),
            takes_params: false,
        }
    }

    /// Factory whose initializer receives the path parameters
    pub fn with_params<F>(f: F) -> Self
    where
        F: Fn(&RouteParams) -> ScreenHandle + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move |params| Ok(f(params))),
            takes_params: true,
        }
    }

    /// Fallible parameterised factory; errors reach the caller of `open`
    pub fn try_with_params<F>(f: F) -> Self
    where
        F: Fn(&RouteParams) -> anyhow::Result<ScreenHandle> + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(f),
            takes_params: true,
        }
    }

    #[must_use]
    pub fn takes_params(&self) -> bool {
        self.takes_params
    }

    pub fn build(&self, params: &RouteParams) -> anyhow::Result<ScreenHandle> {
        (self.build)(params)
    }
}

impl fmt::Debug for ScreenFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenFactory")
            .field("takes_params", &self.takes_params)
            .finish()
    }
}

type CallbackFn = dyn Fn(&RouteParams) + Send + Sync;

/// Inline route callback, run instead of a stack transition
#[derive(Clone)]
pub struct RouteCallback {
    call: Arc<CallbackFn>,
    arity: usize,
}

impl RouteCallback {
    /// Zero-arity callback
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            call: Arc::new(move |_| f()),
            arity: 0,
        }
    }

    /// One-arity callback receiving the path parameters
    pub fn with_params<F>(f: F) -> Self
    where
        F: Fn(&RouteParams) + Send + Sync + 'static,
    {
        Self {
            call: Arc::new(f),
            arity: 1,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn invoke(&self, params: &RouteParams) {
        (self.call)(params)
    }
}

impl fmt::Debug for RouteCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCallback")
            .field("arity", &self.arity)
            .finish()
    }
}

/// Generic screen carrying a name and the parameters it was built with
///
/// Used where no concrete UI exists: manifest defaults, the CLI simulator,
/// headless tests.
#[derive(Debug)]
pub struct PlaceholderScreen {
    state: ScreenState,
    name: String,
    params: RouteParams,
    container: bool,
}

impl PlaceholderScreen {
    #[must_use]
    pub fn new(name: impl Into<String>, params: RouteParams) -> Self {
        Self {
            state: ScreenState::new(),
            name: name.into(),
            params,
            container: false,
        }
    }

    /// A placeholder that reports itself as a navigation container
    #[must_use]
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            container: true,
            ..Self::new(name, RouteParams::new())
        }
    }

    /// Factory producing placeholders named `name`
    #[must_use]
    pub fn factory(name: impl Into<String>) -> ScreenFactory {
        let name: Arc<str> = Arc::from(name.into());
        ScreenFactory::with_params(move |params| {
            Arc::new(PlaceholderScreen::new(&*name, params.clone())) as ScreenHandle
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &RouteParams {
        &self.params
    }
}

impl Screen for PlaceholderScreen {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn title(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn is_navigation_container(&self) -> bool {
        self.container
    }
}
