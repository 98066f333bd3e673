//! In-memory stack host and URL opener.
//!
//! Both keep a journal of every command they receive so callers can assert on
//! the exact sequence the router issued.

use super::{StackHost, UrlOpener};
use crate::ids::ScreenId;
use crate::screen::{same_screen, Screen, ScreenHandle, ScreenState};
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Serializable reference to a screen in a journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenRef {
    pub id: ScreenId,
    pub title: String,
}

impl From<&ScreenHandle> for ScreenRef {
    fn from(screen: &ScreenHandle) -> Self {
        Self {
            id: screen.id(),
            title: screen.title().into_owned(),
        }
    }
}

/// A command received by [`MemoryStackHost`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    Push { screen: ScreenRef, animated: bool },
    Pop { animated: bool },
    PopTo { screen: ScreenRef, animated: bool },
    ReplaceAll { screens: Vec<ScreenRef>, animated: bool },
    Present { screen: ScreenRef, animated: bool },
    Dismiss { animated: bool },
    Wrap { root: ScreenRef },
}

impl HostCommand {
    /// The `animated` flag, for commands that carry one
    #[must_use]
    pub fn animated(&self) -> Option<bool> {
        match self {
            HostCommand::Push { animated, .. }
            | HostCommand::Pop { animated }
            | HostCommand::PopTo { animated, .. }
            | HostCommand::ReplaceAll { animated, .. }
            | HostCommand::Present { animated, .. }
            | HostCommand::Dismiss { animated } => Some(*animated),
            HostCommand::Wrap { .. } => None,
        }
    }
}

#[derive(Default)]
struct HostState {
    stack: Vec<ScreenHandle>,
    presented: Option<ScreenHandle>,
    journal: Vec<HostCommand>,
}

/// Navigation stack kept entirely in memory
#[derive(Default)]
pub struct MemoryStackHost {
    state: Mutex<HostState>,
}

impl MemoryStackHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far, oldest first
    #[must_use]
    pub fn journal(&self) -> Vec<HostCommand> {
        self.state.lock().journal.clone()
    }

    /// Take and clear the journal
    pub fn drain_journal(&self) -> Vec<HostCommand> {
        std::mem::take(&mut self.state.lock().journal)
    }

    #[must_use]
    pub fn stack_len(&self) -> usize {
        self.state.lock().stack.len()
    }

    /// Titles of the stacked screens, bottom first
    #[must_use]
    pub fn stack_titles(&self) -> Vec<String> {
        self.state
            .lock()
            .stack
            .iter()
            .map(|s| s.title().into_owned())
            .collect()
    }

    fn record(&self, state: &mut HostState, command: HostCommand) {
        debug!(command = ?command, "Stack host command");
        state.journal.push(command);
    }
}

impl StackHost for MemoryStackHost {
    fn screens(&self) -> Vec<ScreenHandle> {
        self.state.lock().stack.clone()
    }

    fn push(&self, screen: ScreenHandle, animated: bool) {
        let mut state = self.state.lock();
        let cmd = HostCommand::Push {
            screen: ScreenRef::from(&screen),
            animated,
        };
        self.record(&mut state, cmd);
        state.stack.push(screen);
    }

    fn pop(&self, animated: bool) {
        let mut state = self.state.lock();
        self.record(&mut state, HostCommand::Pop { animated });
        state.stack.pop();
    }

    fn pop_to(&self, screen: &ScreenHandle, animated: bool) {
        let mut state = self.state.lock();
        let cmd = HostCommand::PopTo {
            screen: ScreenRef::from(screen),
            animated,
        };
        self.record(&mut state, cmd);
        if let Some(idx) = state
            .stack
            .iter()
            .position(|s| same_screen(s.as_ref(), screen.as_ref()))
        {
            state.stack.truncate(idx + 1);
        }
    }

    fn replace_all(&self, screens: Vec<ScreenHandle>, animated: bool) {
        let mut state = self.state.lock();
        let cmd = HostCommand::ReplaceAll {
            screens: screens.iter().map(ScreenRef::from).collect(),
            animated,
        };
        self.record(&mut state, cmd);
        state.stack = screens;
    }

    fn present(&self, screen: ScreenHandle, animated: bool) {
        let mut state = self.state.lock();
        let cmd = HostCommand::Present {
            screen: ScreenRef::from(&screen),
            animated,
        };
        self.record(&mut state, cmd);
        state.presented = Some(screen);
    }

    fn dismiss_presented(&self, animated: bool) {
        let mut state = self.state.lock();
        self.record(&mut state, HostCommand::Dismiss { animated });
        state.presented = None;
    }

    fn presented(&self) -> Option<ScreenHandle> {
        self.state.lock().presented.clone()
    }

    fn wrap_in_container(&self, root: ScreenHandle) -> ScreenHandle {
        let mut state = self.state.lock();
        let cmd = HostCommand::Wrap {
            root: ScreenRef::from(&root),
        };
        self.record(&mut state, cmd);
        Arc::new(NavigationContainer::new(root))
    }
}

/// Navigation container produced by [`MemoryStackHost::wrap_in_container`]
pub struct NavigationContainer {
    state: ScreenState,
    title: String,
    stack: Mutex<Vec<ScreenHandle>>,
}

impl NavigationContainer {
    /// Container with `root` pushed (without animation)
    #[must_use]
    pub fn new(root: ScreenHandle) -> Self {
        Self {
            state: ScreenState::new(),
            title: format!("navigation({})", root.title()),
            stack: Mutex::new(vec![root]),
        }
    }

    #[must_use]
    pub fn screens(&self) -> Vec<ScreenHandle> {
        self.stack.lock().clone()
    }

    #[must_use]
    pub fn root(&self) -> Option<ScreenHandle> {
        self.stack.lock().first().map(Arc::clone)
    }
}

impl Screen for NavigationContainer {
    fn state(&self) -> &ScreenState {
        &self.state
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn title(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.title)
    }

    fn is_navigation_container(&self) -> bool {
        true
    }
}

/// URL opener that records every URL it is asked to open
#[derive(Default)]
pub struct RecordingUrlOpener {
    opened: Mutex<Vec<Url>>,
}

impl RecordingUrlOpener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().clone()
    }
}

impl UrlOpener for RecordingUrlOpener {
    fn open_url(&self, url: &Url) {
        debug!(url = %url, "Opening external URL");
        self.opened.lock().push(url.clone());
    }
}
