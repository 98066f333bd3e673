//! Screen instance cache for `shared` routes.
//!
//! One live screen per exact path. Entries are never removed by the router
//! proactively: `put` registers a teardown listener on the screen, and the
//! entry disappears when that screen unloads. The listener holds a weak
//! reference to the cache storage, so a cached screen never keeps the cache
//! alive, and it only evicts the entry if the entry still holds that screen.

use super::ScreenHandle;
use crate::ids::ScreenId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

type Entries = Mutex<HashMap<String, ScreenHandle>>;

/// Path-keyed cache of shared screen instances
#[derive(Default, Clone)]
pub struct ScreenCache {
    entries: Arc<Entries>,
}

impl ScreenCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<ScreenHandle> {
        self.entries.lock().get(path).map(Arc::clone)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.lock().contains_key(path)
    }

    /// Cache `screen` under `path`, hooking eviction onto its teardown.
    ///
    /// If another screen was inserted for the same path in the meantime, that
    /// one is kept and returned; otherwise `screen` is returned. A screen that
    /// has already unloaded is returned without being cached.
    pub fn put(&self, path: &str, screen: ScreenHandle) -> ScreenHandle {
        if screen.state().is_torn_down() {
            debug!(path = %path, screen_id = %screen.id(), "Unloaded screen not cached");
            return screen;
        }
        {
            let mut entries = self.entries.lock();
            if let Some(existing) = entries.get(path) {
                debug!(path = %path, screen_id = %existing.id(), "Shared screen already cached");
                return Arc::clone(existing);
            }
            entries.insert(path.to_string(), Arc::clone(&screen));
        }

        let weak: Weak<Entries> = Arc::downgrade(&self.entries);
        let key = path.to_string();
        let hooked = screen.state().on_teardown(move |id| {
            if let Some(entries) = weak.upgrade() {
                evict_if_same(&entries, &key, id);
            }
        });
        if !hooked {
            // Unloaded between the check above and registration
            evict_if_same(&self.entries, path, screen.id());
            return screen;
        }

        info!(
            path = %path,
            screen_id = %screen.id(),
            screen = %screen.title(),
            "Shared screen cached"
        );
        screen
    }

    /// Remove the entry for `path`, returning it
    pub fn evict(&self, path: &str) -> Option<ScreenHandle> {
        let removed = self.entries.lock().remove(path);
        if let Some(screen) = &removed {
            debug!(path = %path, screen_id = %screen.id(), "Shared screen evicted");
        }
        removed
    }

    /// Paths currently holding a shared screen
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.entries.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry without unloading the screens
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

fn evict_if_same(entries: &Entries, path: &str, id: ScreenId) {
    let mut entries = entries.lock();
    if entries.get(path).is_some_and(|s| s.id() == id) {
        entries.remove(path);
        debug!(path = %path, screen_id = %id, "Shared screen unloaded, cache entry removed");
    }
}

impl std::fmt::Debug for ScreenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenCache")
            .field("paths", &self.paths())
            .finish()
    }
}
