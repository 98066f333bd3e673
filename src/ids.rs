use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Screen instance identity backed by ULID.
///
/// Every [`crate::screen::ScreenState`] gets a fresh id. Stack membership and
/// shared-cache eviction compare ids rather than pointers; journals and
/// simulator reports carry the id as a string.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ScreenId(ulid::Ulid);

impl ScreenId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ScreenId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ScreenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
