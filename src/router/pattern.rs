//! Pattern matcher - compiles route templates and matches concrete paths.
//!
//! A template such as `users/:user_id/posts/:id` is split on `/` into an
//! ordered list of segments. Segments beginning with `:` capture the path
//! segment at the same position under the remainder of the name; every other
//! segment must equal the path segment exactly (case-sensitive, no decoding).
//!
//! Splitting drops trailing empty segments, so `users/` and `users` have the
//! same shape, while a leading `/` adds an empty first segment and is therefore
//! significant.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of path parameters kept inline before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Inline parameter storage.
///
/// Names are `Arc<str>` shared with the compiled template; values are owned
/// copies of the path segments.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Split a template or path into segments.
pub(crate) fn split_segments(s: &str) -> SmallVec<[&str; MAX_INLINE_PARAMS]> {
    let mut parts: SmallVec<[&str; MAX_INLINE_PARAMS]> = s.split('/').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// One compiled template segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly
    Literal(Box<str>),
    /// Binds the path segment under this name
    Param(Arc<str>),
}

impl Segment {
    fn compile(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) => Segment::Param(Arc::from(name)),
            None => Segment::Literal(Box::from(raw)),
        }
    }

    #[must_use]
    pub fn is_param(&self) -> bool {
        matches!(self, Segment::Param(_))
    }
}

/// A compiled, immutable route template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    source: Arc<str>,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Compile a template string
    ///
    /// ```
    /// use routable::router::RouteTemplate;
    ///
    /// let t = RouteTemplate::parse("users/:id/posts");
    /// assert_eq!(t.segment_count(), 3);
    /// assert_eq!(t.param_names().collect::<Vec<_>>(), vec!["id"]);
    /// ```
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let segments = split_segments(template)
            .into_iter()
            .map(Segment::compile)
            .collect();
        Self {
            source: Arc::from(template),
            segments,
        }
    }

    /// The template string as registered
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Parameter names in template order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_ref()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a path, returning the captured parameters on success
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        self.match_segments(&split_segments(path))
    }

    pub(crate) fn match_segments(&self, parts: &[&str]) -> Option<RouteParams> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = ParamVec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Param(name) => params.push((Arc::clone(name), (*part).to_string())),
                Segment::Literal(lit) => {
                    if lit.as_ref() != *part {
                        return None;
                    }
                }
            }
        }
        Some(RouteParams(params))
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Outcome of [`matches`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMatch {
    pub matched: bool,
    pub params: RouteParams,
}

/// Match `path` against `template`.
///
/// Unmatched results carry empty params.
///
/// ```
/// use routable::router::{matches, RouteTemplate};
///
/// let m = matches(&RouteTemplate::parse("users/:id"), "users/42");
/// assert!(m.matched);
/// assert_eq!(m.params.get("id"), Some("42"));
/// assert!(!matches(&RouteTemplate::parse("users/:id"), "users/42/posts").matched);
/// ```
#[must_use]
pub fn matches(template: &RouteTemplate, path: &str) -> PatternMatch {
    match template.match_path(path) {
        Some(params) => PatternMatch {
            matched: true,
            params,
        },
        None => PatternMatch::default(),
    }
}

/// Path parameters captured by a match
///
/// Keeps template order. Lookups use last-write-wins when a template repeats a
/// parameter name (`org/:id/users/:id` yields the user id).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(ParamVec);

impl RouteParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding; mainly useful when building params by hand in tests.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.push((Arc::from(name), value.into()));
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Convert to a `HashMap`
    /// Note: This allocates - use [`RouteParams::get`] for single lookups
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (Arc::from(k), v.to_string()))
                .collect(),
        )
    }
}

impl Serialize for RouteParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Template order, keeping only the last binding of a repeated name
        let is_last = |i: usize| !self.0[i + 1..].iter().any(|(k, _)| *k == self.0[i].0);
        let len = (0..self.0.len()).filter(|&i| is_last(i)).count();
        let mut out = serializer.serialize_map(Some(len))?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if is_last(i) {
                out.serialize_entry(k.as_ref(), v)?;
            }
        }
        out.end()
    }
}
