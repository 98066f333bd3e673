//! # Error Module
//!
//! Errors raised by the router itself. There are two failure kinds that belong
//! to the routing engine proper:
//!
//! - [`RouterError::InvalidOption`] - raised by `map` when a transition or
//!   presentation style name is not one of the fixed values. Nothing is stored.
//! - [`RouterError::RouteNotFound`] - raised at resolution time when no
//!   registered template matches. Never cached, so a later `map` can fix it.
//!
//! The remaining variants describe collaborator state. Failures originating in a
//! collaborator (a screen factory returning an error) are carried unchanged in
//! [`RouterError::Screen`] and exposed via [`std::error::Error::source`].

use std::fmt;

/// Result alias used across the routing engine
pub type Result<T> = std::result::Result<T, RouterError>;

/// Router error
#[derive(Debug)]
pub enum RouterError {
    /// An option value is not one of the allowed names
    InvalidOption {
        /// Option key (`transition` or `presentation`)
        option: &'static str,
        /// The rejected value
        value: String,
        /// Accepted values, in declaration order
        allowed: &'static [&'static str],
    },
    /// No registered template matches the path
    RouteNotFound {
        /// The path that failed to resolve
        path: String,
    },
    /// A collaborator required by the operation is not attached
    Detached {
        /// Which collaborator is missing (`stack host`, `url opener`)
        collaborator: &'static str,
    },
    /// `open_external` was given something that is not an absolute URL
    InvalidUrl {
        /// The rejected input
        url: String,
        /// Parser message
        reason: String,
    },
    /// A screen factory failed; the original error is preserved
    Screen(anyhow::Error),
}

impl RouterError {
    /// Shorthand for [`RouterError::RouteNotFound`]
    pub fn not_found(path: impl Into<String>) -> Self {
        RouterError::RouteNotFound { path: path.into() }
    }

    /// True for [`RouterError::RouteNotFound`]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::RouteNotFound { .. })
    }

    /// True for [`RouterError::InvalidOption`]
    #[must_use]
    pub fn is_invalid_option(&self) -> bool {
        matches!(self, RouterError::InvalidOption { .. })
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidOption {
                option,
                value,
                allowed,
            } => {
                write!(
                    f,
                    "invalid option: :{} must be one of [{}], got '{}'",
                    option,
                    allowed.join(", "),
                    value
                )
            }
            RouterError::RouteNotFound { path } => {
                write!(f, "No route found for URL '{}'", path)
            }
            RouterError::Detached { collaborator } => {
                write!(f, "no {} attached to the router", collaborator)
            }
            RouterError::InvalidUrl { url, reason } => {
                write!(f, "'{}' is not an absolute URL: {}", url, reason)
            }
            RouterError::Screen(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::Screen(err) => Some(&**err),
            _ => None,
        }
    }
}
