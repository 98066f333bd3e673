//! # Route Options
//!
//! Typed replacement for the open-ended options bag accepted by `map`.
//!
//! [`RouteOptions`] is the caller-facing form. Its style fields are kept as raw
//! names so that an unknown value is rejected by `map` itself (fail fast), not
//! at open time. [`RouteOptions::validate`] turns it into [`RouteDirectives`],
//! the typed form stored on a route.
//!
//! ## Options
//!
//! | Field          | Effect                                                        |
//! |----------------|---------------------------------------------------------------|
//! | `modal`        | Present the screen modally (wrapped in a navigation container) |
//! | `shared`       | Cache one screen instance per path until it unloads           |
//! | `resets`       | Replace the whole stack with the target screen               |
//! | `transition`   | `cover`, `flip`, `dissolve`, `curl`                           |
//! | `presentation` | `full_screen`, `page_sheet`, `form_sheet`, `current`          |

use crate::error::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modal transition style applied to a presented screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    Cover,
    Flip,
    Dissolve,
    Curl,
}

impl TransitionStyle {
    /// Every transition style, in declaration order
    pub const ALL: [TransitionStyle; 4] = [
        TransitionStyle::Cover,
        TransitionStyle::Flip,
        TransitionStyle::Dissolve,
        TransitionStyle::Curl,
    ];

    const NAMES: &'static [&'static str] = &["cover", "flip", "dissolve", "curl"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionStyle::Cover => "cover",
            TransitionStyle::Flip => "flip",
            TransitionStyle::Dissolve => "dissolve",
            TransitionStyle::Curl => "curl",
        }
    }
}

impl FromStr for TransitionStyle {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| RouterError::InvalidOption {
                option: "transition",
                value: s.to_string(),
                allowed: Self::NAMES,
            })
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modal presentation style applied to a presented screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationStyle {
    FullScreen,
    PageSheet,
    FormSheet,
    Current,
}

impl PresentationStyle {
    /// Every presentation style, in declaration order
    pub const ALL: [PresentationStyle; 4] = [
        PresentationStyle::FullScreen,
        PresentationStyle::PageSheet,
        PresentationStyle::FormSheet,
        PresentationStyle::Current,
    ];

    const NAMES: &'static [&'static str] = &["full_screen", "page_sheet", "form_sheet", "current"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PresentationStyle::FullScreen => "full_screen",
            PresentationStyle::PageSheet => "page_sheet",
            PresentationStyle::FormSheet => "form_sheet",
            PresentationStyle::Current => "current",
        }
    }
}

impl FromStr for PresentationStyle {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| RouterError::InvalidOption {
                option: "presentation",
                value: s.to_string(),
                allowed: Self::NAMES,
            })
    }
}

impl fmt::Display for PresentationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options accepted by `map`, before validation
///
/// # Example
///
/// ```
/// use routable::options::{RouteOptions, TransitionStyle};
///
/// let directives = RouteOptions::new().modal().transition("flip").validate().unwrap();
/// assert!(directives.modal);
/// assert_eq!(directives.transition, Some(TransitionStyle::Flip));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteOptions {
    pub modal: bool,
    pub shared: bool,
    pub resets: bool,
    pub transition: Option<String>,
    pub presentation: Option<String>,
}

impl RouteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn modal(mut self) -> Self {
        self.modal = true;
        self
    }

    #[must_use]
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    #[must_use]
    pub fn resets(mut self) -> Self {
        self.resets = true;
        self
    }

    #[must_use]
    pub fn transition(mut self, name: impl Into<String>) -> Self {
        self.transition = Some(name.into());
        self
    }

    #[must_use]
    pub fn presentation(mut self, name: impl Into<String>) -> Self {
        self.presentation = Some(name.into());
        self
    }

    /// Check the style names and produce the typed directives
    ///
    /// Transition is checked before presentation, so when both are wrong the
    /// error names `transition`.
    pub fn validate(&self) -> Result<RouteDirectives> {
        let transition = self
            .transition
            .as_deref()
            .map(TransitionStyle::from_str)
            .transpose()?;
        let presentation = self
            .presentation
            .as_deref()
            .map(PresentationStyle::from_str)
            .transpose()?;

        Ok(RouteDirectives {
            modal: self.modal,
            shared: self.shared,
            resets: self.resets,
            transition,
            presentation,
        })
    }
}

/// Validated route options stored on a route descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDirectives {
    pub modal: bool,
    pub shared: bool,
    pub resets: bool,
    pub transition: Option<TransitionStyle>,
    pub presentation: Option<PresentationStyle>,
}

impl From<RouteDirectives> for RouteOptions {
    fn from(d: RouteDirectives) -> Self {
        Self {
            modal: d.modal,
            shared: d.shared,
            resets: d.resets,
            transition: d.transition.map(|t| t.as_str().to_string()),
            presentation: d.presentation.map(|p| p.as_str().to_string()),
        }
    }
}
