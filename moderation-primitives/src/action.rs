//! Moderation actions and the fixed severity order used to resolve them.

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Final or candidate moderation action attached to a content item.
///
/// Labels outside the four known actions are preserved verbatim as
/// [`Action::Unknown`] so they can flow through audit records untouched.
/// Construct actions through [`Action::from`] (or [`str::parse`]) so that a
/// known label never ends up wrapped in `Unknown`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// Release the original content unchanged.
    Allow,
    /// Replace the content with the sanitization notice.
    Sanitize,
    /// Withhold the content pending human review.
    Escalate,
    /// Withhold the content outright.
    Block,
    /// Unrecognised label carried through from configuration.
    Unknown(String),
}

/// Severity rank of an action. Variants are declared in ascending order so the
/// derived [`Ord`] is the resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Rank of any unrecognised label.
    Unknown = 0,
    /// Rank of [`Action::Allow`].
    Allow = 1,
    /// Rank of [`Action::Sanitize`].
    Sanitize = 2,
    /// Rank of [`Action::Escalate`].
    Escalate = 3,
    /// Rank of [`Action::Block`].
    Block = 4,
}

impl Severity {
    /// Returns the numeric rank.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }
}

impl Action {
    /// Returns the label used in configuration and decision records.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Allow => "allow",
            Self::Sanitize => "sanitize",
            Self::Escalate => "escalate",
            Self::Block => "block",
            Self::Unknown(label) => label,
        }
    }

    /// Returns the severity rank of the action.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Allow => Severity::Allow,
            Self::Sanitize => Severity::Sanitize,
            Self::Escalate => Severity::Escalate,
            Self::Block => Severity::Block,
            Self::Unknown(_) => Severity::Unknown,
        }
    }

    /// Returns true for the four built-in actions.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for Action {
    fn from(label: String) -> Self {
        match label.as_str() {
            "allow" => Self::Allow,
            "sanitize" => Self::Sanitize,
            "escalate" => Self::Escalate,
            "block" => Self::Block,
            _ => Self::Unknown(label),
        }
    }
}

impl From<&str> for Action {
    fn from(label: &str) -> Self {
        Self::from(label.to_owned())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Unknown(label) => label,
            known => known.label().to_owned(),
        }
    }
}

impl FromStr for Action {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
