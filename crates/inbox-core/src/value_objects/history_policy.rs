//! Edit-history policy
//!
//! Decides whether a content change on an already-edited message is audited.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// When the edit hook writes a history row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryPolicy {
    /// Only the first content change is audited; later edits update the
    /// content without a new history row.
    #[default]
    FirstEditOnly,
    /// Every distinct content change is audited.
    EveryEdit,
}

impl HistoryPolicy {
    /// Whether a change to a message whose committed state has `already_edited`
    /// should produce a history row
    #[inline]
    pub fn should_record(self, already_edited: bool) -> bool {
        match self {
            Self::FirstEditOnly => !already_edited,
            Self::EveryEdit => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstEditOnly => "first-edit",
            Self::EveryEdit => "every-edit",
        }
    }
}

impl fmt::Display for HistoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a history policy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown history policy: {0}")]
pub struct HistoryPolicyParseError(pub String);

impl FromStr for HistoryPolicy {
    type Err = HistoryPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first-edit" | "first_edit" | "once" => Ok(Self::FirstEditOnly),
            "every-edit" | "every_edit" | "always" => Ok(Self::EveryEdit),
            other => Err(HistoryPolicyParseError(other.to_string())),
        }
    }
}
