//! Shared error definitions for the moderation workspace.

use std::fmt::Write as _;

use serde_json::Error as SerdeError;
use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, validating, or persisting moderation batches.
///
/// Record-level variants carry the zero-based position of the offending record
/// and its `id` when one could be read, so operators can locate it in the
/// source file.
#[derive(Debug, Error)]
pub enum Error {
    /// A policy record is missing a required field or has a malformed one.
    /// Fatal to the whole batch.
    #[error("invalid policy {}: {reason}", describe_record(.index, .id))]
    InvalidPolicy {
        /// Position of the policy in the source sequence.
        index: usize,
        /// Policy identifier, when present.
        id: Option<String>,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// An item record is missing a required field or has a malformed one.
    #[error("malformed item {}: {reason}", describe_record(.index, .id))]
    MalformedItem {
        /// Position of the item in the source sequence.
        index: usize,
        /// Item identifier, when present.
        id: Option<String>,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The policy document as a whole could not be interpreted.
    #[error("invalid policy document: {reason}")]
    InvalidPolicyDocument {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// The provided batch identifier could not be parsed.
    #[error("invalid batch id: {source}")]
    InvalidBatchId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// Underlying I/O failure while reading inputs or writing decisions.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },

    /// Serialization or deserialization error.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
}

impl Error {
    /// Builds an [`Error::InvalidPolicy`].
    #[must_use]
    pub fn invalid_policy(index: usize, id: Option<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            index,
            id,
            reason: reason.into(),
        }
    }

    /// Builds an [`Error::MalformedItem`].
    #[must_use]
    pub fn malformed_item(index: usize, id: Option<String>, reason: impl Into<String>) -> Self {
        Self::MalformedItem {
            index,
            id,
            reason: reason.into(),
        }
    }

    /// Returns true for errors tied to a single item rather than the batch.
    #[must_use]
    pub fn is_item_scoped(&self) -> bool {
        matches!(self, Self::MalformedItem { .. })
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn describe_record(index: &usize, id: &Option<String>) -> String {
    let mut out = format!("#{index}");
    if let Some(id) = id {
        let _ = write!(out, " (`{id}`)");
    }
    out
}
