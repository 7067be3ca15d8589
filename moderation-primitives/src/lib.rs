//! Core shared types for the moderation decision engine.

#![warn(missing_docs, clippy::pedantic)]

mod action;
mod error;
mod ids;
mod opaque_id;
mod score;

/// Moderation actions and their severity ordering.
pub use action::{Action, Severity};
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Identifier correlating one batch run across logs and reports.
pub use ids::BatchId;
/// Serde helpers for record identifiers given as strings or numbers.
pub use opaque_id::{deserialize_opaque_id, opaque_id_text};
/// Confidence values and thresholds that keep their source form.
pub use score::Score;
