//! Configuration and file boundaries for moderation batches.
//!
//! Policies and items are read from JSON documents and validated here, so the
//! engine only ever sees well-formed records.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;
pub mod sink;

pub use loader::{JsonItemFile, JsonPolicyFile, parse_items, parse_policy_document};
pub use schema::RunConfig;
pub use sink::JsonDecisionFile;
