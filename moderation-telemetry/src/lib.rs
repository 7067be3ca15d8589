//! Observability utilities for moderation runs.

#![warn(missing_docs, clippy::pedantic)]

pub mod summary;
pub mod tracing_support;
