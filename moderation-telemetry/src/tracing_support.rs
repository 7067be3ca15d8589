//! Structured tracing setup.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when neither an explicit directive nor `RUST_LOG` is set.
pub const FALLBACK_FILTER: &str = "info";

/// Resolves the filter directive: an explicit one wins, then `RUST_LOG`, then
/// [`FALLBACK_FILTER`].
///
/// # Errors
///
/// Returns an error when the explicit directive cannot be parsed.
pub fn filter(directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))),
    }
}

/// Installs the global fmt subscriber.
///
/// # Errors
///
/// Returns an error when the directive is invalid or a global subscriber is
/// already installed.
pub fn init(directive: Option<&str>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(directive)?)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}
