//! Evaluates a batch of content items against moderation policies.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use moderation_config::RunConfig;
use moderation_policy::{Action, BatchId, MalformedItemPolicy};
use moderation_telemetry::{summary, tracing_support};
use tracing::info;

/// Evaluate content items against moderation policies and write one decision
/// record per item.
#[derive(Debug, Parser)]
#[command(name = "moderate", version, about)]
struct Args {
    /// JSON run configuration; flags override its fields.
    #[arg(long, env = "MODERATION_CONFIG")]
    config: Option<PathBuf>,

    /// Item list (default `inputs.json`).
    #[arg(long, env = "MODERATION_INPUTS")]
    inputs: Option<PathBuf>,

    /// Policy document (default `policies.json`).
    #[arg(long, env = "MODERATION_POLICIES")]
    policies: Option<PathBuf>,

    /// Decision output file (default `output.json`).
    #[arg(long, env = "MODERATION_OUTPUT")]
    output: Option<PathBuf>,

    /// `fail` aborts on the first malformed item, `report` records it and continues.
    #[arg(long, env = "MODERATION_MALFORMED_ITEMS")]
    malformed_items: Option<MalformedItemPolicy>,

    /// Overrides the policy document's `default_action`.
    #[arg(long, env = "MODERATION_DEFAULT_ACTION")]
    default_action: Option<Action>,

    /// Fixed batch id (UUID) for log correlation.
    #[arg(long, env = "MODERATION_BATCH_ID")]
    batch_id: Option<BatchId>,

    /// Tracing filter directive; falls back to `RUST_LOG`, then `info`.
    #[arg(long, env = "MODERATION_LOG")]
    log_filter: Option<String>,
}

impl Args {
    async fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .await
                .with_context(|| format!("failed to read run config `{}`", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(inputs) = self.inputs {
            config.inputs = inputs;
        }
        if let Some(policies) = self.policies {
            config.policies = policies;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(malformed_items) = self.malformed_items {
            config.malformed_items = malformed_items;
        }
        if self.default_action.is_some() {
            config.default_action = self.default_action;
        }
        if self.batch_id.is_some() {
            config.batch_id = self.batch_id;
        }
        if self.log_filter.is_some() {
            config.log_filter = self.log_filter;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config().await?;
    tracing_support::init(config.log_filter.as_deref())?;

    let runner = config.runner();
    info!(
        batch = %runner.batch_id(),
        inputs = %config.inputs.display(),
        policies = %config.policies.display(),
        output = %config.output.display(),
        malformed_items = %config.malformed_items,
        "starting moderation batch"
    );

    let report = runner.run().await.with_context(|| {
        format!(
            "moderation batch failed (inputs `{}`, policies `{}`)",
            config.inputs.display(),
            config.policies.display()
        )
    })?;
    summary::log_report(&report);
    Ok(())
}
