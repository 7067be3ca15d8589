//! Collaborator traits that feed batches into the engine and persist results.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use moderation_primitives::{Action, BatchId, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::contracts::{Item, PolicySet};
use crate::decision::Decision;
use crate::engine::DecisionEngine;

/// Supplies the policy snapshot for a batch.
#[async_trait]
pub trait PolicySource: Send + Sync {
    /// Loads every policy and the fallback action.
    ///
    /// Implementations must reject the whole set when any policy lacks an `id`
    /// or `risk`, before any item is evaluated.
    async fn load_policies(&self) -> Result<PolicySet>;
}

/// Supplies the items of a batch.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Loads the items in input order.
    ///
    /// The outer result reports failures of the source itself; each entry
    /// carries either a valid item or the error describing why it was
    /// rejected.
    async fn load_items(&self) -> Result<Vec<Result<Item>>>;
}

/// Receives the records produced for a batch.
#[async_trait]
pub trait DecisionSink: Send + Sync {
    /// Persists the records in input order.
    async fn write(&self, records: &[BatchRecord]) -> Result<()>;
}

/// How the runner treats items that failed validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedItemPolicy {
    /// Abort the batch on the first malformed item. Nothing is written.
    #[default]
    Fail,
    /// Emit an error record in place of the item and keep going.
    Report,
}

impl Display for MalformedItemPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::Report => "report",
        })
    }
}

impl FromStr for MalformedItemPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "report" => Ok(Self::Report),
            other => Err(format!(
                "unknown malformed item policy `{other}` (expected `fail` or `report`)"
            )),
        }
    }
}

/// Error record emitted for a rejected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedItem {
    index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    error: String,
}

impl RejectedItem {
    /// Returns the position of the item in the input.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the item identifier, when it could be read.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the rejection reason.
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }
}

impl TryFrom<Error> for RejectedItem {
    type Error = Error;

    fn try_from(err: Error) -> Result<Self> {
        match err {
            Error::MalformedItem { index, id, reason } => Ok(Self {
                index,
                id,
                error: reason,
            }),
            other => Err(other),
        }
    }
}

/// One entry of a batch's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchRecord {
    /// Decision for a valid item.
    Decision(Decision),
    /// Error record for a malformed item.
    Rejected(RejectedItem),
}

impl BatchRecord {
    /// Returns the decision, if this record holds one.
    #[must_use]
    pub fn as_decision(&self) -> Option<&Decision> {
        match self {
            Self::Decision(decision) => Some(decision),
            Self::Rejected(_) => None,
        }
    }
}

/// Summary of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    batch_id: BatchId,
    decisions: BTreeMap<String, usize>,
    rejected: usize,
}

impl BatchReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(batch_id: BatchId) -> Self {
        Self {
            batch_id,
            decisions: BTreeMap::new(),
            rejected: 0,
        }
    }

    /// Returns the batch identifier.
    #[must_use]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    /// Returns the number of items that received a decision.
    #[must_use]
    pub fn evaluated(&self) -> usize {
        self.decisions.values().sum()
    }

    /// Returns the number of rejected items.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Returns how many items resolved to the supplied action.
    #[must_use]
    pub fn count(&self, action: &Action) -> usize {
        self.decisions.get(action.label()).copied().unwrap_or(0)
    }

    /// Returns the per-action decision counts keyed by label.
    #[must_use]
    pub fn decisions(&self) -> &BTreeMap<String, usize> {
        &self.decisions
    }

    fn record_decision(&mut self, decision: &Decision) {
        *self
            .decisions
            .entry(decision.decision().label().to_owned())
            .or_default() += 1;
    }
}

/// Runs one batch from its sources to its sink.
pub struct BatchRunner {
    policies: Arc<dyn PolicySource>,
    items: Arc<dyn ItemSource>,
    sink: Arc<dyn DecisionSink>,
    malformed_items: MalformedItemPolicy,
    default_action: Option<Action>,
    batch_id: BatchId,
}

impl BatchRunner {
    /// Creates a runner with a random batch id that fails on malformed items.
    #[must_use]
    pub fn new(
        policies: Arc<dyn PolicySource>,
        items: Arc<dyn ItemSource>,
        sink: Arc<dyn DecisionSink>,
    ) -> Self {
        Self {
            policies,
            items,
            sink,
            malformed_items: MalformedItemPolicy::default(),
            default_action: None,
            batch_id: BatchId::random(),
        }
    }

    /// Sets how malformed items are handled.
    #[must_use]
    pub fn with_malformed_items(mut self, policy: MalformedItemPolicy) -> Self {
        self.malformed_items = policy;
        self
    }

    /// Overrides the fallback action declared by the policy source.
    #[must_use]
    pub fn with_default_action(mut self, action: Action) -> Self {
        self.default_action = Some(action);
        self
    }

    /// Sets the batch identifier used in logs and the report.
    #[must_use]
    pub fn with_batch_id(mut self, batch_id: BatchId) -> Self {
        self.batch_id = batch_id;
        self
    }

    /// Returns the batch identifier.
    #[must_use]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    /// Loads the batch, evaluates every item, and writes the records.
    ///
    /// # Errors
    ///
    /// Returns the policy source's error before any item is read, the first
    /// malformed item when running with [`MalformedItemPolicy::Fail`], and any
    /// source or sink failure. Nothing is written when an error is returned
    /// before the sink is reached.
    pub async fn run(&self) -> Result<BatchReport> {
        let mut snapshot = self.policies.load_policies().await?;
        if let Some(action) = &self.default_action {
            snapshot = snapshot.with_default_action(action.clone());
        }
        info!(
            batch = %self.batch_id,
            policies = snapshot.len(),
            default_action = %snapshot.default_action(),
            "policy snapshot loaded"
        );
        let engine = DecisionEngine::new(snapshot);

        let entries = self.items.load_items().await?;
        debug!(batch = %self.batch_id, items = entries.len(), "items loaded");

        let mut report = BatchReport::new(self.batch_id);
        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Ok(item) => {
                    let decision = engine.evaluate(&item);
                    report.record_decision(&decision);
                    records.push(BatchRecord::Decision(decision));
                }
                Err(err)
                    if err.is_item_scoped()
                        && self.malformed_items == MalformedItemPolicy::Report =>
                {
                    warn!(batch = %self.batch_id, error = %err, "item rejected");
                    report.rejected += 1;
                    records.push(BatchRecord::Rejected(RejectedItem::try_from(err)?));
                }
                Err(err) => return Err(err),
            }
        }

        self.sink.write(&records).await?;
        info!(
            batch = %self.batch_id,
            evaluated = report.evaluated(),
            rejected = report.rejected(),
            "batch complete"
        );
        Ok(report)
    }
}
