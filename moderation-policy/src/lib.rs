//! Moderation policy evaluation.
//!
//! Items are matched to policies by risk category, each matched policy's
//! confidence threshold yields candidate actions, and the candidates are
//! resolved to a single action by severity. Evaluation is synchronous and
//! pure; the [`integrations`] module holds the traits used to feed a batch in
//! from the outside and persist its decisions.

#![warn(missing_docs, clippy::pedantic)]

pub mod contracts;
pub mod decision;
pub mod engine;
pub mod integrations;

pub use contracts::{Item, Policy, PolicySet};
pub use decision::{
    BLOCKED_NOTICE, Decision, ESCALATED_NOTICE, NO_MATCH_REASON, SANITIZED_NOTICE, render_output,
    resolve_action,
};
pub use engine::{
    DecisionEngine, Evaluation, ThresholdVerdict, evaluate, evaluate_all, evaluate_threshold,
    evaluate_thresholds, match_policies,
};
pub use integrations::{
    BatchRecord, BatchReport, BatchRunner, DecisionSink, ItemSource, MalformedItemPolicy,
    PolicySource, RejectedItem,
};
pub use moderation_primitives::{Action, BatchId, Error, Result, Score, Severity};
