//! Policy matching, threshold evaluation, and the decision engine.

use moderation_primitives::Action;
use tracing::debug;

use crate::contracts::{Item, Policy, PolicySet};
use crate::decision::{Decision, NO_MATCH_REASON, render_output, resolve_action};

/// Returns the policies targeting the item's risk category, in declaration
/// order.
#[must_use]
pub fn match_policies<'p>(item: &Item, policies: &'p [Policy]) -> Vec<&'p Policy> {
    policies
        .iter()
        .filter(|policy| policy.applies_to(item))
        .collect()
}

/// Candidate actions and audit fragment produced by one matched policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdVerdict {
    satisfied: bool,
    candidates: Vec<Action>,
    reason: String,
}

impl ThresholdVerdict {
    /// Returns the candidate actions proposed by the policy.
    #[must_use]
    pub fn candidates(&self) -> &[Action] {
        &self.candidates
    }

    /// Returns the audit fragment for the policy.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns true when the policy forced a block because the item fell short
    /// of its threshold.
    #[must_use]
    pub fn is_forced_block(&self) -> bool {
        !self.satisfied
    }
}

/// Compares the item's confidence against one policy's threshold.
///
/// An item below the threshold always yields `block`, whatever the policy
/// allows. Otherwise every allowed action becomes a candidate.
#[must_use]
pub fn evaluate_threshold(item: &Item, policy: &Policy) -> ThresholdVerdict {
    if item.confidence() < policy.min_confidence() {
        ThresholdVerdict {
            satisfied: false,
            candidates: vec![Action::Block],
            reason: format!(
                "{}: confidence {} < {}",
                policy.id(),
                item.confidence(),
                policy.min_confidence()
            ),
        }
    } else {
        ThresholdVerdict {
            satisfied: true,
            candidates: policy.allowed_actions().to_vec(),
            reason: format!("{}: confidence threshold satisfied", policy.id()),
        }
    }
}

/// Accumulated result of evaluating every matched policy for one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    applied_policies: Vec<String>,
    candidates: Vec<Action>,
    reasons: Vec<String>,
}

impl Evaluation {
    /// Returns the ids of the matched policies in match order.
    #[must_use]
    pub fn applied_policies(&self) -> &[String] {
        &self.applied_policies
    }

    /// Returns every candidate action, duplicates included.
    #[must_use]
    pub fn candidates(&self) -> &[Action] {
        &self.candidates
    }

    /// Returns the per-policy audit fragments in match order.
    #[must_use]
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    fn push(&mut self, policy: &Policy, verdict: ThresholdVerdict) {
        self.applied_policies.push(policy.id().to_owned());
        self.candidates.extend(verdict.candidates);
        self.reasons.push(verdict.reason);
    }
}

/// Evaluates the thresholds of the matched policies in order.
#[must_use]
pub fn evaluate_thresholds(item: &Item, matched: &[&Policy]) -> Evaluation {
    let mut evaluation = Evaluation::default();
    for policy in matched {
        let verdict = evaluate_threshold(item, policy);
        debug!(
            item = item.id(),
            policy = policy.id(),
            candidates = ?verdict.candidates(),
            "policy matched"
        );
        evaluation.push(policy, verdict);
    }
    evaluation
}

/// Evaluates one item against the policies and produces its decision.
///
/// When no candidate action comes out of the matched policies, either because
/// none matched or because every match allows nothing, `default_action`
/// applies with [`NO_MATCH_REASON`]. Matched policies stay listed in
/// `applied_policies` either way.
#[must_use]
pub fn evaluate(item: &Item, policies: &[Policy], default_action: &Action) -> Decision {
    let matched = match_policies(item, policies);
    let evaluation = evaluate_thresholds(item, &matched);

    let (action, reason) = match resolve_action(evaluation.candidates()) {
        Some(action) => (action.clone(), evaluation.reasons().join("; ")),
        None => (default_action.clone(), NO_MATCH_REASON.to_owned()),
    };

    let final_output = render_output(&action, item);
    debug!(item = item.id(), decision = %action, "item resolved");

    Decision::new(
        item.id(),
        action,
        evaluation.applied_policies,
        final_output,
        reason,
    )
}

/// Evaluates a batch of items, returning decisions in input order.
#[must_use]
pub fn evaluate_all(items: &[Item], policies: &[Policy], default_action: &Action) -> Vec<Decision> {
    items
        .iter()
        .map(|item| evaluate(item, policies, default_action))
        .collect()
}

/// Decision engine bound to one immutable policy snapshot.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    policies: PolicySet,
}

impl DecisionEngine {
    /// Creates an engine over the supplied policy snapshot.
    #[must_use]
    pub fn new(policies: PolicySet) -> Self {
        Self { policies }
    }

    /// Returns the policy snapshot the engine evaluates against.
    #[must_use]
    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Evaluates one item.
    #[must_use]
    pub fn evaluate(&self, item: &Item) -> Decision {
        evaluate(
            item,
            self.policies.policies(),
            self.policies.default_action(),
        )
    }

    /// Evaluates a batch of items, preserving input order.
    #[must_use]
    pub fn evaluate_all(&self, items: &[Item]) -> Vec<Decision> {
        evaluate_all(
            items,
            self.policies.policies(),
            self.policies.default_action(),
        )
    }
}
