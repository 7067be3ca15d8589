//! Content item and policy contracts consumed by the decision engine.

use moderation_primitives::{Action, Score, deserialize_opaque_id};
use serde::{Deserialize, Serialize};

/// Risk-classified content awaiting a moderation decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "deserialize_opaque_id")]
    id: String,
    risk: String,
    #[serde(default)]
    confidence: Score,
    output: String,
}

impl Item {
    /// Creates an item with a confidence of zero.
    #[must_use]
    pub fn new(id: impl Into<String>, risk: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            risk: risk.into(),
            confidence: Score::ZERO,
            output: output.into(),
        }
    }

    /// Sets the classifier confidence and returns the updated item.
    #[must_use]
    pub fn with_confidence(mut self, confidence: impl Into<Score>) -> Self {
        self.confidence = confidence.into();
        self
    }

    /// Returns the item identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the risk category label.
    #[must_use]
    pub fn risk(&self) -> &str {
        &self.risk
    }

    /// Returns the classifier confidence.
    #[must_use]
    pub fn confidence(&self) -> Score {
        self.confidence
    }

    /// Returns the original content.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }
}

/// Declarative rule binding a risk category to a confidence threshold and the
/// actions permitted once that threshold is met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(deserialize_with = "deserialize_opaque_id")]
    id: String,
    risk: String,
    #[serde(default)]
    min_confidence: Score,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    allowed_actions: Vec<Action>,
}

impl Policy {
    /// Creates a policy with a zero threshold and no allowed actions.
    #[must_use]
    pub fn new(id: impl Into<String>, risk: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            risk: risk.into(),
            min_confidence: Score::ZERO,
            allowed_actions: Vec::new(),
        }
    }

    /// Sets the minimum confidence an item needs to satisfy the policy.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: impl Into<Score>) -> Self {
        self.min_confidence = min_confidence.into();
        self
    }

    /// Replaces the actions permitted when the threshold is satisfied.
    #[must_use]
    pub fn with_allowed_actions<I, A>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        self.allowed_actions = actions.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the policy identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the risk category the policy applies to.
    #[must_use]
    pub fn risk(&self) -> &str {
        &self.risk
    }

    /// Returns the minimum confidence threshold.
    #[must_use]
    pub fn min_confidence(&self) -> Score {
        self.min_confidence
    }

    /// Returns the actions permitted when the threshold is satisfied.
    #[must_use]
    pub fn allowed_actions(&self) -> &[Action] {
        &self.allowed_actions
    }

    /// Returns true when the policy targets the item's risk category.
    #[must_use]
    pub fn applies_to(&self, item: &Item) -> bool {
        self.risk == item.risk
    }
}

/// Immutable snapshot of the policies and fallback action for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySet {
    policies: Vec<Policy>,
    default_action: Action,
}

impl PolicySet {
    /// Creates a policy set in declaration order.
    #[must_use]
    pub fn new(policies: Vec<Policy>, default_action: Action) -> Self {
        Self {
            policies,
            default_action,
        }
    }

    /// Replaces the fallback action and returns the updated set.
    #[must_use]
    pub fn with_default_action(mut self, default_action: Action) -> Self {
        self.default_action = default_action;
        self
    }

    /// Returns the policies in declaration order.
    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Returns the action applied when no policy matches an item.
    #[must_use]
    pub fn default_action(&self) -> &Action {
        &self.default_action
    }

    /// Returns the number of policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true when the set holds no policies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        Self::new(Vec::new(), Action::Block)
    }
}
