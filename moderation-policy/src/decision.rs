//! Decision records and the resolver that produces them.

use moderation_primitives::Action;
use serde::{Deserialize, Serialize};

use crate::contracts::Item;

/// Content released in place of a sanitized output.
pub const SANITIZED_NOTICE: &str =
    "This response cannot be shown. Please consult a qualified professional.";

/// Content released in place of an escalated output.
pub const ESCALATED_NOTICE: &str = "Sent for human review";

/// Content released in place of a blocked output.
pub const BLOCKED_NOTICE: &str = "Output blocked";

/// Reason recorded when no policy targets the item's risk category.
pub const NO_MATCH_REASON: &str = "no applicable policy matched";

/// Auditable outcome of evaluating one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    id: String,
    decision: Action,
    applied_policies: Vec<String>,
    final_output: String,
    reason: String,
}

impl Decision {
    pub(crate) fn new(
        id: impl Into<String>,
        decision: Action,
        applied_policies: Vec<String>,
        final_output: String,
        reason: String,
    ) -> Self {
        Self {
            id: id.into(),
            decision,
            applied_policies,
            final_output,
            reason,
        }
    }

    /// Returns the identifier of the evaluated item.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resolved action.
    #[must_use]
    pub fn decision(&self) -> &Action {
        &self.decision
    }

    /// Returns the ids of every policy that targeted the item, in policy order.
    #[must_use]
    pub fn applied_policies(&self) -> &[String] {
        &self.applied_policies
    }

    /// Returns the content actually released.
    #[must_use]
    pub fn final_output(&self) -> &str {
        &self.final_output
    }

    /// Returns the audit reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns true when the original content was released.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.decision == Action::Allow
    }
}

/// Picks the most severe candidate.
///
/// Returns `None` for an empty candidate list. Candidates of equal severity
/// (only possible between unknown labels) resolve to the first one
/// encountered.
#[must_use]
pub fn resolve_action(candidates: &[Action]) -> Option<&Action> {
    candidates.iter().reduce(|best, candidate| {
        if candidate.severity() > best.severity() {
            candidate
        } else {
            best
        }
    })
}

/// Maps a resolved action to the content released for the item.
#[must_use]
pub fn render_output(action: &Action, item: &Item) -> String {
    match action {
        Action::Allow => item.output().to_owned(),
        Action::Sanitize => SANITIZED_NOTICE.to_owned(),
        Action::Escalate => ESCALATED_NOTICE.to_owned(),
        Action::Block | Action::Unknown(_) => BLOCKED_NOTICE.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(labels: &[&str]) -> Vec<Action> {
        labels.iter().copied().map(Action::from).collect()
    }

    #[test]
    fn resolver_picks_highest_severity() {
        let candidates = actions(&["allow", "escalate", "sanitize"]);
        assert_eq!(resolve_action(&candidates), Some(&Action::Escalate));

        assert_eq!(resolve_action(&[]), None);
    }

    #[test]
    fn block_always_wins() {
        for labels in [
            vec!["allow"],
            vec!["sanitize", "escalate"],
            vec!["mystery", "allow", "escalate"],
        ] {
            let mut candidates = actions(&labels);
            candidates.push(Action::Block);
            assert_eq!(resolve_action(&candidates), Some(&Action::Block));
        }
    }

    #[test]
    fn unknown_labels_lose_to_known_actions() {
        let candidates = actions(&["quarantine", "allow", "hold"]);
        assert_eq!(resolve_action(&candidates), Some(&Action::Allow));
    }

    #[test]
    fn first_unknown_label_wins_among_unknowns() {
        let candidates = actions(&["quarantine", "hold"]);
        assert_eq!(
            resolve_action(&candidates),
            Some(&Action::Unknown("quarantine".into()))
        );
    }

    #[test]
    fn output_depends_only_on_action() {
        let item = Item::new("x1", "high", "hello");

        assert_eq!(render_output(&Action::Allow, &item), "hello");
        assert_eq!(render_output(&Action::Sanitize, &item), SANITIZED_NOTICE);
        assert_eq!(render_output(&Action::Escalate, &item), ESCALATED_NOTICE);
        assert_eq!(render_output(&Action::Block, &item), BLOCKED_NOTICE);
        assert_eq!(render_output(&Action::from("hold"), &item), BLOCKED_NOTICE);
    }

    #[test]
    fn decision_serializes_in_audit_field_order() {
        let decision = Decision::new(
            "x1",
            Action::Block,
            vec!["p1".into()],
            BLOCKED_NOTICE.into(),
            "p1: confidence 0.9 < 0.95".into(),
        );

        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(
            json,
            r#"{"id":"x1","decision":"block","applied_policies":["p1"],"final_output":"Output blocked","reason":"p1: confidence 0.9 < 0.95"}"#
        );
    }
}
