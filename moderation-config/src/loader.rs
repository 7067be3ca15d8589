//! JSON loaders for policy documents and item lists.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use moderation_policy::{Item, ItemSource, Policy, PolicySet, PolicySource};
use moderation_primitives::{Action, Error, Result, opaque_id_text};
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

#[derive(Deserialize)]
struct PolicyDocument {
    #[serde(default)]
    policies: Vec<Value>,
    #[serde(default = "default_action")]
    default_action: Action,
}

fn default_action() -> Action {
    Action::Block
}

fn record_id(record: &Value) -> Option<String> {
    record.get("id").and_then(opaque_id_text)
}

/// Parses a policy document of the form
/// `{"policies": [...], "default_action": "<label>"}`.
///
/// `policies` defaults to an empty list and `default_action` to `block`.
///
/// # Errors
///
/// Returns [`Error::Serialization`] for invalid JSON,
/// [`Error::InvalidPolicyDocument`] when the top-level shape is wrong, and
/// [`Error::InvalidPolicy`] for the first policy missing `id` or `risk` or
/// carrying a field of the wrong type.
pub fn parse_policy_document(bytes: &[u8]) -> Result<PolicySet> {
    let document: Value = serde_json::from_slice(bytes)?;
    let document: PolicyDocument =
        serde_json::from_value(document).map_err(|err| Error::InvalidPolicyDocument {
            reason: err.to_string(),
        })?;

    let policies = document
        .policies
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let id = record_id(&record);
            serde_json::from_value::<Policy>(record)
                .map_err(|err| Error::invalid_policy(index, id, err.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PolicySet::new(policies, document.default_action))
}

/// Parses a JSON array of items, validating each entry on its own.
///
/// # Errors
///
/// Returns [`Error::Serialization`] when the document is not a JSON array.
/// Individual entries missing `id`, `risk` or `output`, or carrying a field of
/// the wrong type, come back as [`Error::MalformedItem`] inside the list.
pub fn parse_items(bytes: &[u8]) -> Result<Vec<Result<Item>>> {
    let records: Vec<Value> = serde_json::from_slice(bytes)?;

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let id = record_id(&record);
            serde_json::from_value::<Item>(record)
                .map_err(|err| Error::malformed_item(index, id, err.to_string()))
        })
        .collect())
}

/// Policy source backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonPolicyFile {
    path: PathBuf,
}

impl JsonPolicyFile {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PolicySource for JsonPolicyFile {
    async fn load_policies(&self) -> Result<PolicySet> {
        let bytes = fs::read(&self.path).await?;
        let set = parse_policy_document(&bytes)?;
        debug!(path = %self.path.display(), policies = set.len(), "policy file parsed");
        Ok(set)
    }
}

/// Item source backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonItemFile {
    path: PathBuf,
}

impl JsonItemFile {
    /// Creates a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ItemSource for JsonItemFile {
    async fn load_items(&self) -> Result<Vec<Result<Item>>> {
        let bytes = fs::read(&self.path).await?;
        let items = parse_items(&bytes)?;
        debug!(path = %self.path.display(), items = items.len(), "item file parsed");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moderation_primitives::Score;
    use serde_json::json;
    use uuid::Uuid;

    fn to_bytes(value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    #[test]
    fn policy_document_applies_defaults() {
        let set = parse_policy_document(&to_bytes(&json!({}))).unwrap();

        assert!(set.is_empty());
        assert_eq!(set.default_action(), &Action::Block);
    }

    #[test]
    fn policy_document_keeps_declaration_order() {
        let doc = json!({
            "policies": [
                {"id": "p1", "risk": "high", "min_confidence": 0.95, "allowed_actions": ["allow"]},
                {"id": "p2", "risk": "medical", "allowed_actions": ["sanitize", "hold"]},
            ],
            "default_action": "allow",
        });
        let set = parse_policy_document(&to_bytes(&doc)).unwrap();

        let ids: Vec<_> = set.policies().iter().map(Policy::id).collect();
        assert_eq!(ids, ["p1", "p2"]);
        assert_eq!(set.default_action(), &Action::Allow);
        assert_eq!(
            set.policies()[1].allowed_actions(),
            [Action::Sanitize, Action::from("hold")]
        );
    }

    #[test]
    fn policy_missing_risk_is_rejected_with_its_id() {
        let doc = json!({"policies": [
            {"id": "ok", "risk": "high"},
            {"id": "p2"},
        ]});
        let err = parse_policy_document(&to_bytes(&doc)).unwrap_err();

        match err {
            Error::InvalidPolicy { index, id, reason } => {
                assert_eq!(index, 1);
                assert_eq!(id.as_deref(), Some("p2"));
                assert!(reason.contains("risk"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn policy_missing_id_is_rejected() {
        let doc = json!({"policies": [{"risk": "high"}]});
        let err = parse_policy_document(&to_bytes(&doc)).unwrap_err();

        assert!(matches!(err, Error::InvalidPolicy { index: 0, id: None, .. }));
    }

    #[test]
    fn policy_with_string_threshold_is_rejected() {
        let doc = json!({"policies": [{"id": "p1", "risk": "high", "min_confidence": "high"}]});
        let err = parse_policy_document(&to_bytes(&doc)).unwrap_err();

        assert!(matches!(err, Error::InvalidPolicy { .. }));
    }

    #[test]
    fn non_object_document_is_rejected() {
        let err = parse_policy_document(b"[1, 2]").unwrap_err();
        assert!(matches!(err, Error::InvalidPolicyDocument { .. }));

        let err = parse_policy_document(b"{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn items_are_validated_individually() {
        let doc = json!([
            {"id": "x1", "risk": "high", "confidence": 0.9, "output": "hello"},
            {"id": "x2", "risk": "high"},
            {"risk": "low", "output": "no id"},
            {"id": "x4", "risk": "low", "output": "no confidence"},
        ]);
        let items = parse_items(&to_bytes(&doc)).unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_ref().unwrap().confidence(), Score::from(0.9));
        assert!(matches!(
            &items[1],
            Err(Error::MalformedItem { index: 1, id: Some(id), .. }) if id == "x2"
        ));
        assert!(matches!(
            &items[2],
            Err(Error::MalformedItem { index: 2, id: None, .. })
        ));
        assert_eq!(items[3].as_ref().unwrap().confidence(), Score::ZERO);
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let doc = json!({"policies": [{"id": 7, "risk": "high", "allowed_actions": ["allow"]}]});
        let set = parse_policy_document(&to_bytes(&doc)).unwrap();
        assert_eq!(set.policies()[0].id(), "7");

        let items = parse_items(&to_bytes(&json!([
            {"id": 1, "risk": "high", "confidence": 1, "output": "hi"},
            {"id": 2, "risk": "high"},
        ])))
        .unwrap();
        let item = items[0].as_ref().unwrap();
        assert_eq!(item.id(), "1");
        assert_eq!(item.confidence().to_string(), "1");
        assert!(matches!(
            &items[1],
            Err(Error::MalformedItem { index: 1, id: Some(id), .. }) if id == "2"
        ));
    }

    #[test]
    fn non_scalar_policy_id_is_rejected_without_id() {
        let doc = json!({"policies": [{"id": {"name": "p1"}, "risk": "high"}]});
        let err = parse_policy_document(&to_bytes(&doc)).unwrap_err();

        assert!(matches!(err, Error::InvalidPolicy { index: 0, id: None, .. }));
    }

    #[test]
    fn item_list_must_be_an_array() {
        let err = parse_items(br#"{"id": "x1"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[tokio::test]
    async fn file_sources_read_from_disk() {
        let dir = std::env::temp_dir().join(format!("moderation-loader-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let policies_path = dir.join("policies.json");
        let inputs_path = dir.join("inputs.json");
        std::fs::write(
            &policies_path,
            to_bytes(&json!({"policies": [{"id": "p1", "risk": "high"}]})),
        )
        .unwrap();
        std::fs::write(
            &inputs_path,
            to_bytes(&json!([{"id": "x1", "risk": "high", "output": "hi"}])),
        )
        .unwrap();

        let set = JsonPolicyFile::new(&policies_path)
            .load_policies()
            .await
            .unwrap();
        assert_eq!(set.len(), 1);

        let items = JsonItemFile::new(&inputs_path).load_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_ok());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn missing_file_surfaces_io_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4()));
        let err = JsonPolicyFile::new(path).load_policies().await.unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
    }
}
