//! Run configuration for a moderation batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use moderation_policy::{BatchRunner, MalformedItemPolicy};
use moderation_primitives::{Action, BatchId, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::loader::{JsonItemFile, JsonPolicyFile};
use crate::sink::JsonDecisionFile;

/// Settings for one batch run. Every field is optional in a JSON config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Path of the item list.
    pub inputs: PathBuf,
    /// Path of the policy document.
    pub policies: PathBuf,
    /// Path the decision records are written to.
    pub output: PathBuf,
    /// How malformed items are handled.
    pub malformed_items: MalformedItemPolicy,
    /// Overrides the policy document's fallback action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_action: Option<Action>,
    /// Fixed batch identifier; a random one is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,
    /// Tracing filter directive, e.g. `info` or `moderation_policy=debug`.
    /// `RUST_LOG` applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            inputs: PathBuf::from("inputs.json"),
            policies: PathBuf::from("policies.json"),
            output: PathBuf::from("output.json"),
            malformed_items: MalformedItemPolicy::default(),
            default_action: None,
            batch_id: None,
            log_filter: None,
        }
    }
}

impl RunConfig {
    /// Reads a configuration file, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Propagates I/O and deserialization failures.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Builds a runner reading and writing the configured files.
    #[must_use]
    pub fn runner(&self) -> BatchRunner {
        let mut runner = BatchRunner::new(
            Arc::new(JsonPolicyFile::new(&self.policies)),
            Arc::new(JsonItemFile::new(&self.inputs)),
            Arc::new(JsonDecisionFile::new(&self.output)),
        )
        .with_malformed_items(self.malformed_items);

        if let Some(action) = &self.default_action {
            runner = runner.with_default_action(action.clone());
        }
        if let Some(batch_id) = self.batch_id {
            runner = runner.with_batch_id(batch_id);
        }
        runner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use uuid::Uuid;

    #[test]
    fn defaults_match_conventional_file_names() {
        let config = RunConfig::default();

        assert_eq!(config.inputs, Path::new("inputs.json"));
        assert_eq!(config.policies, Path::new("policies.json"));
        assert_eq!(config.output, Path::new("output.json"));
        assert_eq!(config.malformed_items, MalformedItemPolicy::Fail);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: RunConfig = serde_json::from_value(json!({
            "output": "out/decisions.json",
            "malformed_items": "report",
            "default_action": "escalate",
        }))
        .unwrap();

        assert_eq!(config.inputs, Path::new("inputs.json"));
        assert_eq!(config.output, Path::new("out/decisions.json"));
        assert_eq!(config.malformed_items, MalformedItemPolicy::Report);
        assert_eq!(config.default_action, Some(Action::Escalate));
    }

    #[tokio::test]
    async fn configured_runner_processes_files() {
        let dir = std::env::temp_dir().join(format!("moderation-run-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let batch_id = BatchId::random();
        let config = RunConfig {
            inputs: dir.join("inputs.json"),
            policies: dir.join("policies.json"),
            output: dir.join("output.json"),
            malformed_items: MalformedItemPolicy::Report,
            default_action: None,
            batch_id: Some(batch_id),
            log_filter: None,
        };
        std::fs::write(
            &config.policies,
            serde_json::to_vec(&json!({
                "policies": [
                    {"id": "p1", "risk": "high", "min_confidence": 0.95, "allowed_actions": ["allow"]},
                ],
                "default_action": "allow",
            }))
            .unwrap(),
        )
        .unwrap();
        std::fs::write(
            &config.inputs,
            serde_json::to_vec(&json!([
                {"id": "x1", "risk": "high", "confidence": 0.9, "output": "hello"},
                {"id": "x2", "risk": "low", "confidence": 0.4, "output": "fine"},
                {"id": "x3", "risk": "low"},
            ]))
            .unwrap(),
        )
        .unwrap();

        let report = config.runner().run().await.unwrap();
        assert_eq!(report.batch_id(), batch_id);
        assert_eq!(report.evaluated(), 2);
        assert_eq!(report.rejected(), 1);

        let written: Value =
            serde_json::from_slice(&std::fs::read(&config.output).unwrap()).unwrap();
        assert_eq!(written[0]["decision"], "block");
        assert_eq!(written[1]["final_output"], "fine");
        assert_eq!(written[1]["reason"], "no applicable policy matched");
        assert_eq!(written[2]["id"], "x3");
        assert_eq!(written[2]["index"], 2);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn load_reads_json_file() {
        let path = std::env::temp_dir().join(format!("run-config-{}.json", Uuid::new_v4()));
        std::fs::write(&path, br#"{"log_filter": "debug"}"#).unwrap();

        let config = RunConfig::load(&path).await.unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert_eq!(config.output, Path::new("output.json"));

        let _ = std::fs::remove_file(path);
    }
}
