//! File sink writing batch records as a pretty-printed JSON array.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use moderation_policy::{BatchRecord, DecisionSink};
use moderation_primitives::Result;
use tokio::fs;
use tracing::debug;

/// Decision sink that replaces the target file with the batch records.
#[derive(Debug, Clone)]
pub struct JsonDecisionFile {
    path: PathBuf,
}

impl JsonDecisionFile {
    /// Creates a sink writing to `path`.
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
impl DecisionSink for JsonDecisionFile {
    async fn write(&self, records: &[BatchRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(records)?;
        fs::write(&self.path, body).await?;
        debug!(path = %self.path.display(), records = records.len(), "decisions written");
        Ok(())
    }
}
