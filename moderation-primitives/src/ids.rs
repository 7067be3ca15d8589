//! Batch identifiers.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Correlates the log lines and report of one evaluation batch.
///
/// Runs get a fresh random id unless the operator pins one (for example to
/// match an upstream job id) through configuration.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(Uuid);

impl BatchId {
    /// Generates a fresh batch identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for BatchId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for BatchId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_id_survives_config_round_trip() {
        let id = BatchId::random();
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, format!("\"{id}\""));
        assert_eq!(serde_json::from_str::<BatchId>(&json).unwrap(), id);
        assert_eq!(id.to_string().parse::<BatchId>().unwrap(), id);
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(BatchId::random(), BatchId::random());
    }

    #[test]
    fn rejects_garbage() {
        let err = "not-a-uuid".parse::<BatchId>().unwrap_err();
        assert!(matches!(err, Error::InvalidBatchId { .. }));
    }
}
