use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{Evaluation, Evaluator, JoinedEvaluation, Participant, SCHEMA_VERSION};
use super::repository::{EvaluationRepository, RepositoryError};

/// On-disk export of the three record collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub schema_version: u32,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub evaluators: Vec<Evaluator>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read record snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid record snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record snapshot uses schema version {found}, expected {expected}")]
    SchemaVersion { found: u32, expected: u32 },
}

/// Repository backed by a [`RecordSnapshot`] held in memory.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    snapshot: RecordSnapshot,
    join_enabled: bool,
}

impl SnapshotRepository {
    pub fn new(snapshot: RecordSnapshot) -> Self {
        Self {
            snapshot,
            join_enabled: true,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let snapshot: RecordSnapshot = serde_json::from_reader(reader)?;
        if snapshot.schema_version != SCHEMA_VERSION {
            return Err(SnapshotError::SchemaVersion {
                found: snapshot.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(Self::new(snapshot))
    }

    /// Turn the reference join off, as if storage could not follow references.
    pub fn with_join(mut self, enabled: bool) -> Self {
        self.join_enabled = enabled;
        self
    }

    pub fn snapshot(&self) -> &RecordSnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl EvaluationRepository for SnapshotRepository {
    async fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.snapshot.participants.clone())
    }

    async fn evaluators(&self) -> Result<Vec<Evaluator>, RepositoryError> {
        Ok(self.snapshot.evaluators.clone())
    }

    async fn evaluations(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        Ok(self.snapshot.evaluations.clone())
    }

    async fn joined_evaluations(&self) -> Result<Vec<JoinedEvaluation>, RepositoryError> {
        if !self.join_enabled {
            return Ok(Vec::new());
        }

        let participants: HashMap<_, _> = self
            .snapshot
            .participants
            .iter()
            .map(|participant| (&participant.id, participant))
            .collect();
        let evaluators: HashMap<_, _> = self
            .snapshot
            .evaluators
            .iter()
            .map(|evaluator| (&evaluator.id, evaluator))
            .collect();

        Ok(self
            .snapshot
            .evaluations
            .iter()
            .map(|evaluation| JoinedEvaluation {
                evaluation: evaluation.clone(),
                participant: evaluation
                    .participant_ref
                    .as_ref()
                    .and_then(|id| participants.get(id))
                    .map(|participant| (*participant).clone()),
                evaluator: evaluation
                    .evaluator_ref
                    .as_ref()
                    .and_then(|id| evaluators.get(id))
                    .map(|evaluator| (*evaluator).clone()),
            })
            .collect())
    }
}
