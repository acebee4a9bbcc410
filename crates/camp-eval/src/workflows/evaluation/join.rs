use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{Evaluation, Evaluator, JoinedEvaluation, Participant, RecordId};

/// Which mechanism produced the references of a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPath {
    Primary,
    Manual,
}

impl JoinPath {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "repository join",
            Self::Manual => "manual join",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnresolvedReason {
    /// The evaluation cannot be attributed to anyone; it is dropped everywhere.
    MissingEvaluator { reference: Option<RecordId> },
    /// The evaluator is known, so the evaluation still counts towards their total.
    MissingParticipant {
        reference: Option<RecordId>,
        evaluator: Evaluator,
    },
}

impl UnresolvedReason {
    pub fn summary(&self) -> String {
        match self {
            UnresolvedReason::MissingEvaluator { reference: None } => {
                "evaluation has no evaluator reference".to_string()
            }
            UnresolvedReason::MissingEvaluator {
                reference: Some(id),
            } => format!("evaluator {id} does not exist"),
            UnresolvedReason::MissingParticipant {
                reference: None, ..
            } => "evaluation has no participant reference".to_string(),
            UnresolvedReason::MissingParticipant {
                reference: Some(id),
                ..
            } => format!("participant {id} does not exist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinResult {
    Resolved {
        participant: Participant,
        evaluator: Evaluator,
    },
    Unresolved {
        reason: UnresolvedReason,
    },
}

impl JoinResult {
    fn from_parts(
        evaluation: &Evaluation,
        participant: Option<Participant>,
        evaluator: Option<Evaluator>,
    ) -> Self {
        match (participant, evaluator) {
            (Some(participant), Some(evaluator)) => JoinResult::Resolved {
                participant,
                evaluator,
            },
            (None, Some(evaluator)) => JoinResult::Unresolved {
                reason: UnresolvedReason::MissingParticipant {
                    reference: evaluation.participant_ref.clone(),
                    evaluator,
                },
            },
            (_, None) => JoinResult::Unresolved {
                reason: UnresolvedReason::MissingEvaluator {
                    reference: evaluation.evaluator_ref.clone(),
                },
            },
        }
    }

    /// Evaluator the evaluation is attributable to, if any.
    pub fn evaluator(&self) -> Option<&Evaluator> {
        match self {
            JoinResult::Resolved { evaluator, .. } => Some(evaluator),
            JoinResult::Unresolved {
                reason: UnresolvedReason::MissingParticipant { evaluator, .. },
            } => Some(evaluator),
            JoinResult::Unresolved {
                reason: UnresolvedReason::MissingEvaluator { .. },
            } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    pub evaluation: Evaluation,
    pub result: JoinResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub path: JoinPath,
    pub entries: Vec<ResolvedEntry>,
}

impl Resolution {
    pub fn resolved(&self) -> impl Iterator<Item = (&Evaluation, &Participant, &Evaluator)> {
        self.entries.iter().filter_map(|entry| match &entry.result {
            JoinResult::Resolved {
                participant,
                evaluator,
            } => Some((&entry.evaluation, participant, evaluator)),
            JoinResult::Unresolved { .. } => None,
        })
    }

    pub fn unresolved(&self) -> impl Iterator<Item = (&Evaluation, &UnresolvedReason)> {
        self.entries.iter().filter_map(|entry| match &entry.result {
            JoinResult::Unresolved { reason } => Some((&entry.evaluation, reason)),
            JoinResult::Resolved { .. } => None,
        })
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved().count()
    }
}

/// Attaches participant and evaluator records to every evaluation.
///
/// The repository join is trusted unless it could not attribute a single
/// evaluation to an evaluator while raw evaluations exist. That pattern means
/// the storage join degraded, so the resolver matches the raw foreign keys
/// against the independently fetched participant and evaluator lists instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordJoinResolver;

impl RecordJoinResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        joined: &[JoinedEvaluation],
        raw: &[Evaluation],
        participants: &[Participant],
        evaluators: &[Evaluator],
    ) -> Resolution {
        if Self::primary_degraded(joined, raw) {
            return Self::manual(raw, participants, evaluators);
        }

        let entries = joined
            .iter()
            .map(|record| ResolvedEntry {
                evaluation: record.evaluation.clone(),
                result: JoinResult::from_parts(
                    &record.evaluation,
                    record.participant.clone(),
                    record.evaluator.clone(),
                ),
            })
            .collect();

        Resolution {
            path: JoinPath::Primary,
            entries,
        }
    }

    fn primary_degraded(joined: &[JoinedEvaluation], raw: &[Evaluation]) -> bool {
        !raw.is_empty() && joined.iter().all(|record| record.evaluator.is_none())
    }

    fn manual(
        raw: &[Evaluation],
        participants: &[Participant],
        evaluators: &[Evaluator],
    ) -> Resolution {
        let participants_by_id: HashMap<&RecordId, &Participant> = participants
            .iter()
            .map(|participant| (&participant.id, participant))
            .collect();
        let evaluators_by_id: HashMap<&RecordId, &Evaluator> = evaluators
            .iter()
            .map(|evaluator| (&evaluator.id, evaluator))
            .collect();

        let entries = raw
            .iter()
            .map(|evaluation| {
                let participant = evaluation
                    .participant_ref
                    .as_ref()
                    .and_then(|id| participants_by_id.get(id))
                    .map(|participant| (*participant).clone());
                let evaluator = evaluation
                    .evaluator_ref
                    .as_ref()
                    .and_then(|id| evaluators_by_id.get(id))
                    .map(|evaluator| (*evaluator).clone());

                ResolvedEntry {
                    evaluation: evaluation.clone(),
                    result: JoinResult::from_parts(evaluation, participant, evaluator),
                }
            })
            .collect();

        Resolution {
            path: JoinPath::Manual,
            entries,
        }
    }
}
