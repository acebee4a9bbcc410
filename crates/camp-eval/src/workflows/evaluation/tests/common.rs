use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::workflows::evaluation::domain::{
    Category, CriteriaCatalog, CriterionResult, Evaluation, Evaluator, JoinedEvaluation,
    Participant, RecordId,
};
use crate::workflows::evaluation::generator::{RecordSets, ReportGenerator, ReportSettings};
use crate::workflows::evaluation::join::{RecordJoinResolver, Resolution};
use crate::workflows::evaluation::layout::{ReportLabels, ReportPayload};
use crate::workflows::evaluation::repository::{
    EvaluationRepository, NotifyError, ReportNotice, ReportNotifier, ReportSink, RepositoryError,
    SheetTarget, SinkError,
};

pub(super) fn participant(id: &str, name: &str, category: Category) -> Participant {
    Participant {
        id: RecordId::new(id),
        name: name.to_string(),
        category,
        checked_in: false,
    }
}

pub(super) fn evaluator(id: &str, name: &str) -> Evaluator {
    Evaluator {
        id: RecordId::new(id),
        name: name.to_string(),
    }
}

pub(super) fn evaluation(
    id: &str,
    participant: Option<&str>,
    evaluator: Option<&str>,
    scores: &[(&str, Option<f64>)],
) -> Evaluation {
    Evaluation {
        id: RecordId::new(id),
        participant_ref: participant.map(RecordId::new),
        evaluator_ref: evaluator.map(RecordId::new),
        criteria: scores
            .iter()
            .map(|(name, score)| CriterionResult {
                name: name.to_string(),
                score: *score,
                evidence: format!("observed {name}"),
            })
            .collect(),
        created_at: Utc
            .with_ymd_and_hms(2025, 7, 12, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn catalog() -> CriteriaCatalog {
    CriteriaCatalog::new(
        vec!["Energy".to_string(), "Discipline".to_string()],
        vec![
            "Energy".to_string(),
            "Teamwork".to_string(),
            "Focus".to_string(),
        ],
    )
}

pub(super) fn target() -> SheetTarget {
    SheetTarget {
        sheet_id: "sheet-1".to_string(),
        sheet_name: "Evaluation".to_string(),
    }
}

pub(super) fn settings() -> ReportSettings {
    ReportSettings {
        target: target(),
        catalog: catalog(),
        labels: ReportLabels::default(),
    }
}

/// Join the way storage would: follow each reference that exists.
pub(super) fn join(
    evaluations: &[Evaluation],
    participants: &[Participant],
    evaluators: &[Evaluator],
) -> Vec<JoinedEvaluation> {
    evaluations
        .iter()
        .map(|evaluation| JoinedEvaluation {
            evaluation: evaluation.clone(),
            participant: participants
                .iter()
                .find(|p| Some(&p.id) == evaluation.participant_ref.as_ref())
                .cloned(),
            evaluator: evaluators
                .iter()
                .find(|e| Some(&e.id) == evaluation.evaluator_ref.as_ref())
                .cloned(),
        })
        .collect()
}

/// Resolve raw evaluations by id, without a repository join.
pub(super) fn resolve(
    evaluations: &[Evaluation],
    participants: &[Participant],
    evaluators: &[Evaluator],
) -> Resolution {
    RecordJoinResolver::new().resolve(&[], evaluations, participants, evaluators)
}

/// Alice (leader) rated by X and Y, Bob (supporter) never rated, Z on the
/// roster without evaluations.
pub(super) fn camp_records() -> RecordSets {
    let participants = vec![
        participant("p-alice", "Alice", Category::Leader),
        participant("p-bob", "Bob", Category::Supporter),
    ];
    let evaluators = vec![
        evaluator("e-x", "Evaluator X"),
        evaluator("e-y", "Evaluator Y"),
        evaluator("e-z", "Evaluator Z"),
    ];
    let evaluations = vec![
        evaluation("v1", Some("p-alice"), Some("e-x"), &[("Energy", Some(5.0))]),
        evaluation("v2", Some("p-alice"), Some("e-y"), &[("Energy", Some(3.0))]),
    ];
    let joined = join(&evaluations, &participants, &evaluators);

    RecordSets {
        participants,
        evaluators,
        evaluations,
        joined,
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: RecordSets,
    pub(super) unavailable: bool,
}

impl MemoryRepository {
    pub(super) fn new(records: RecordSets) -> Self {
        Self {
            records,
            unavailable: false,
        }
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EvaluationRepository for MemoryRepository {
    async fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        self.check()?;
        Ok(self.records.participants.clone())
    }

    async fn evaluators(&self) -> Result<Vec<Evaluator>, RepositoryError> {
        self.check()?;
        Ok(self.records.evaluators.clone())
    }

    async fn evaluations(&self) -> Result<Vec<Evaluation>, RepositoryError> {
        self.check()?;
        Ok(self.records.evaluations.clone())
    }

    async fn joined_evaluations(&self) -> Result<Vec<JoinedEvaluation>, RepositoryError> {
        self.check()?;
        Ok(self.records.joined.clone())
    }
}

#[derive(Default)]
pub(super) struct MemorySink {
    writes: Mutex<Vec<(SheetTarget, ReportPayload)>>,
    reject: bool,
}

impl MemorySink {
    pub(super) fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub(super) fn writes(&self) -> Vec<(SheetTarget, ReportPayload)> {
        self.writes.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl ReportSink for MemorySink {
    async fn replace(
        &self,
        target: &SheetTarget,
        payload: &ReportPayload,
    ) -> Result<(), SinkError> {
        if self.reject {
            return Err(SinkError::Rejected("quota exceeded".to_string()));
        }
        self.writes
            .lock()
            .expect("sink mutex poisoned")
            .push((target.clone(), payload.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<ReportNotice>>,
    failing: AtomicBool,
}

impl MemoryNotifier {
    pub(super) fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::Relaxed);
        notifier
    }

    pub(super) fn notices(&self) -> Vec<ReportNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl ReportNotifier for MemoryNotifier {
    async fn notify(&self, notice: &ReportNotice) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(NotifyError::Transport("webhook timed out".to_string()));
        }
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice.clone());
        Ok(())
    }
}

pub(super) type TestGenerator = ReportGenerator<MemoryRepository, MemorySink, MemoryNotifier>;

pub(super) fn generator(
    repository: MemoryRepository,
) -> (TestGenerator, Arc<MemorySink>, Arc<MemoryNotifier>) {
    generator_with(repository, MemorySink::default(), MemoryNotifier::default())
}

pub(super) fn generator_with(
    repository: MemoryRepository,
    sink: MemorySink,
    notifier: MemoryNotifier,
) -> (TestGenerator, Arc<MemorySink>, Arc<MemoryNotifier>) {
    generator_from(repository, sink, notifier, settings())
}

pub(super) fn generator_from(
    repository: MemoryRepository,
    sink: MemorySink,
    notifier: MemoryNotifier,
    settings: ReportSettings,
) -> (TestGenerator, Arc<MemorySink>, Arc<MemoryNotifier>) {
    let sink = Arc::new(sink);
    let notifier = Arc::new(notifier);
    let generator =
        ReportGenerator::new(Arc::new(repository), sink.clone(), notifier.clone(), settings);
    (generator, sink, notifier)
}
