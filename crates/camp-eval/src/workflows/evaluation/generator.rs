use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    Category, CriteriaCatalog, Evaluation, Evaluator, JoinedEvaluation, Participant, RecordId,
};
use super::join::{JoinPath, RecordJoinResolver, Resolution};
use super::layout::{CategoryBlock, LayoutError, ReportLabels, ReportLayoutBuilder, ReportPayload};
use super::repository::{
    EvaluationRepository, ReportNotice, ReportNotifier, ReportSink, RepositoryError, SheetTarget,
    SinkError,
};
use super::scores::{ScoreAggregator, ScoredEvaluation};
use super::stats::{EvaluatorStats, EvaluatorStatsAggregator};

/// Everything a run needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub target: SheetTarget,
    pub catalog: CriteriaCatalog,
    pub labels: ReportLabels,
}

/// The four record sets a run works from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSets {
    pub participants: Vec<Participant>,
    pub evaluators: Vec<Evaluator>,
    pub evaluations: Vec<Evaluation>,
    pub joined: Vec<JoinedEvaluation>,
}

/// Report computed from a [`RecordSets`], before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledReport {
    pub resolution: Resolution,
    pub evaluator_stats: Vec<EvaluatorStats>,
    pub payload: ReportPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum NotificationStatus {
    Delivered,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    pub target: SheetTarget,
    pub join_path: JoinPath,
    pub rows: usize,
    pub regions: usize,
    pub participants: usize,
    pub evaluator_rows: usize,
    pub unresolved: usize,
    pub notification: NotificationStatus,
}

/// Fetches records, derives the evaluation report and replaces the sink's
/// copy of it. A run either hands a complete payload to the sink or nothing.
pub struct ReportGenerator<R, S, N> {
    repository: Arc<R>,
    sink: Arc<S>,
    notifier: Arc<N>,
    settings: ReportSettings,
    resolver: RecordJoinResolver,
    scores: ScoreAggregator,
    stats: EvaluatorStatsAggregator,
    layout: ReportLayoutBuilder,
}

impl<R, S, N> ReportGenerator<R, S, N>
where
    R: EvaluationRepository + 'static,
    S: ReportSink + 'static,
    N: ReportNotifier + 'static,
{
    pub fn new(repository: Arc<R>, sink: Arc<S>, notifier: Arc<N>, settings: ReportSettings) -> Self {
        let layout = ReportLayoutBuilder::new(settings.labels.clone());
        Self {
            repository,
            sink,
            notifier,
            settings,
            resolver: RecordJoinResolver::new(),
            scores: ScoreAggregator::new(),
            stats: EvaluatorStatsAggregator::new(),
            layout,
        }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Load all record sets from the repository.
    pub async fn fetch(&self) -> Result<RecordSets, ReportError> {
        let participants = self.repository.participants().await?;
        let evaluators = self.repository.evaluators().await?;
        let evaluations = self.repository.evaluations().await?;
        let joined = self.repository.joined_evaluations().await?;

        info!(
            participants = participants.len(),
            evaluators = evaluators.len(),
            evaluations = evaluations.len(),
            joined = joined.len(),
            "fetched evaluation records"
        );
        if evaluators.is_empty() {
            warn!("evaluator roster is empty; statistics block will list no evaluators");
        }

        Ok(RecordSets {
            participants,
            evaluators,
            evaluations,
            joined,
        })
    }

    /// Fetch and compile without touching the sink.
    pub async fn prepare(&self) -> Result<CompiledReport, ReportError> {
        let records = self.fetch().await?;
        let compiled = self.compile(&records)?;

        match compiled.resolution.path {
            JoinPath::Primary => debug!("references resolved by repository join"),
            JoinPath::Manual => warn!(
                evaluations = records.evaluations.len(),
                "repository join resolved no evaluators; fell back to manual join"
            ),
        }
        for (evaluation, reason) in compiled.resolution.unresolved() {
            warn!(
                evaluation = %evaluation.id,
                reason = %reason.summary(),
                "evaluation excluded from score aggregation"
            );
        }

        Ok(compiled)
    }

    pub async fn run(&self) -> Result<GenerationOutcome, ReportError> {
        let compiled = self.prepare().await?;
        let target = &self.settings.target;

        self.sink.replace(target, &compiled.payload).await?;
        info!(
            sheet = %target,
            rows = compiled.payload.row_count(),
            regions = compiled.payload.regions.len(),
            "evaluation report written"
        );

        let participants = compiled
            .resolution
            .resolved()
            .map(|(_, participant, _)| &participant.id)
            .collect::<std::collections::HashSet<_>>()
            .len();

        let notice = ReportNotice {
            target: target.clone(),
            rows: compiled.payload.row_count(),
            participants,
            evaluators: compiled.evaluator_stats.len(),
            join_path: compiled.resolution.path,
        };
        let notification = match self.notifier.notify(&notice).await {
            Ok(()) => NotificationStatus::Delivered,
            Err(err) => {
                warn!(error = %err, "report notification failed");
                NotificationStatus::Failed(err.to_string())
            }
        };

        Ok(GenerationOutcome {
            target: target.clone(),
            join_path: compiled.resolution.path,
            rows: compiled.payload.row_count(),
            regions: compiled.payload.regions.len(),
            participants,
            evaluator_rows: compiled.evaluator_stats.len(),
            unresolved: compiled.resolution.unresolved_count(),
            notification,
        })
    }

    /// Pure part of a run: resolve, aggregate and lay out.
    pub fn compile(&self, records: &RecordSets) -> Result<CompiledReport, LayoutError> {
        let resolution = self.resolver.resolve(
            &records.joined,
            &records.evaluations,
            &records.participants,
            &records.evaluators,
        );

        let mut by_participant: HashMap<&RecordId, Vec<ScoredEvaluation<'_>>> = HashMap::new();
        for (evaluation, participant, evaluator) in resolution.resolved() {
            by_participant
                .entry(&participant.id)
                .or_default()
                .push(ScoredEvaluation {
                    evaluation,
                    evaluator_id: &evaluator.id,
                });
        }

        let blocks: Vec<CategoryBlock> = Category::ordered()
            .into_iter()
            .map(|category| {
                let criteria = self.settings.catalog.for_category(category).to_vec();
                let rows = records
                    .participants
                    .iter()
                    .filter(|participant| participant.category == category)
                    .map(|participant| {
                        let evaluations = by_participant
                            .get(&participant.id)
                            .map(Vec::as_slice)
                            .unwrap_or_default();
                        self.scores.aggregate(participant, evaluations, &criteria)
                    })
                    .collect();

                CategoryBlock {
                    category,
                    criteria,
                    rows,
                }
            })
            .collect();

        let evaluator_stats = self.stats.aggregate(&resolution, &records.evaluators);
        let payload = self.layout.build(&blocks, &evaluator_stats)?;

        Ok(CompiledReport {
            resolution,
            evaluator_stats,
            payload,
        })
    }
}

/// Error raised by a report run. Any of these aborts the run before the sink
/// sees a payload, except `Sink` itself.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
