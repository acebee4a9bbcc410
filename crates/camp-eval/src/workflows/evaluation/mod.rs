//! Evaluation summary report: record joins, score and workload aggregation,
//! and the styled sheet layout handed to an external sink.

pub mod domain;
pub mod generator;
pub mod join;
pub mod layout;
pub mod repository;
pub mod scores;
pub mod sheet;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
mod tests;

pub use domain::{
    Category, CriteriaCatalog, CriterionResult, Evaluation, Evaluator, JoinedEvaluation,
    Participant, RecordId, SCHEMA_VERSION,
};
pub use generator::{
    CompiledReport, GenerationOutcome, NotificationStatus, RecordSets, ReportError,
    ReportGenerator, ReportSettings,
};
pub use join::{JoinPath, JoinResult, RecordJoinResolver, Resolution, UnresolvedReason};
pub use layout::{
    CategoryBlock, CellValue, LayoutError, ReportLabels, ReportLayoutBuilder, ReportPayload,
    StyleRegion, StyleTag,
};
pub use repository::{
    EvaluationRepository, NotifyError, ReportNotice, ReportNotifier, ReportSink, RepositoryError,
    SheetTarget, SilentNotifier, SinkError,
};
pub use scores::{format_average, ParticipantScores, ScoreAggregator};
pub use sheet::{CsvSheetSink, JsonSheetSink};
pub use snapshot::{RecordSnapshot, SnapshotError, SnapshotRepository};
pub use stats::{EvaluatorStats, EvaluatorStatsAggregator};
