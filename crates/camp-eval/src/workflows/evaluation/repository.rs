use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{Evaluation, Evaluator, JoinedEvaluation, Participant};
use super::join::JoinPath;
use super::layout::ReportPayload;

/// Read side of record storage. Implementations return plain records; the core
/// never writes back.
#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    async fn participants(&self) -> Result<Vec<Participant>, RepositoryError>;
    async fn evaluators(&self) -> Result<Vec<Evaluator>, RepositoryError>;
    async fn evaluations(&self) -> Result<Vec<Evaluation>, RepositoryError>;

    /// Evaluations with references followed by storage. Stores without a join
    /// capability keep the default, which sends the resolver down the manual path.
    async fn joined_evaluations(&self) -> Result<Vec<JoinedEvaluation>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed record data: {0}")]
    Malformed(String),
}

/// Spreadsheet or document that receives a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTarget {
    pub sheet_id: String,
    pub sheet_name: String,
}

impl fmt::Display for SheetTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/'{}'", self.sheet_id, self.sheet_name)
    }
}

/// Destination for the finished report. `replace` must clear whatever the
/// target held before writing the full matrix and applying every region.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn replace(&self, target: &SheetTarget, payload: &ReportPayload)
        -> Result<(), SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink encoding failure: {0}")]
    Encoding(String),
    #[error("sink rejected report: {0}")]
    Rejected(String),
}

/// Short description of a finished run handed to notifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNotice {
    pub target: SheetTarget,
    pub rows: usize,
    pub participants: usize,
    pub evaluators: usize,
    pub join_path: JoinPath,
}

/// Best-effort outbound hook fired after the sink accepted a report.
#[async_trait]
pub trait ReportNotifier: Send + Sync {
    async fn notify(&self, notice: &ReportNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Notifier for runs that do not announce anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

#[async_trait]
impl ReportNotifier for SilentNotifier {
    async fn notify(&self, _notice: &ReportNotice) -> Result<(), NotifyError> {
        Ok(())
    }
}
