use crate::cli::{OutputArgs, SheetFormat};
use async_trait::async_trait;
use camp_eval::workflows::evaluation::{
    CsvSheetSink, JsonSheetSink, NotifyError, ReportNotice, ReportNotifier, ReportPayload,
    ReportSink, SheetTarget, SinkError,
};
use std::path::PathBuf;
use tracing::info;

/// Announces finished reports through the log.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingNotifier;

#[async_trait]
impl ReportNotifier for TracingNotifier {
    async fn notify(&self, notice: &ReportNotice) -> Result<(), NotifyError> {
        info!(
            sheet = %notice.target,
            rows = notice.rows,
            participants = notice.participants,
            evaluators = notice.evaluators,
            join = notice.join_path.label(),
            "evaluation report published"
        );
        Ok(())
    }
}

/// File sink chosen on the command line.
#[derive(Debug, Clone)]
pub(crate) enum SheetOutput {
    Csv(CsvSheetSink),
    Json(JsonSheetSink),
}

impl SheetOutput {
    pub(crate) fn from_args(args: &OutputArgs) -> Self {
        match args.format {
            SheetFormat::Csv => Self::Csv(CsvSheetSink::new(&args.out)),
            SheetFormat::Json => Self::Json(JsonSheetSink::new(&args.out)),
        }
    }

    /// Primary file holding the matrix for `target`.
    pub(crate) fn location(&self, target: &SheetTarget) -> PathBuf {
        match self {
            Self::Csv(sink) => sink.matrix_path(target),
            Self::Json(sink) => sink.document_path(target),
        }
    }
}

#[async_trait]
impl ReportSink for SheetOutput {
    async fn replace(
        &self,
        target: &SheetTarget,
        payload: &ReportPayload,
    ) -> Result<(), SinkError> {
        match self {
            Self::Csv(sink) => sink.replace(target, payload).await,
            Self::Json(sink) => sink.replace(target, payload).await,
        }
    }
}
