use crate::commands::{run_check_in, run_report, run_roster};
use camp_eval::config::{ReportOverrides, TelemetryConfig};
use camp_eval::error::AppError;
use camp_eval::telemetry;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "camp-eval",
    about = "Build the training camp evaluation summary sheet and manage check-ins",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the evaluation summary from a record snapshot
    Report(ReportArgs),
    /// Write the participant check-in roster sheet
    Roster(RosterArgs),
    /// Mark one participant as checked in (or not) on a roster sheet export
    CheckIn(CheckInArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SheetFormat {
    /// Matrix as CSV plus a JSON style sidecar
    Csv,
    /// Matrix and regions in one JSON document
    Json,
}

/// Where a generated sheet goes.
#[derive(Args, Debug, Clone)]
pub(crate) struct OutputArgs {
    /// Directory that receives the sheet files
    #[arg(long, default_value = "out")]
    pub(crate) out: PathBuf,
    /// Output format of the sheet files
    #[arg(long, value_enum, default_value_t = SheetFormat::Csv)]
    pub(crate) format: SheetFormat,
    /// Override REPORT_SHEET_ID
    #[arg(long)]
    pub(crate) sheet_id: Option<String>,
    /// Override the sheet name (REPORT_SHEET_NAME for reports,
    /// REPORT_ROSTER_SHEET_NAME for the roster)
    #[arg(long)]
    pub(crate) sheet_name: Option<String>,
}

impl OutputArgs {
    pub(crate) fn overrides(&self) -> ReportOverrides {
        ReportOverrides {
            sheet_id: self.sheet_id.clone(),
            sheet_name: self.sheet_name.clone(),
            ..ReportOverrides::default()
        }
    }

    pub(crate) fn roster_overrides(&self) -> ReportOverrides {
        ReportOverrides {
            sheet_id: self.sheet_id.clone(),
            roster_sheet_name: self.sheet_name.clone(),
            ..ReportOverrides::default()
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON record snapshot (participants, evaluators, evaluations)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
    /// Ignore stored references and match evaluations by id
    #[arg(long)]
    pub(crate) no_join: bool,
    /// Print the compiled payload as JSON instead of writing the sheet
    #[arg(long)]
    pub(crate) dry_run: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// JSON record snapshot providing the participants
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    #[command(flatten)]
    pub(crate) output: OutputArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckInStatus {
    CheckedIn,
    Absent,
}

#[derive(Args, Debug)]
pub(crate) struct CheckInArgs {
    /// Roster sheet exported as CSV; rewritten in place
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Participant name as it appears on the roster
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, value_enum, default_value_t = CheckInStatus::CheckedIn)]
    pub(crate) status: CheckInStatus,
    /// Zero-based column holding participant names
    #[arg(long, default_value_t = 0)]
    pub(crate) name_column: usize,
    /// Zero-based column holding the check-in status
    #[arg(long, default_value_t = 1)]
    pub(crate) status_column: usize,
    /// Leading header rows that never match a participant
    #[arg(long, default_value_t = 1)]
    pub(crate) header_rows: usize,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    telemetry::init(&TelemetryConfig::from_env())?;

    match cli.command {
        Command::Report(args) => run_report(args).await,
        Command::Roster(args) => run_roster(args).await,
        Command::CheckIn(args) => run_check_in(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_parse_with_defaults() {
        let cli = Cli::try_parse_from([
            "camp-eval",
            "report",
            "--snapshot",
            "records.json",
            "--sheet-name",
            "Evaluation",
        ])
        .expect("arguments parse");

        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.snapshot, PathBuf::from("records.json"));
        assert_eq!(args.output.format, SheetFormat::Csv);
        assert_eq!(args.output.out, PathBuf::from("out"));
        assert!(!args.no_join);
        assert_eq!(
            args.output.overrides(),
            ReportOverrides {
                sheet_name: Some("Evaluation".to_string()),
                ..ReportOverrides::default()
            }
        );
    }

    #[test]
    fn roster_sheet_name_flag_targets_the_roster_sheet() {
        let cli = Cli::try_parse_from([
            "camp-eval",
            "roster",
            "--snapshot",
            "records.json",
            "--sheet-name",
            "Arrivals",
        ])
        .expect("arguments parse");

        let Command::Roster(args) = cli.command else {
            panic!("expected roster command");
        };
        let overrides = args.output.roster_overrides();
        assert_eq!(overrides.roster_sheet_name.as_deref(), Some("Arrivals"));
        assert_eq!(overrides.sheet_name, None);
    }

    #[test]
    fn check_in_accepts_status_and_columns() {
        let cli = Cli::try_parse_from([
            "camp-eval",
            "check-in",
            "--roster",
            "roster.csv",
            "--name",
            "Alice",
            "--status",
            "absent",
            "--status-column",
            "8",
        ])
        .expect("arguments parse");

        let Command::CheckIn(args) = cli.command else {
            panic!("expected check-in command");
        };
        assert_eq!(args.status, CheckInStatus::Absent);
        assert_eq!(args.name_column, 0);
        assert_eq!(args.status_column, 8);
        assert_eq!(args.header_rows, 1);
    }

    #[test]
    fn report_requires_a_snapshot() {
        assert!(Cli::try_parse_from(["camp-eval", "report"]).is_err());
    }
}
