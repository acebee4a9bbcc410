use crate::cli::{CheckInArgs, CheckInStatus, ReportArgs, RosterArgs};
use crate::infra::{SheetOutput, TracingNotifier};
use camp_eval::config::AppConfig;
use camp_eval::error::AppError;
use camp_eval::workflows::checkin::{
    read_rows, roster_payload, write_rows, CheckInUpdate, RosterColumns,
};
use camp_eval::workflows::evaluation::{
    GenerationOutcome, NotificationStatus, ReportGenerator, ReportSink, SnapshotRepository,
};
use std::fs::File;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load_with(&args.output.overrides())?;
    let repository = SnapshotRepository::from_path(&args.snapshot)?.with_join(!args.no_join);
    let output = Arc::new(SheetOutput::from_args(&args.output));

    info!(
        environment = ?config.environment,
        snapshot = %args.snapshot.display(),
        "generating evaluation report"
    );

    let generator = ReportGenerator::new(
        Arc::new(repository),
        output.clone(),
        Arc::new(TracingNotifier),
        config.report.settings(),
    );

    if args.dry_run {
        let compiled = generator.prepare().await?;
        println!("{}", serde_json::to_string_pretty(&compiled.payload)?);
        return Ok(());
    }

    let outcome = generator.run().await?;
    render_outcome(&outcome, &output);
    Ok(())
}

fn render_outcome(outcome: &GenerationOutcome, output: &SheetOutput) {
    println!("Evaluation report for {}", outcome.target);
    println!("  Written to: {}", output.location(&outcome.target).display());
    println!(
        "  Rows: {} | Styled regions: {}",
        outcome.rows, outcome.regions
    );
    println!(
        "  Participants evaluated: {} | Evaluators listed: {}",
        outcome.participants, outcome.evaluator_rows
    );
    println!("  References: {}", outcome.join_path.label());
    if outcome.unresolved > 0 {
        println!(
            "  Skipped {} evaluation(s) with unresolved references",
            outcome.unresolved
        );
    }
    if let NotificationStatus::Failed(detail) = &outcome.notification {
        println!("  Notification failed: {detail}");
    }
}

pub(crate) async fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    let config = AppConfig::load_with(&args.output.roster_overrides())?;
    let repository = SnapshotRepository::from_path(&args.snapshot)?;
    let output = SheetOutput::from_args(&args.output);
    let target = config.report.roster_target();

    let payload = roster_payload(&repository.snapshot().participants);
    output.replace(&target, &payload).await?;

    info!(sheet = %target, participants = payload.row_count() - 1, "check-in roster written");
    println!(
        "Roster with {} participant(s) written to {}",
        payload.row_count() - 1,
        output.location(&target).display()
    );
    Ok(())
}

pub(crate) fn run_check_in(args: CheckInArgs) -> Result<(), AppError> {
    let columns = RosterColumns {
        name: args.name_column,
        status: args.status_column,
        header_rows: args.header_rows,
    };
    let checked_in = args.status == CheckInStatus::CheckedIn;

    let mut rows = read_rows(File::open(&args.roster)?)?;
    let update = CheckInUpdate::locate(&rows, columns, &args.name, checked_in).ok_or_else(|| {
        AppError::CheckIn(format!(
            "participant '{}' not found in {}",
            args.name.trim(),
            args.roster.display()
        ))
    })?;

    update.apply(&mut rows);
    write_rows(File::create(&args.roster)?, &rows)?;

    info!(
        participant = args.name.trim(),
        cell = %update.cell_reference(),
        checked_in,
        "check-in status updated"
    );
    println!("{}", check_in_summary(&update, &args.name));
    Ok(())
}

/// Describes the cell exactly as it was written to the roster file.
fn check_in_summary(update: &CheckInUpdate, name: &str) -> String {
    let written = match update.written_value() {
        "" => "blank",
        value => value,
    };
    format!(
        "{} set to {} for {}",
        update.cell_reference(),
        written,
        name.trim()
    )
}
