use std::io::Write;

use owo_colors::OwoColorize;
use vetadmin_core::screen::ConfirmedBatch;
use vetadmin_core::{ActionKind, BatchOutcome, Group, Overall, Record};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Best-effort display name for a record: its `name` field if present.
fn record_label(record: &Record) -> &str {
    record
        .fields
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("-")
}

/// Print the fetched working set, one section per group in fetch order.
pub fn print_groups(w: &mut dyn Write, groups: &[Group], color: ColorMode) -> std::io::Result<()> {
    if groups.is_empty() {
        writeln!(w, "No records.")?;
        return Ok(());
    }

    for group in groups {
        let header = format!("{} ({})", group.table_name, group.records.len());
        if color.enabled() {
            writeln!(w, "{}", header.bold())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        for record in &group.records {
            writeln!(
                w,
                "  {:>6}  {}  [{}]",
                record.id,
                record_label(record),
                record.key()
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// One line per table as its outcome lands, suitable for
/// `ProgressBar::println`.
pub fn outcome_line(outcome: &BatchOutcome, color: ColorMode) -> String {
    let elapsed = outcome
        .elapsed
        .map(|e| format!(" ({:.1}s)", e.as_secs_f64()))
        .unwrap_or_default();

    if outcome.failed() {
        let message = outcome.message.as_deref().unwrap_or("request failed");
        let line = format!("✗ {}: {}{}", outcome.table, message, elapsed);
        if color.enabled() {
            line.red().to_string()
        } else {
            line
        }
    } else {
        let line = format!("✓ {}{}", outcome.table, elapsed);
        if color.enabled() {
            line.green().to_string()
        } else {
            line
        }
    }
}

/// Print the aggregate verdict and stats after a batch run.
pub fn print_batch_summary(
    w: &mut dyn Write,
    batch: &ConfirmedBatch,
    action: ActionKind,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    match batch.outcome.overall {
        Overall::Success => {
            let line = format!(
                "Batch {} succeeded: {} record(s) across {} table(s).",
                action,
                batch.stats.records,
                batch.stats.tables
            );
            if color.enabled() {
                writeln!(w, "{}", line.green().bold())?;
            } else {
                writeln!(w, "{}", line)?;
            }
        }
        Overall::PartialFailure => {
            let line = format!(
                "Batch {} partially failed: {}/{} table(s) succeeded.",
                action, batch.stats.succeeded, batch.stats.tables
            );
            if color.enabled() {
                writeln!(w, "{}", line.red().bold())?;
            } else {
                writeln!(w, "{}", line)?;
            }
            if let Some(ref message) = batch.outcome.message {
                writeln!(w, "  {}", message)?;
            }
        }
    }
    Ok(())
}
