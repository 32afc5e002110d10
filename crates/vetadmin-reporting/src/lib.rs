//! Export of batch run results to JSON, CSV and plain text.

use std::io::Write;
use std::path::Path;

use vetadmin_core::screen::ConfirmedBatch;
use vetadmin_core::{ActionKind, BatchOutcome, Overall, OutcomeStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    /// Infer the format from a file extension; unknown extensions export as
    /// plain text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Text,
        }
    }
}

fn status_str(s: OutcomeStatus) -> &'static str {
    match s {
        OutcomeStatus::Success => "success",
        OutcomeStatus::Failure => "failure",
    }
}

fn overall_str(o: Overall) -> &'static str {
    match o {
        Overall::Success => "success",
        Overall::PartialFailure => "partial_failure",
    }
}

/// Per-table outcomes sorted for export: failing tables first, table name as
/// tiebreaker.
fn sorted_outcomes(batch: &ConfirmedBatch) -> Vec<&BatchOutcome> {
    let mut outcomes: Vec<&BatchOutcome> = batch.outcome.per_table.iter().collect();
    outcomes.sort_by_key(|o| (!o.failed(), o.table.clone()));
    outcomes
}

/// Export one batch run to the given path, inferring the format from the
/// file extension.
pub fn export_batch(batch: &ConfirmedBatch, action: ActionKind, path: &Path) -> Result<(), String> {
    let content = match ExportFormat::from_path(path) {
        ExportFormat::Json => export_json(batch, action),
        ExportFormat::Csv => export_csv(batch, action),
        ExportFormat::Text => export_text(batch, action),
    };

    let mut file =
        std::fs::File::create(path).map_err(|e| format!("Failed to create file: {}", e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| format!("Failed to write: {}", e))?;
    Ok(())
}

fn export_json(batch: &ConfirmedBatch, action: ActionKind) -> String {
    let tables: Vec<serde_json::Value> = sorted_outcomes(batch)
        .iter()
        .map(|o| {
            serde_json::json!({
                "table": o.table,
                "status": status_str(o.status),
                "message": o.message,
                "ids": batch.plan.get(&o.table),
                "elapsed_ms": o.elapsed.map(|e| e.as_millis() as u64),
            })
        })
        .collect();

    let report = serde_json::json!({
        "action": action.label(),
        "overall": overall_str(batch.outcome.overall),
        "message": batch.outcome.message,
        "tables_total": batch.stats.tables,
        "records_total": batch.stats.records,
        "tables_succeeded": batch.stats.succeeded,
        "tables_failed": batch.stats.failed,
        "tables": tables,
    });
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".into())
}

fn export_csv(batch: &ConfirmedBatch, action: ActionKind) -> String {
    let mut out = String::from("action,table,status,ids,message\n");
    for o in sorted_outcomes(batch) {
        let ids = batch
            .plan
            .get(&o.table)
            .map(|ids| {
                ids.iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        let message = o.message.as_deref().unwrap_or("").replace(',', ";");
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            action.label(),
            o.table,
            status_str(o.status),
            ids,
            message
        ));
    }
    out
}

fn export_text(batch: &ConfirmedBatch, action: ActionKind) -> String {
    let mut out = format!(
        "Batch {}: {} ({}/{} tables succeeded, {} records)\n",
        action.label(),
        overall_str(batch.outcome.overall),
        batch.stats.succeeded,
        batch.stats.tables,
        batch.stats.records,
    );
    if let Some(ref message) = batch.outcome.message {
        out.push_str(&format!("Failures: {}\n", message));
    }
    out.push('\n');
    for o in sorted_outcomes(batch) {
        let ids = batch
            .plan
            .get(&o.table)
            .map(|ids| format!("{:?}", ids))
            .unwrap_or_default();
        match &o.message {
            Some(msg) => out.push_str(&format!(
                "  {} {} {}: {}\n",
                status_str(o.status),
                o.table,
                ids,
                msg
            )),
            None => out.push_str(&format!("  {} {} {}\n", status_str(o.status), o.table, ids)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use vetadmin_core::{AggregateOutcome, BatchStats};

    fn sample_batch() -> ConfirmedBatch {
        let mut plan = BTreeMap::new();
        plan.insert("brands".to_string(), vec![1, 2]);
        plan.insert("categories".to_string(), vec![5]);

        let per_table = vec![
            BatchOutcome {
                table: "brands".into(),
                status: OutcomeStatus::Success,
                message: None,
                elapsed: Some(std::time::Duration::from_millis(42)),
            },
            BatchOutcome {
                table: "categories".into(),
                status: OutcomeStatus::Failure,
                message: Some("locked".into()),
                elapsed: Some(std::time::Duration::from_millis(17)),
            },
        ];
        let stats = BatchStats::from_run(&plan, &per_table);
        ConfirmedBatch {
            plan,
            outcome: AggregateOutcome {
                overall: Overall::PartialFailure,
                message: Some("categories: locked".into()),
                per_table,
            },
            stats,
        }
    }

    #[test]
    fn format_inferred_from_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out.json")),
            ExportFormat::Json
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.csv")),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.log")),
            ExportFormat::Text
        );
    }

    #[test]
    fn json_report_carries_verdict_and_ids() {
        let content = export_json(&sample_batch(), ActionKind::Restore);
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed["action"], "restore");
        assert_eq!(parsed["overall"], "partial_failure");
        assert_eq!(parsed["tables_failed"], 1);
        // Failing tables sort first.
        assert_eq!(parsed["tables"][0]["table"], "categories");
        assert_eq!(parsed["tables"][1]["ids"], serde_json::json!([1, 2]));
    }

    #[test]
    fn csv_report_has_header_and_one_row_per_table() {
        let content = export_csv(&sample_batch(), ActionKind::Delete);
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "action,table,status,ids,message");
        assert!(lines[1].starts_with("delete,categories,failure,5,locked"));
        assert!(lines[2].starts_with("delete,brands,success,1 2,"));
    }

    #[test]
    fn text_report_mentions_failures() {
        let content = export_text(&sample_batch(), ActionKind::Restore);
        assert!(content.contains("partial_failure"));
        assert!(content.contains("categories: locked"));
    }

    #[test]
    fn export_writes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        export_batch(&sample_batch(), ActionKind::Restore, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"overall\""));
    }
}
