//! Folding per-table outcomes into one user-facing verdict.

use crate::{AggregateOutcome, BatchOutcome, Overall};

/// Combine the per-table outcomes of one batch run.
///
/// The verdict is `Success` iff every table succeeded; otherwise
/// `PartialFailure`, with the failing tables' messages joined into one
/// user-facing string. Whatever the verdict, the caller still refetches and
/// resets the selection; there is no retry and no rollback.
pub fn aggregate_outcomes(outcomes: Vec<BatchOutcome>) -> AggregateOutcome {
    let failing: Vec<String> = outcomes
        .iter()
        .filter(|o| o.failed())
        .map(|o| match &o.message {
            Some(msg) => format!("{}: {}", o.table, msg),
            None => format!("{}: request failed", o.table),
        })
        .collect();

    if failing.is_empty() {
        AggregateOutcome {
            overall: Overall::Success,
            message: None,
            per_table: outcomes,
        }
    } else {
        AggregateOutcome {
            overall: Overall::PartialFailure,
            message: Some(failing.join("; ")),
            per_table: outcomes,
        }
    }
}
