//! Turning a selection into per-table batch mutation requests.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::key::SelectionKey;
use crate::resolver::resolve_table;

/// Snapshot mapping backend table identifier → distinct record ids, built
/// once per confirmed action. Not a live view of the selection.
pub type BatchPlan = BTreeMap<String, Vec<u64>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Nothing valid to act on: the selection was empty or every key was
    /// malformed. Must be surfaced to the user before any network call.
    #[error("no valid records selected")]
    EmptyPlan,
}

/// Build a batch plan from the current selection.
///
/// Each key's table name is resolved to its backend identifier; ids are
/// de-duplicated within a table.
pub fn plan_batch(selected: &BTreeSet<SelectionKey>) -> Result<BatchPlan, PlanError> {
    let mut plan = BatchPlan::new();
    for key in selected {
        let table = resolve_table(&key.table);
        let ids = plan.entry(table.to_string()).or_insert_with(Vec::new);
        if !ids.contains(&key.id) {
            ids.push(key.id);
        }
    }
    if plan.is_empty() {
        return Err(PlanError::EmptyPlan);
    }
    Ok(plan)
}

/// Build a batch plan from string-encoded keys (the serialization boundary,
/// e.g. CLI arguments). Malformed keys are logged and skipped, never fatal;
/// only an entirely empty result aborts.
pub fn plan_from_encoded<'a, I>(keys: I) -> Result<BatchPlan, PlanError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut selected = BTreeSet::new();
    for raw in keys {
        match raw.parse::<SelectionKey>() {
            Ok(key) => {
                selected.insert(key);
            }
            Err(e) => {
                tracing::warn!(key = raw, error = %e, "skipping malformed selection key");
            }
        }
    }
    plan_batch(&selected)
}
