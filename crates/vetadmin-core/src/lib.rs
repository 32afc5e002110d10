use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod aggregate;
pub mod config_file;
pub mod executor;
pub mod group;
pub mod key;
pub mod planner;
pub mod resolver;
pub mod screen;
pub mod selection;
pub mod store;

// Re-export for convenience
pub use aggregate::aggregate_outcomes;
pub use executor::execute_plan;
pub use group::{Group, group_records};
pub use key::{KeyError, SelectionKey};
pub use planner::{BatchPlan, PlanError, plan_batch, plan_from_encoded};
pub use resolver::resolve_table;
pub use screen::{ArchiveScreen, ConfirmedBatch, ScreenError};
pub use selection::SelectionStore;
pub use store::{MutationReply, RecordStore, StoreError};

/// A single row fetched from one of the monitored backend tables.
///
/// Only `id` and `table_name` are meaningful to the engine; everything else
/// the backend sends (names, prices, timestamps) is carried opaquely so the
/// UI layer can render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub table_name: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(table_name: impl Into<String>, id: u64) -> Self {
        Self {
            id,
            table_name: table_name.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// The record's selection key.
    pub fn key(&self) -> SelectionKey {
        SelectionKey::new(self.table_name.clone(), self.id)
    }
}

/// Which batch mutation to apply to the selected records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Archive,
    Restore,
    Delete,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Restore => "restore",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which side of the archive divide a screen shows.
///
/// Live records can only be archived; archived records can be restored or
/// permanently deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    Live,
    Archived,
}

impl RecordScope {
    /// Query-string value understood by the backend.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Archived => "archived",
        }
    }

    /// The actions a screen with this scope offers.
    pub fn offered_actions(&self) -> &'static [ActionKind] {
        match self {
            Self::Live => &[ActionKind::Archive],
            Self::Archived => &[ActionKind::Restore, ActionKind::Delete],
        }
    }

    pub fn offers(&self, action: ActionKind) -> bool {
        self.offered_actions().contains(&action)
    }
}

/// Status of a single per-table mutation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Result of one per-table mutation request within a batch run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub table: String,
    pub status: OutcomeStatus,
    pub message: Option<String>,
    pub elapsed: Option<Duration>,
}

impl BatchOutcome {
    pub fn failed(&self) -> bool {
        self.status == OutcomeStatus::Failure
    }
}

/// Overall verdict for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Overall {
    Success,
    PartialFailure,
}

/// Combined verdict over every per-table outcome of one batch run.
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub overall: Overall,
    /// Joined messages of every failing table; `None` on full success.
    pub message: Option<String>,
    pub per_table: Vec<BatchOutcome>,
}

/// Summary statistics for a completed batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub tables: usize,
    pub records: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchStats {
    /// Derive stats from the executed plan and its outcomes.
    pub fn from_run(plan: &BatchPlan, outcomes: &[BatchOutcome]) -> Self {
        Self {
            tables: plan.len(),
            records: plan.values().map(Vec::len).sum(),
            succeeded: outcomes.iter().filter(|o| !o.failed()).count(),
            failed: outcomes.iter().filter(|o| o.failed()).count(),
        }
    }
}

/// Runtime configuration for the engine.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the clinic backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Per-request timeout for fetch and mutate calls.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
