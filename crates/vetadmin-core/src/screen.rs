//! The archive/restore screen controller, minus rendering.
//!
//! One `ArchiveScreen` parameterized by [`RecordScope`] drives both sides of
//! the archive divide: fetch → group → selection → confirm →
//! plan/execute/aggregate → refetch + reset.

use std::sync::Arc;

use thiserror::Error;

use crate::aggregate::aggregate_outcomes;
use crate::executor::execute_plan;
use crate::group::{Group, group_records};
use crate::planner::{BatchPlan, PlanError, plan_batch};
use crate::selection::SelectionStore;
use crate::store::{RecordStore, StoreError};
use crate::{ActionKind, AggregateOutcome, BatchOutcome, BatchStats, RecordScope};

#[derive(Error, Debug)]
pub enum ScreenError {
    /// The selection produced no valid table/id pairs; nothing was sent.
    #[error("no valid records selected")]
    NothingSelected,
    /// The action does not apply to this screen's records (e.g. archiving an
    /// already-archived record).
    #[error("action {action} is not offered on the {} screen", .scope.as_query())]
    ActionNotOffered {
        action: ActionKind,
        scope: RecordScope,
    },
}

/// Everything a confirmed batch run produced, for display and export.
#[derive(Debug, Clone)]
pub struct ConfirmedBatch {
    /// The plan that was executed, snapshotted at confirmation.
    pub plan: BatchPlan,
    pub outcome: AggregateOutcome,
    pub stats: BatchStats,
}

pub struct ArchiveScreen {
    store: Arc<dyn RecordStore>,
    scope: RecordScope,
    groups: Vec<Group>,
    selection: SelectionStore,
}

impl ArchiveScreen {
    pub fn new(store: Arc<dyn RecordStore>, scope: RecordScope) -> Self {
        Self {
            store,
            scope,
            groups: Vec::new(),
            selection: SelectionStore::new(),
        }
    }

    pub fn scope(&self) -> RecordScope {
        self.scope
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn offered_actions(&self) -> &'static [ActionKind] {
        self.scope.offered_actions()
    }

    /// Refetch the working set and reset the selection.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let records = self.store.fetch_grouped(self.scope).await?;
        tracing::info!(
            scope = self.scope.as_query(),
            records = records.len(),
            "refreshed working set"
        );
        self.groups = group_records(records);
        self.selection.clear();
        Ok(())
    }

    pub fn toggle_record(&mut self, table: &str, id: u64) {
        self.selection.toggle_record(table, id);
    }

    /// Toggle a whole group by its table name. Returns false (and changes
    /// nothing) when no such group exists; the group list only changes on
    /// refetch.
    pub fn toggle_group(&mut self, table_name: &str) -> bool {
        match self.groups.iter().find(|g| g.table_name == table_name) {
            Some(group) => {
                self.selection.toggle_group(group);
                true
            }
            None => false,
        }
    }

    pub fn toggle_select_all(&mut self) {
        self.selection.toggle_select_all(&self.groups);
    }

    /// Execute the current selection as `action`.
    ///
    /// The plan is snapshotted from the selection at this moment. Whatever
    /// the aggregate verdict, the screen refetches and the selection resets,
    /// so partially-applied changes are visible immediately. A refetch
    /// failure is logged but does not mask the batch outcome.
    pub async fn confirm(
        &mut self,
        action: ActionKind,
        on_table_complete: Option<&(dyn Fn(&BatchOutcome) + Send + Sync)>,
    ) -> Result<ConfirmedBatch, ScreenError> {
        if !self.scope.offers(action) {
            return Err(ScreenError::ActionNotOffered {
                action,
                scope: self.scope,
            });
        }

        let plan = match plan_batch(self.selection.keys()) {
            Ok(plan) => plan,
            Err(PlanError::EmptyPlan) => return Err(ScreenError::NothingSelected),
        };

        tracing::info!(
            action = %action,
            tables = plan.len(),
            records = plan.values().map(Vec::len).sum::<usize>(),
            "executing batch"
        );

        let outcomes =
            execute_plan(Arc::clone(&self.store), &plan, action, on_table_complete).await;
        let stats = BatchStats::from_run(&plan, &outcomes);
        let outcome = aggregate_outcomes(outcomes);

        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "refetch after batch failed");
            self.selection.clear();
        }

        Ok(ConfirmedBatch {
            plan,
            outcome,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;

    #[tokio::test]
    async fn live_screen_rejects_restore_and_delete() {
        let store = Arc::new(MockStore::new(vec![]));
        let mut screen = ArchiveScreen::new(store, RecordScope::Live);

        for action in [ActionKind::Restore, ActionKind::Delete] {
            let err = screen.confirm(action, None).await.unwrap_err();
            assert!(matches!(err, ScreenError::ActionNotOffered { .. }));
        }
        assert_eq!(screen.offered_actions(), &[ActionKind::Archive]);
    }

    #[tokio::test]
    async fn empty_selection_never_reaches_the_store() {
        let store = Arc::new(MockStore::new(vec![]));
        let mut screen = ArchiveScreen::new(Arc::clone(&store) as Arc<dyn RecordStore>, RecordScope::Archived);

        let err = screen.confirm(ActionKind::Restore, None).await.unwrap_err();
        assert!(matches!(err, ScreenError::NothingSelected));
        assert_eq!(store.mutations().len(), 0);
        assert_eq!(store.fetch_count(), 0);
    }
}
