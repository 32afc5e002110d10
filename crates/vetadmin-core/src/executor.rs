//! Concurrent dispatch of the planned per-table mutation requests.

use std::sync::Arc;
use std::time::Instant;

use crate::planner::BatchPlan;
use crate::store::RecordStore;
use crate::{ActionKind, BatchOutcome, OutcomeStatus};

/// Issue one mutation request per table in the plan, all dispatched
/// concurrently and independently.
///
/// There is no ordering or atomicity guarantee across tables, no cancellation
/// and no retry: every dispatched request runs to completion, and a failed
/// table never aborts its siblings. A table whose id list is empty is
/// short-circuited to a local `Failure` outcome without a network call.
///
/// If `on_table_complete` is provided, it is called for each table as its
/// outcome lands. The returned outcomes are sorted by table name; completion
/// order is not meaningful.
pub async fn execute_plan(
    store: Arc<dyn RecordStore>,
    plan: &BatchPlan,
    action: ActionKind,
    on_table_complete: Option<&(dyn Fn(&BatchOutcome) + Send + Sync)>,
) -> Vec<BatchOutcome> {
    let mut join_set = tokio::task::JoinSet::new();
    let mut outcomes: Vec<BatchOutcome> = Vec::with_capacity(plan.len());

    for (table, ids) in plan {
        if ids.is_empty() {
            let outcome = BatchOutcome {
                table: table.clone(),
                status: OutcomeStatus::Failure,
                message: Some("no ids to mutate".into()),
                elapsed: None,
            };
            tracing::warn!(table, "empty id list in plan, not dispatching");
            if let Some(cb) = on_table_complete {
                cb(&outcome);
            }
            outcomes.push(outcome);
            continue;
        }

        let store = Arc::clone(&store);
        let table = table.clone();
        let ids = ids.clone();
        join_set.spawn(async move {
            let start = Instant::now();
            let result = store.mutate(&table, &ids, action).await;
            (table, result, start.elapsed())
        });
    }

    while let Some(joined) = join_set.join_next().await {
        let (table, result, elapsed) = match joined {
            Ok(r) => r,
            Err(_) => continue,
        };

        let outcome = match result {
            Ok(reply) if reply.success => {
                tracing::debug!(table, action = %action, ?elapsed, "table mutated");
                BatchOutcome {
                    table,
                    status: OutcomeStatus::Success,
                    message: None,
                    elapsed: Some(elapsed),
                }
            }
            Ok(reply) => {
                let message = reply
                    .message
                    .unwrap_or_else(|| "rejected by backend".into());
                tracing::warn!(table, %message, "backend rejected mutation");
                BatchOutcome {
                    table,
                    status: OutcomeStatus::Failure,
                    message: Some(message),
                    elapsed: Some(elapsed),
                }
            }
            Err(e) => {
                tracing::warn!(table, error = %e, "mutation request failed");
                BatchOutcome {
                    table,
                    status: OutcomeStatus::Failure,
                    message: Some(e.to_string()),
                    elapsed: Some(elapsed),
                }
            }
        };

        if let Some(cb) = on_table_complete {
            cb(&outcome);
        }
        outcomes.push(outcome);
    }

    outcomes.sort_by(|a, b| a.table.cmp(&b.table));
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockReply, MockStore};

    fn plan(entries: &[(&str, &[u64])]) -> BatchPlan {
        entries
            .iter()
            .map(|(t, ids)| (t.to_string(), ids.to_vec()))
            .collect()
    }

    #[tokio::test]
    async fn every_table_gets_one_request() {
        let store = Arc::new(MockStore::new(vec![]));
        let plan = plan(&[("brands", &[1, 2]), ("categories", &[5])]);

        let outcomes = execute_plan(store.clone(), &plan, ActionKind::Archive, None).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.failed()));

        let mut mutations = store.mutations();
        mutations.sort();
        assert_eq!(
            mutations,
            vec![
                ("brands".to_string(), vec![1, 2], ActionKind::Archive),
                ("categories".to_string(), vec![5], ActionKind::Archive),
            ]
        );
    }

    #[tokio::test]
    async fn failure_is_local_to_its_table() {
        let store = Arc::new(
            MockStore::new(vec![])
                .with_reply("categories", MockReply::Rejected("locked".into())),
        );
        let plan = plan(&[("brands", &[1]), ("categories", &[5])]);

        let outcomes = execute_plan(store, &plan, ActionKind::Delete, None).await;

        let brands = outcomes.iter().find(|o| o.table == "brands").unwrap();
        let categories = outcomes.iter().find(|o| o.table == "categories").unwrap();
        assert!(!brands.failed());
        assert!(categories.failed());
        assert_eq!(categories.message.as_deref(), Some("locked"));
    }

    #[tokio::test]
    async fn transport_error_becomes_failure_outcome() {
        let store = Arc::new(
            MockStore::new(vec![])
                .with_reply("brands", MockReply::Transport("connection refused".into())),
        );
        let plan = plan(&[("brands", &[1])]);

        let outcomes = execute_plan(store, &plan, ActionKind::Restore, None).await;

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].failed());
        assert!(
            outcomes[0]
                .message
                .as_deref()
                .unwrap()
                .contains("connection refused")
        );
    }

    #[tokio::test]
    async fn empty_id_list_short_circuits_without_network() {
        let store = Arc::new(MockStore::new(vec![]));
        let plan = plan(&[("brands", &[]), ("categories", &[5])]);

        let outcomes = execute_plan(store.clone(), &plan, ActionKind::Archive, None).await;

        let brands = outcomes.iter().find(|o| o.table == "brands").unwrap();
        assert!(brands.failed());
        assert!(brands.elapsed.is_none());
        // Only categories actually reached the store.
        assert_eq!(store.mutations().len(), 1);
    }

    #[tokio::test]
    async fn callback_observes_every_outcome() {
        use std::sync::Mutex;

        let store = Arc::new(MockStore::new(vec![]));
        let plan = plan(&[("brands", &[1]), ("categories", &[2]), ("products", &[3])]);

        let seen: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let on_complete = |o: &BatchOutcome| {
            seen.lock().unwrap().push(o.table.clone());
        };

        let outcomes =
            execute_plan(store, &plan, ActionKind::Archive, Some(&on_complete)).await;

        assert_eq!(outcomes.len(), 3);
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec!["brands", "categories", "products"]);
    }
}
