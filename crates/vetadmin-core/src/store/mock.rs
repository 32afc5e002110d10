//! Mock record store for testing.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{MutationReply, RecordStore, StoreError};
use crate::{ActionKind, Record, RecordScope};

/// A configurable per-table reply for [`MockStore`].
#[derive(Clone, Debug)]
pub enum MockReply {
    /// The backend applied the mutation.
    Applied,
    /// The backend completed the call but reported `success: false`.
    Rejected(String),
    /// The call itself failed (transport-level).
    Transport(String),
}

/// A hand-rolled mock implementing [`RecordStore`] for tests.
///
/// Supports:
/// - Canned fetch results returned on every `fetch_grouped` call.
/// - Per-table mutation replies, with a configurable default.
/// - Optional per-call latency.
/// - Call counting and a log of every mutation received.
pub struct MockStore {
    records: Mutex<Vec<Record>>,
    replies: HashMap<String, MockReply>,
    fallback: MockReply,
    delay: Option<Duration>,
    fetch_calls: AtomicUsize,
    mutations: Mutex<Vec<(String, Vec<u64>, ActionKind)>>,
}

impl MockStore {
    /// Create a mock whose fetches return `records` and whose mutations all
    /// succeed.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            replies: HashMap::new(),
            fallback: MockReply::Applied,
            delay: None,
            fetch_calls: AtomicUsize::new(0),
            mutations: Mutex::new(Vec::new()),
        }
    }

    /// Set the reply for one table's mutation requests.
    pub fn with_reply(mut self, table: &str, reply: MockReply) -> Self {
        self.replies.insert(table.to_string(), reply);
        self
    }

    /// Set simulated network latency per call.
    #[allow(dead_code)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the records returned by subsequent fetches.
    pub fn set_records(&self, records: Vec<Record>) {
        *self.records.lock().unwrap() = records;
    }

    /// How many times `fetch_grouped()` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Every `(table, ids, action)` mutation received, in arrival order.
    pub fn mutations(&self) -> Vec<(String, Vec<u64>, ActionKind)> {
        self.mutations.lock().unwrap().clone()
    }
}

impl RecordStore for MockStore {
    fn fetch_grouped<'a>(
        &'a self,
        _scope: RecordScope,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Record>, StoreError>> + Send + 'a>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap().clone();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            Ok(records)
        })
    }

    fn mutate<'a>(
        &'a self,
        table: &'a str,
        ids: &'a [u64],
        action: ActionKind,
    ) -> Pin<Box<dyn Future<Output = Result<MutationReply, StoreError>> + Send + 'a>> {
        self.mutations
            .lock()
            .unwrap()
            .push((table.to_string(), ids.to_vec(), action));
        let reply = self
            .replies
            .get(table)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match reply {
                MockReply::Applied => Ok(MutationReply {
                    success: true,
                    message: None,
                }),
                MockReply::Rejected(msg) => Ok(MutationReply {
                    success: false,
                    message: Some(msg),
                }),
                MockReply::Transport(msg) => Err(StoreError::Transport(msg)),
            }
        })
    }
}
