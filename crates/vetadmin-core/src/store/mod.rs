//! Remote record store: the backend contract and its implementations.

pub mod http;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use thiserror::Error;

use crate::{ActionKind, Record, RecordScope};

pub use http::HttpStore;
pub use mock::{MockReply, MockStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// What the backend reports for one batch mutation request.
///
/// The backend is the source of truth: `success: false` means the mutation
/// did not happen, whatever the HTTP status said.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// A remote store holding the clinic's records.
pub trait RecordStore: Send + Sync {
    /// Fetch all records across the monitored tables for one side of the
    /// archive divide, each tagged with its `table_name`.
    fn fetch_grouped<'a>(
        &'a self,
        scope: RecordScope,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Record>, StoreError>> + Send + 'a>>;

    /// Archive, restore or permanently delete the given ids in one table.
    fn mutate<'a>(
        &'a self,
        table: &'a str,
        ids: &'a [u64],
        action: ActionKind,
    ) -> Pin<Box<dyn Future<Output = Result<MutationReply, StoreError>> + Send + 'a>>;
}
