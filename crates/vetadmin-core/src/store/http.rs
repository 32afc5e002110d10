//! HTTP implementation of [`RecordStore`] against the clinic backend.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{MutationReply, RecordStore, StoreError};
use crate::{ActionKind, Config, Record, RecordScope};

pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout(),
        }
    }
}

#[derive(Deserialize)]
struct FetchResponse {
    records: Vec<Record>,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    table: &'a str,
    ids: &'a [u64],
    action: ActionKind,
}

impl RecordStore for HttpStore {
    fn fetch_grouped<'a>(
        &'a self,
        scope: RecordScope,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Record>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/api/records?scope={}", self.base_url, scope.as_query());
            let resp = self
                .client
                .get(&url)
                .timeout(self.timeout)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(StoreError::Status(status.as_u16()));
            }

            let parsed: FetchResponse = resp
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            tracing::debug!(scope = scope.as_query(), count = parsed.records.len(), "fetched records");
            Ok(parsed.records)
        })
    }

    fn mutate<'a>(
        &'a self,
        table: &'a str,
        ids: &'a [u64],
        action: ActionKind,
    ) -> Pin<Box<dyn Future<Output = Result<MutationReply, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/api/records/batch", self.base_url);
            let body = BatchRequest { table, ids, action };
            let resp = self
                .client
                .post(&url)
                .json(&body)
                .timeout(self.timeout)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(StoreError::Status(status.as_u16()));
            }

            let reply: MutationReply = resp
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            tracing::debug!(table, action = %action, success = reply.success, "mutation reply");
            Ok(reply)
        })
    }
}
