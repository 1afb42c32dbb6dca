//! Client for the hosted table's REST endpoint.
//!
//! Rows live under `{store_url}/rest/v1/{table}` and are addressed with
//! PostgREST query operators (`order=date.asc`, `date=eq.<key>`). Every call
//! is bounded by the configured request timeout.

use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use crate::config::StudyCalConfig;
use crate::entry::DateKey;
use crate::error::{StudyCalError, StudyCalResult};
use crate::remote::{RecordStore, StudyRecord};

const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";
const CONFLICT_COLUMN: &str = "date";

/// Body of an error response from the store.
#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// HTTP client for the `study_records` table.
#[derive(Clone)]
pub struct RestStore {
    http: reqwest::Client,
    table_url: Url,
    api_key: String,
    request_timeout: Duration,
}

impl RestStore {
    pub fn new(
        store_url: &str,
        table: &str,
        api_key: &str,
        request_timeout: Duration,
    ) -> StudyCalResult<Self> {
        Ok(RestStore {
            http: reqwest::Client::new(),
            table_url: table_url(store_url, table)?,
            api_key: api_key.to_string(),
            request_timeout,
        })
    }

    pub fn from_config(config: &StudyCalConfig) -> StudyCalResult<Self> {
        let store_url = config
            .store_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| StudyCalError::Config("store_url is not set".into()))?;
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| StudyCalError::Config("api_key is not set".into()))?;

        Self::new(store_url, &config.table, api_key, config.request_timeout())
    }

    fn select_url(&self) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "date.asc");
        url
    }

    fn upsert_url(&self) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("on_conflict", CONFLICT_COLUMN);
        url
    }

    fn delete_url(&self, date: &DateKey) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("date", &format!("eq.{date}"));
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send a request, failing on timeout or a non-success status.
    async fn send(&self, request: RequestBuilder) -> StudyCalResult<Response> {
        let response = self.with_timeout(self.authorized(request).send()).await??;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = self.with_timeout(response.text()).await??;
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|err| err.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            });

        Err(StudyCalError::Store {
            status: status.as_u16(),
            message,
        })
    }

    async fn with_timeout<F: Future>(&self, fut: F) -> StudyCalResult<F::Output> {
        timeout(self.request_timeout, fut)
            .await
            .map_err(|_| StudyCalError::StoreTimeout(self.request_timeout))
    }
}

impl RecordStore for RestStore {
    async fn select_all_ordered_by_date(&self) -> StudyCalResult<Vec<StudyRecord>> {
        debug!(url = %self.table_url, "fetching study records");

        let response = self.send(self.http.get(self.select_url())).await?;
        let records: Vec<StudyRecord> = self.with_timeout(response.json()).await??;

        debug!(count = records.len(), "fetched study records");
        Ok(records)
    }

    async fn upsert_by_date(&self, record: &StudyRecord) -> StudyCalResult<()> {
        debug!(date = %record.date, "upserting study record");

        let request = self
            .http
            .post(self.upsert_url())
            .header("Prefer", UPSERT_PREFERENCE)
            .json(record);
        self.send(request).await?;
        Ok(())
    }

    async fn delete_by_date(&self, date: &DateKey) -> StudyCalResult<()> {
        debug!(%date, "deleting study record");

        self.send(self.http.delete(self.delete_url(date))).await?;
        Ok(())
    }
}

fn table_url(store_url: &str, table: &str) -> StudyCalResult<Url> {
    let mut url = Url::parse(store_url.trim())
        .map_err(|e| StudyCalError::Config(format!("Invalid store_url '{store_url}': {e}")))?;

    url.path_segments_mut()
        .map_err(|_| StudyCalError::Config(format!("Invalid store_url '{store_url}'")))?
        .pop_if_empty()
        .extend(["rest", "v1", table]);

    Ok(url)
}
