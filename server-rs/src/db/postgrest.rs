use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{StoreError, StoreResult, TableStore};

/// PostgREST code for "single object requested, zero rows returned".
const NO_ROWS_CODE: &str = "PGRST116";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Client for the hosted backend's REST table interface.
///
/// One instance is built at startup and shared by every request; the
/// underlying `reqwest::Client` pools connections internally.
#[derive(Clone)]
pub struct PostgrestStore {
    rest_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

impl PostgrestStore {
    pub fn new(url: &str, service_key: &str) -> StoreResult<Self> {
        let rest_url = rest_base(url)?;

        let key = HeaderValue::from_str(service_key)
            .map_err(|_| StoreError::Backend("service key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|_| StoreError::Backend("service key is not a valid header value".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { rest_url, client })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Value> {
        let resp = request
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("backend request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| StoreError::Backend(format!("backend response read failed: {e}")))?;

        if !status.is_success() {
            return Err(error_from_body(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| StoreError::Backend(format!("backend response parse failed: {e}")))
    }
}

/// Normalizes the configured service URL into its `/rest/v1` base.
fn rest_base(url: &str) -> StoreResult<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| StoreError::Backend(format!("invalid backend URL {url:?}: {e}")))?;
    Ok(format!("{}/rest/v1", parsed.as_str().trim_end_matches('/')))
}

fn id_filter(id: Uuid) -> String {
    format!("eq.{id}")
}

fn error_from_body(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) if err.code.as_deref() == Some(NO_ROWS_CODE) => StoreError::NotFound,
        Ok(PostgrestError {
            message: Some(message),
            ..
        }) => StoreError::Backend(message),
        _ if body.trim().is_empty() => StoreError::Backend(format!("backend returned {status}")),
        _ => StoreError::Backend(format!("backend returned {status}: {}", body.trim())),
    }
}

/// Takes the row out of a `return=representation` array.
fn first_row(body: Value) -> Option<Value> {
    match body {
        Value::Array(rows) => rows.into_iter().next(),
        Value::Object(_) => Some(body),
        _ => None,
    }
}

#[async_trait]
impl TableStore for PostgrestStore {
    async fn insert(&self, table: &'static str, row: Value) -> StoreResult<Value> {
        let body = self
            .send(
                self.client
                    .post(self.table_url(table))
                    .header("Prefer", RETURN_REPRESENTATION)
                    .json(&row),
            )
            .await?;
        first_row(body).ok_or_else(|| StoreError::Backend("insert returned no rows".into()))
    }

    async fn select_all(&self, table: &'static str) -> StoreResult<Vec<Value>> {
        let body = self
            .send(
                self.client
                    .get(self.table_url(table))
                    .query(&[("select", "*")]),
            )
            .await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(StoreError::Backend(format!(
                "expected a list of rows, got {other}"
            ))),
        }
    }

    async fn select_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<Value> {
        self.send(
            self.client
                .get(self.table_url(table))
                .header(ACCEPT, SINGLE_OBJECT)
                .query(&[("select", "*".to_string()), ("id", id_filter(id))]),
        )
        .await
    }

    async fn update_by_id(&self, table: &'static str, id: Uuid, row: Value) -> StoreResult<Value> {
        let body = self
            .send(
                self.client
                    .patch(self.table_url(table))
                    .header("Prefer", RETURN_REPRESENTATION)
                    .query(&[("id", id_filter(id))])
                    .json(&row),
            )
            .await?;
        first_row(body).ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, table: &'static str, id: Uuid) -> StoreResult<()> {
        let body = self
            .send(
                self.client
                    .delete(self.table_url(table))
                    .header("Prefer", RETURN_REPRESENTATION)
                    .query(&[("id", id_filter(id))]),
            )
            .await?;
        first_row(body).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn health_check(&self) -> bool {
        match self.client.get(format!("{}/", self.rest_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!("Backend health check failed: {e}");
                false
            }
        }
    }
}
