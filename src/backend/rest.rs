//! HTTP implementation of the backend.
//!
//! Talks to a PostgREST-compatible service: tables under `/rest/v1/{table}`
//! and procedures under `/rest/v1/rpc/{name}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{instrument, warn};

use super::{Backend, Query};
use crate::config::BackendConfig;
use crate::error::{EngineError, EngineResult};

/// How often and how patiently a request is retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: usize,
    /// Backoff before attempt `n + 1` is `base_backoff_ms * n`.
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 200,
        }
    }
}

/// Backend speaking the PostgREST dialect over HTTP.
///
/// Tables live under `/rest/v1/{table}` and procedures under
/// `/rest/v1/rpc/{name}`. Every request carries the project API key both
/// as `apikey` and as a bearer token.
pub struct RestBackend {
    base_url: String,
    api_key: String,
    client: Client,
    retry: RetryPolicy,
}

impl RestBackend {
    /// Builds a client from `backend.yaml` settings.
    pub fn new(config: &BackendConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| EngineError::backend("client", e))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
            retry: RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                base_backoff_ms: config.backoff_ms,
            },
        })
    }

    /// URL of a table endpoint.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// URL of a procedure endpoint.
    pub fn rpc_url(&self, procedure: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, procedure)
    }

    fn headers(&self) -> EngineResult<HeaderMap> {
        let invalid = |e: reqwest::header::InvalidHeaderValue| {
            EngineError::backend("headers", format!("invalid api key: {}", e))
        };
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("apikey"),
            HeaderValue::from_str(&self.api_key).map_err(invalid)?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(invalid)?,
        );
        headers.insert(
            HeaderName::from_static("prefer"),
            HeaderValue::from_static("return=representation"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Attempts allowed for a method. POST inserts rows and runs procedures,
    /// so a retry after a lost response could apply it twice.
    fn attempts_for(&self, method: &Method) -> usize {
        if *method == Method::POST {
            1
        } else {
            self.retry.max_attempts.max(1)
        }
    }

    /// Sends a request, retrying transport failures and 5xx responses for
    /// idempotent methods.
    ///
    /// A 4xx response fails immediately with the server's message.
    #[instrument(name = "backend_rest_send", skip(self, params, body))]
    async fn send_with_retry(
        &self,
        operation: &str,
        method: Method,
        url: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> EngineResult<Value> {
        let headers = self.headers()?;
        let max_attempts = self.attempts_for(&method);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut request = self
                .client
                .request(method.clone(), url)
                .headers(headers.clone())
                .query(params);
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    return read_body(operation, resp).await;
                }
                Ok(resp) if resp.status().is_client_error() => {
                    let status = resp.status();
                    let text = resp.text().await.unwrap_or_default();
                    return Err(client_error(operation, status, &text));
                }
                Ok(resp) => {
                    if attempt >= max_attempts {
                        return Err(EngineError::backend(
                            operation,
                            format!("request failed status={} after {} attempts", resp.status(), attempt),
                        ));
                    }
                    warn!(operation, status = %resp.status(), attempt, "backend error, retrying");
                }
                Err(e) => {
                    if attempt >= max_attempts {
                        return Err(EngineError::backend(
                            operation,
                            format!("request failed after {} attempts: {}", attempt, e),
                        ));
                    }
                    warn!(operation, error = %e, attempt, "backend unreachable, retrying");
                }
            }
            tokio::time::sleep(Duration::from_millis(
                self.retry.base_backoff_ms.saturating_mul(attempt as u64),
            ))
            .await;
        }
    }
}

async fn read_body(operation: &str, resp: reqwest::Response) -> EngineResult<Value> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| EngineError::backend(operation, format!("read body failed: {}", e)))?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::backend(operation, format!("invalid JSON response: {}", e)))
}

/// PostgREST reports errors as `{"message": ..., "details": ...}`.
fn client_error(operation: &str, status: StatusCode, body: &str) -> EngineError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    EngineError::backend(operation, format!("{} ({})", message, status))
}

fn into_rows(operation: &str, value: Value) -> EngineResult<Vec<Value>> {
    match value {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(EngineError::backend(
            operation,
            format!("expected an array of rows, got {}", other),
        )),
    }
}

#[async_trait]
impl Backend for RestBackend {
    fn backend_tag(&self) -> &'static str {
        "rest"
    }

    async fn select(&self, table: &str, query: &Query) -> EngineResult<Vec<Value>> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query.to_params());
        let value = self
            .send_with_retry(table, Method::GET, &self.table_url(table), &params, None)
            .await?;
        into_rows(table, value)
    }

    async fn insert(&self, table: &str, row: Value) -> EngineResult<Value> {
        let value = self
            .send_with_retry(table, Method::POST, &self.table_url(table), &[], Some(&row))
            .await?;
        into_rows(table, value)?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::backend(table, "insert returned no row"))
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> EngineResult<Vec<Value>> {
        let value = self
            .send_with_retry(
                table,
                Method::PATCH,
                &self.table_url(table),
                &query.to_params(),
                Some(&patch),
            )
            .await?;
        into_rows(table, value)
    }

    async fn delete(&self, table: &str, query: &Query) -> EngineResult<u64> {
        let value = self
            .send_with_retry(table, Method::DELETE, &self.table_url(table), &query.to_params(), None)
            .await?;
        Ok(into_rows(table, value)?.len() as u64)
    }

    async fn rpc(&self, procedure: &str, args: Value) -> EngineResult<Value> {
        self.send_with_retry(procedure, Method::POST, &self.rpc_url(procedure), &[], Some(&args))
            .await
    }
}
