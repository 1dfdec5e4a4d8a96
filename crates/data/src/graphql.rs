//! Minimal GraphQL-over-HTTP transport.

use crate::IndexerError;
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default request timeout for subgraph queries.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Executes a GraphQL query against one endpoint.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Runs `query` and returns the `data` object of the response.
    async fn query(&self, query: &str, variables: Value) -> Result<Value, IndexerError>;
}

#[derive(Serialize)]
struct GraphQlBody<'a> {
    query: &'a str,
    variables: Value,
}

/// Posts queries to a subgraph endpoint with `reqwest`.
pub struct HttpGraphQl {
    client: reqwest::Client,
    url: String,
}

impl HttpGraphQl {
    /// Creates a transport for `url`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, IndexerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl GraphQlTransport for HttpGraphQl {
    async fn query(&self, query: &str, variables: Value) -> Result<Value, IndexerError> {
        debug!(url = %self.url, "Sending subgraph query");

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&GraphQlBody { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexerError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("decoding subgraph response from {}", self.url))?;
        extract_data(body)
    }
}

/// Pulls `data` out of a GraphQL response, surfacing reported errors.
pub(crate) fn extract_data(mut body: Value) -> Result<Value, IndexerError> {
    if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
        return Err(IndexerError::Query(errors.to_string()));
    }
    match body.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(IndexerError::Shape("missing `data` field".to_string())),
    }
}
