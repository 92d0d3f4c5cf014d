//! Query execution.
//!
//! The harness talks to the query service only through [`QueryExecutor`]. The
//! HTTP implementation sends one blocking GET per query; [`StaticExecutor`]
//! answers every query with a fixed payload and is used for offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::ACCEPT;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::HarnessConfig;
use crate::diagnostics::{HarnessError, HarnessResult};

const RESULTS_MEDIA_TYPE: &str = "application/sparql-results+json";

/// Sends composed query text to a query service and returns the decoded payload.
pub trait QueryExecutor {
    fn execute(&self, query: &str) -> HarnessResult<Value>;
}

/// Identifies the harness to the endpoint and bounds every request.
fn client_builder(config: &HarnessConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout)
}

/// Blocking HTTP client for a SPARQL endpoint.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    endpoint: String,
}

impl HttpExecutor {
    pub fn new(config: &HarnessConfig) -> HarnessResult<Self> {
        Self::from_builder(client_builder(config), &config.endpoint)
    }

    fn from_builder(builder: ClientBuilder, endpoint: &str) -> HarnessResult<Self> {
        let client = builder.build().map_err(|e| {
            HarnessError::transport(
                endpoint,
                format!("failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryExecutor for HttpExecutor {
    fn execute(&self, query: &str) -> HarnessResult<Value> {
        debug!(endpoint = %self.endpoint, bytes = query.len(), "sending query");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
            .header(ACCEPT, RESULTS_MEDIA_TYPE)
            .send()
            .map_err(|e| {
                HarnessError::transport(
                    &self.endpoint,
                    format!("request failed: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(HarnessError::transport(
                &self.endpoint,
                format!("request failed with status {}: {}", status, body.trim()),
                None,
            ));
        }

        response.json::<Value>().map_err(|e| {
            HarnessError::transport(
                &self.endpoint,
                format!("response is not valid JSON: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

/// Answers every query with the same payload and counts the calls it receives.
#[derive(Debug)]
pub struct StaticExecutor {
    payload: Value,
    calls: AtomicUsize,
}

impl StaticExecutor {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
        }
    }

    /// A well-formed payload with two bindings, for dry runs without a network.
    pub fn sample() -> Self {
        Self::new(json!({
            "head": { "vars": ["a", "b"] },
            "results": { "bindings": [
                { "a": { "type": "literal", "value": "2" }, "b": { "type": "literal", "value": "3" } },
                { "a": { "type": "literal", "value": "2" }, "b": { "type": "literal", "value": "3" } }
            ]}
        }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QueryExecutor for StaticExecutor {
    fn execute(&self, _query: &str) -> HarnessResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}
