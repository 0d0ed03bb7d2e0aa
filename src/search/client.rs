// client.rs
use crate::search::models::{SearchRequest, SearchResponse};
use crate::search::SearchError;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Anything that can turn a query string into raw listing entries.
pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Value>, SearchError>;
}

pub struct SerperClient {
    client: Client,
    api_key: String,
    endpoint: String,
    country: Option<String>,
    language: Option<String>,
}

impl SerperClient {
    pub fn new(
        api_key: String,
        endpoint: String,
        country: Option<String>,
        language: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        if api_key.trim().is_empty() {
            return Err(SearchError::Config("SERPER_API_KEY is empty".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            country,
            language,
        })
    }
}

impl SearchProvider for SerperClient {
    fn search(&self, query: &str) -> Result<Vec<Value>, SearchError> {
        let start = std::time::Instant::now();

        let body = SearchRequest {
            q: query,
            gl: self.country.as_deref(),
            hl: self.language.as_deref(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: Value =
            serde_json::from_str(&text).map_err(|e| SearchError::JsonParse(e.to_string()))?;
        let results = organic_results(json);

        tracing::debug!(
            query,
            results = results.len(),
            elapsed = ?start.elapsed(),
            "search completed"
        );

        Ok(results)
    }
}

/// Pulls the `organic` result list out of a search response.
pub fn organic_results(response: Value) -> Vec<Value> {
    serde_json::from_value::<SearchResponse>(response)
        .map(|r| r.organic)
        .unwrap_or_default()
}
