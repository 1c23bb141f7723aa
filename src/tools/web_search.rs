//! Web search tool backed by the Serper API

use crate::tools::{Tool, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Serper search endpoint
pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

/// Environment variable holding the Serper API key
pub const SERPER_API_KEY_VAR: &str = "SERPER_API_KEY";

/// Environment variable overriding how many results a search keeps
pub const SERPER_MAX_RESULTS_VAR: &str = "SERPER_MAX_RESULTS";

/// Results kept per search unless overridden
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Parse a result limit; blank, zero and non-numeric values are ignored
pub fn parse_max_results(value: Option<&str>) -> Option<usize> {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// Web search tool using the Serper API
pub struct WebSearchTool {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: SERPER_ENDPOINT.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Read the key from `SERPER_API_KEY`; a missing key is reported at call time
    pub fn from_env() -> Self {
        Self::new(std::env::var(SERPER_API_KEY_VAR).ok())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    fn build_payload(query: &str, num_results: usize) -> Value {
        json!({ "q": query, "num": num_results })
    }

    /// Format organic results as numbered blocks (pure function)
    fn format_results(query: &str, response: &Value, max_results: usize) -> String {
        let organic = response
            .get("organic")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if organic.is_empty() {
            return format!("No results found for '{}'.", query);
        }

        let blocks: Vec<String> = organic
            .iter()
            .take(max_results)
            .enumerate()
            .map(|(i, result)| {
                let field = |key: &str, fallback: &str| {
                    result
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or(fallback)
                        .to_string()
                };
                [
                    format!("Result {}:", i + 1),
                    format!("Title: {}", field("title", "No title")),
                    format!("Link: {}", field("link", "No link")),
                    format!("Snippet: {}", field("snippet", "No snippet")),
                    "-----------------".to_string(),
                ]
                .join("\n")
            })
            .collect();

        format!("Search results for '{}':\n\n{}", query, blocks.join("\n"))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the internet. Input: the search query."
    }

    async fn execute(&self, input: &str) -> Result<String, ToolError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidInput("search query is empty".to_string()));
        }
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ToolError::NotConfigured(format!("{} is not set", SERPER_API_KEY_VAR)))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(&Self::build_payload(query, self.max_results))
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Request(format!(
                "Serper API error ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ToolError::InvalidResponse(e.to_string()))?;

        Ok(Self::format_results(query, &body, self.max_results))
    }
}
