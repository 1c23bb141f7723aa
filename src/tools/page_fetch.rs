//! Page fetch tool

use crate::tools::{Tool, ToolError};
use async_trait::async_trait;
use std::time::Duration;

/// Characters of page content included in the report
pub const PREVIEW_CHARS: usize = 2000;

/// Encoding reported when the response declares no charset
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Charset parameter of a `Content-Type` value, lowercased
fn declared_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_ascii_lowercase())
        .filter(|value| !value.is_empty())
}

/// Fetches a URL and reports status, encoding, size and the start of the body
pub struct PageFetchTool {
    client: reqwest::Client,
}

impl PageFetchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    fn report(url: &str, status: u16, encoding: &str, body: &str) -> String {
        let preview: String = body.chars().take(PREVIEW_CHARS).collect();
        format!(
            "Page analysis: {url}\n\nStatus: {status}\nEncoding: {encoding}\nContent size: {} characters\n\nContent start:\n{preview}...",
            body.chars().count()
        )
    }
}

impl Default for PageFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for PageFetchTool {
    fn name(&self) -> &str {
        "fetch_page"
    }

    fn description(&self) -> &str {
        "Fetch a web page. Input: the page URL."
    }

    async fn execute(&self, input: &str) -> Result<String, ToolError> {
        let url = input.trim().trim_matches('"');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ToolError::InvalidInput(format!("not an http(s) URL: {}", url)));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Request(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Request(format!("{} returned {}", url, status)));
        }

        let encoding = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(declared_charset)
            .unwrap_or_else(|| DEFAULT_ENCODING.to_string());

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::InvalidResponse(e.to_string()))?;

        Ok(Self::report(url, status.as_u16(), &encoding, &body))
    }
}
