// Gemini generateContent adapter. The key travels as a query parameter.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{require_key, SummarizeError, SummaryProvider, FALLBACK_SUMMARY};

const PROVIDER: &str = "Gemini";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

pub struct GeminiSummarizer {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiSummarizer {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Gemini has no system role, so instruction and document share one prompt.
    fn build_prompt(text: &str) -> String {
        format!(
            "Please summarize the following text in 2-3 sentences, highlighting the key points:\n\n{}",
            text
        )
    }

    fn extract_summary(body: &Value) -> String {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_SUMMARY)
            .to_string()
    }
}

#[async_trait]
impl SummaryProvider for GeminiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let api_key = require_key(&self.api_key, PROVIDER)?;

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: Self::build_prompt(text) }],
            }],
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        debug!("Sending request to Gemini: {}", url);

        // Strip the URL from transport errors so the key never reaches the logs.
        let response = self
            .http_client
            .post(url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::ProviderError {
                provider: PROVIDER,
                status: status.to_string(),
            });
        }

        let raw = response.text().await.map_err(reqwest::Error::without_url)?;
        let body: Value = serde_json::from_str(&raw)
            .map_err(|e| SummarizeError::MalformedBody(e.to_string()))?;

        Ok(Self::extract_summary(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_puts_instruction_before_document() {
        let prompt = GeminiSummarizer::build_prompt("The document.");
        assert!(prompt.starts_with("Please summarize the following text in 2-3 sentences"));
        assert!(prompt.ends_with(":\n\nThe document."));
    }

    #[test]
    fn extracts_first_candidate_part() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": "Gist."}]}}]});
        assert_eq!(GeminiSummarizer::extract_summary(&body), "Gist.");
    }

    #[test]
    fn missing_fields_degrade_to_fallback() {
        for body in [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"finishReason": "SAFETY"}]}),
        ] {
            assert_eq!(GeminiSummarizer::extract_summary(&body), FALLBACK_SUMMARY);
        }
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let adapter = GeminiSummarizer::new(reqwest::Client::new(), "http://127.0.0.1:9", "m", Some(String::new()));
        let err = adapter.summarize("text").await.unwrap_err();
        assert!(matches!(err, SummarizeError::ConfigurationMissing("Gemini")));
    }
}
