// OpenAI chat completions adapter

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{require_key, SummarizeError, SummaryProvider, FALLBACK_SUMMARY, SUMMARY_INSTRUCTION};

const PROVIDER: &str = "OpenAI";
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

pub struct OpenAiSummarizer {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiSummarizer {
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

    fn system_prompt() -> String {
        format!(
            "You are a helpful assistant that creates concise, informative summaries. {}",
            SUMMARY_INSTRUCTION
        )
    }

    /// First completion's message text, or the fallback when it is absent.
    fn extract_summary(body: &Value) -> String {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_SUMMARY)
            .to_string()
    }
}

#[async_trait]
impl SummaryProvider for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let api_key = require_key(&self.api_key, PROVIDER)?;

        let system_prompt = Self::system_prompt();
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &system_prompt },
                ChatMessage { role: "user", content: text },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("Sending request to OpenAI: {}", url);

        let response = self
            .http_client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::ProviderError {
                provider: PROVIDER,
                status: status.to_string(),
            });
        }

        let raw = response.text().await?;
        let body: Value = serde_json::from_str(&raw)
            .map_err(|e| SummarizeError::MalformedBody(e.to_string()))?;

        Ok(Self::extract_summary(&body))
    }
}
