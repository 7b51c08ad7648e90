// Summarizer: picks a provider adapter, calls it once, and folds every
// adapter failure into one caller-visible error.

pub mod gemini;
pub mod openai;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::ApiError;

pub use gemini::GeminiSummarizer;
pub use openai::OpenAiSummarizer;

/// Returned when a provider answers successfully but without summary text.
pub const FALLBACK_SUMMARY: &str = "Unable to generate summary";

pub const SUMMARY_INSTRUCTION: &str =
    "Summarize the following text in 2-3 sentences, highlighting the key points:";

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("{0} API key not configured")]
    ConfigurationMissing(&'static str),

    #[error("{provider} API error: {status}")]
    ProviderError {
        provider: &'static str,
        status: String,
    },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    pub const DEFAULT: Provider = Provider::OpenAi;

    /// Exact `"gemini"` picks Gemini; anything else, including unknown
    /// names, falls back to the default.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("gemini") => Provider::Gemini,
            _ => Provider::DEFAULT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }
}

/// One third-party text generation API.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;
}

#[derive(Clone, Default)]
pub struct Summarizer {
    providers: HashMap<Provider, Arc<dyn SummaryProvider>>,
}

impl Summarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, provider: Provider, adapter: Arc<dyn SummaryProvider>) -> Self {
        self.providers.insert(provider, adapter);
        self
    }

    /// Wires every known provider from configuration.
    pub fn from_config(config: &Config) -> Self {
        let http = reqwest::Client::new();

        Self::new()
            .register(
                Provider::OpenAi,
                Arc::new(OpenAiSummarizer::new(
                    http.clone(),
                    config.openai_base_url.clone(),
                    config.openai_model.clone(),
                    config.openai_api_key.clone(),
                )),
            )
            .register(
                Provider::Gemini,
                Arc::new(GeminiSummarizer::new(
                    http,
                    config.gemini_base_url.clone(),
                    config.gemini_model.clone(),
                    config.gemini_api_key.clone(),
                )),
            )
    }

    pub async fn summarize(&self, provider: Provider, text: &str) -> Result<String, ApiError> {
        let Some(adapter) = self.providers.get(&provider) else {
            error!(provider = provider.as_str(), "No adapter registered for provider");
            return Err(ApiError::SummarizationFailed);
        };

        info!(provider = provider.as_str(), bytes = text.len(), "Requesting summary");

        match adapter.summarize(text).await {
            Ok(summary) => Ok(summary),
            Err(e @ SummarizeError::ConfigurationMissing(_)) => {
                warn!(provider = provider.as_str(), "Summarization skipped: {}", e);
                Err(ApiError::SummarizationFailed)
            }
            Err(e) => {
                error!(provider = provider.as_str(), error = %e, "AI summarization error");
                Err(ApiError::SummarizationFailed)
            }
        }
    }
}

/// Treats a blank key the same as an absent one.
pub(crate) fn require_key<'a>(
    key: &'a Option<String>,
    provider: &'static str,
) -> Result<&'a str, SummarizeError> {
    key.as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(SummarizeError::ConfigurationMissing(provider))
}
