#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use warp::{Filter, Rejection, Reply};

use notes_api::api;
use notes_api::auth::{Claims, JwtVerifier};
use notes_api::metrics::Metrics;
use notes_api::models::Note;
use notes_api::store::InMemoryNoteStore;
use notes_api::summarizer::{SummarizeError, Summarizer, SummaryProvider};

pub const SECRET: &str = "integration-test-secret";

pub fn bearer(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        email: Some(format!("{}@example.com", user_id)),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))
        .expect("token should encode");
    format!("Bearer {}", token)
}

pub fn note(id: &str, owner: &str, content: &str) -> Note {
    let now = Utc::now();
    Note {
        id: id.to_string(),
        user_id: owner.to_string(),
        title: format!("Note {}", id),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Adapter double that records every call it receives.
pub struct CountingProvider {
    reply: Option<String>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl CountingProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    /// Always fails the way a non-2xx provider answer does.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryProvider for CountingProvider {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(SummarizeError::ProviderError {
                provider: "OpenAI",
                status: "401 Unauthorized: invalid_api_key sk-live-123".to_string(),
            }),
        }
    }
}

pub fn app(
    store: Arc<InMemoryNoteStore>,
    summarizer: Summarizer,
    metrics: Metrics,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone + 'static {
    api::service(store, JwtVerifier::new(SECRET), Arc::new(summarizer), metrics)
}

/// Captures formatted log output for assertions.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Installs a thread-local subscriber writing into the returned buffer.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
