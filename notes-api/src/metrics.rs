use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use anyhow::Result;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    summarize_requests: IntCounterVec,
    note_requests: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let summarize_requests = IntCounterVec::new(
            Opts::new("summarize_requests_total", "Summarization requests by provider and outcome"),
            &["provider", "outcome"],
        )?;
        let note_requests = IntCounterVec::new(
            Opts::new("notes_requests_total", "Note CRUD requests by operation"),
            &["operation"],
        )?;

        registry.register(Box::new(summarize_requests.clone()))?;
        registry.register(Box::new(note_requests.clone()))?;

        Ok(Self { registry, summarize_requests, note_requests })
    }

    pub fn record_summary(&self, provider: &str, outcome: &str) {
        self.summarize_requests.with_label_values(&[provider, outcome]).inc();
    }

    pub fn record_note_op(&self, operation: &str) {
        self.note_requests.with_label_values(&[operation]).inc();
    }

    pub fn summary_count(&self, provider: &str, outcome: &str) -> u64 {
        self.summarize_requests.with_label_values(&[provider, outcome]).get()
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<(Vec<u8>, String)> {
        let encoder = TextEncoder::new();
        let mut buffer = vec![];
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok((buffer, encoder.format_type().to_string()))
    }
}
