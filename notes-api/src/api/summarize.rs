use std::sync::Arc;

use bytes::Bytes;
use tracing::info;
use warp::{reject, Rejection, Reply};

use crate::auth::{authorize_note, Identity};
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::models::{SummarizeRequest, SummarizeResponse};
use crate::store::SharedStore;
use crate::summarizer::{Provider, Summarizer};

pub async fn handle_summarize(
    identity: Identity,
    body: Bytes,
    store: SharedStore,
    summarizer: Arc<Summarizer>,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    let request: SummarizeRequest = super::parse_json(&body)?;

    let note_id = request
        .note_id()
        .ok_or_else(|| reject::custom(ApiError::BadRequest("Note ID is required".to_string())))?;

    // Ownership is settled before any provider is contacted.
    let note = authorize_note(store.as_ref(), &identity, note_id)
        .await
        .map_err(reject::custom)?;

    let provider = Provider::from_selector(request.provider());
    info!(note_id = %note.id, provider = provider.as_str(), "Summarizing note");

    match summarizer.summarize(provider, &note.content).await {
        Ok(summary) => {
            metrics.record_summary(provider.as_str(), "ok");
            Ok(warp::reply::json(&SummarizeResponse { summary }))
        }
        Err(e) => {
            metrics.record_summary(provider.as_str(), "failed");
            Err(reject::custom(e))
        }
    }
}
