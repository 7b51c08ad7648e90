use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use warp::{Filter, Rejection, Reply};

use crate::auth::{with_identity, JwtVerifier};
use crate::error::{handle_rejection, ApiError};
use crate::metrics::Metrics;
use crate::middleware;
use crate::store::SharedStore;
use crate::summarizer::Summarizer;

mod notes;
mod summarize;

const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Everything the server answers: API routes, health, metrics, error mapping,
/// request logging and CORS.
pub fn service(
    store: SharedStore,
    verifier: JwtVerifier,
    summarizer: Arc<Summarizer>,
    metrics: Metrics,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    // Health check route
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    // Metrics route
    let metrics_route = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_metrics(metrics.clone()))
        .and_then(|metrics: Metrics| async move {
            let (buffer, content_type) = metrics
                .render()
                .map_err(|e| warp::reject::custom(ApiError::from(e)))?;
            Ok::<_, Rejection>(warp::reply::with_header(buffer, "Content-Type", content_type))
        });

    health
        .or(metrics_route)
        .or(routes(store, verifier, summarizer, metrics))
        .recover(handle_rejection)
        .with(warp::log("api"))
        .with(middleware::cors())
}

pub fn routes(
    store: SharedStore,
    verifier: JwtVerifier,
    summarizer: Arc<Summarizer>,
    metrics: Metrics,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api = warp::path("api").and(warp::path("v1"));
    let notes_collection = api.and(warp::path("notes")).and(warp::path::end());
    let note_item = api
        .and(warp::path("notes"))
        .and(warp::path::param::<String>())
        .and(warp::path::end());

    // Identity is resolved before the body is read.
    let summarize_route = api
        .and(warp::path("summarize"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_identity(verifier.clone()))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_store(store.clone()))
        .and(with_summarizer(summarizer))
        .and(with_metrics(metrics.clone()))
        .and_then(summarize::handle_summarize);

    let list_route = notes_collection
        .and(warp::get())
        .and(with_identity(verifier.clone()))
        .and(with_store(store.clone()))
        .and(with_metrics(metrics.clone()))
        .and_then(notes::handle_list);

    let create_route = notes_collection
        .and(warp::post())
        .and(with_identity(verifier.clone()))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_store(store.clone()))
        .and(with_metrics(metrics.clone()))
        .and_then(notes::handle_create);

    let get_route = note_item
        .and(warp::get())
        .and(with_identity(verifier.clone()))
        .and(with_store(store.clone()))
        .and(with_metrics(metrics.clone()))
        .and_then(notes::handle_get);

    let update_route = note_item
        .and(warp::put())
        .and(with_identity(verifier.clone()))
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_store(store.clone()))
        .and(with_metrics(metrics.clone()))
        .and_then(notes::handle_update);

    let delete_route = note_item
        .and(warp::delete())
        .and(with_identity(verifier))
        .and(with_store(store))
        .and(with_metrics(metrics))
        .and_then(notes::handle_delete);

    summarize_route
        .or(list_route)
        .or(create_route)
        .or(get_route)
        .or(update_route)
        .or(delete_route)
}

fn with_store(
    store: SharedStore,
) -> impl Filter<Extract = (SharedStore,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_summarizer(
    summarizer: Arc<Summarizer>,
) -> impl Filter<Extract = (Arc<Summarizer>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || summarizer.clone())
}

fn with_metrics(
    metrics: Metrics,
) -> impl Filter<Extract = (Metrics,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || metrics.clone())
}

/// Decodes a JSON body. Undecodable bodies are internal errors, not 400s.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, Rejection> {
    serde_json::from_slice(body).map_err(|e| warp::reject::custom(ApiError::from(e)))
}
