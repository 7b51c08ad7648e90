use bytes::Bytes;
use warp::http::StatusCode;
use warp::{reject, Rejection, Reply};
use tracing::info;

use crate::auth::{authorize_note, Identity};
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::models::{CreateNoteRequest, UpdateNoteRequest};
use crate::store::SharedStore;

fn invalid_note() -> Rejection {
    reject::custom(ApiError::BadRequest("Title and content are required".to_string()))
}

pub async fn handle_list(
    identity: Identity,
    store: SharedStore,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    metrics.record_note_op("list");
    let notes = store
        .list(&identity.id)
        .await
        .map_err(|e| reject::custom(ApiError::from(e)))?;
    Ok(warp::reply::json(&notes))
}

pub async fn handle_get(
    note_id: String,
    identity: Identity,
    store: SharedStore,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    metrics.record_note_op("get");
    let note = authorize_note(store.as_ref(), &identity, &note_id)
        .await
        .map_err(reject::custom)?;
    Ok(warp::reply::json(&note))
}

pub async fn handle_create(
    identity: Identity,
    body: Bytes,
    store: SharedStore,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    metrics.record_note_op("create");
    let request: CreateNoteRequest = super::parse_json(&body)?;
    if !request.is_valid() {
        return Err(invalid_note());
    }

    let note = store
        .create(&identity.id, &request.title, &request.content)
        .await
        .map_err(|e| reject::custom(ApiError::from(e)))?;
    info!(note_id = %note.id, user_id = %identity.id, "Note created");

    Ok(warp::reply::with_status(warp::reply::json(&note), StatusCode::CREATED))
}

pub async fn handle_update(
    note_id: String,
    identity: Identity,
    body: Bytes,
    store: SharedStore,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    metrics.record_note_op("update");
    let changes: UpdateNoteRequest = super::parse_json(&body)?;
    if !changes.is_valid() {
        return Err(invalid_note());
    }

    let note = store
        .update(&note_id, &identity.id, &changes)
        .await
        .map_err(|e| reject::custom(ApiError::from(e)))?
        .ok_or_else(|| reject::custom(ApiError::note_not_found()))?;

    Ok(warp::reply::json(&note))
}

pub async fn handle_delete(
    note_id: String,
    identity: Identity,
    store: SharedStore,
    metrics: Metrics,
) -> Result<impl Reply, Rejection> {
    metrics.record_note_op("delete");
    let removed = store
        .delete(&note_id, &identity.id)
        .await
        .map_err(|e| reject::custom(ApiError::from(e)))?;

    if !removed {
        return Err(reject::custom(ApiError::note_not_found()));
    }
    info!(note_id = %note_id, user_id = %identity.id, "Note deleted");

    Ok(warp::reply::json(&serde_json::json!({"success": true})))
}
