use thiserror::Error;
use warp::http::StatusCode;
use warp::reject::{self, Reject};
use warp::{Reply, Rejection};
use tracing::error;

use crate::models::ErrorBody;

pub const SUMMARY_FAILED_MESSAGE: &str =
    "Failed to generate summary. Please check your API key configuration.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Any provider-side failure; the cause has already been logged.
    #[error("summarization failed")]
    SummarizationFailed,

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Reject for ApiError {}

impl ApiError {
    pub fn note_not_found() -> Self {
        ApiError::NotFound("Note not found".to_string())
    }

    /// Status and caller-visible message. Internal causes never reach the body.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::SummarizationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SUMMARY_FAILED_MESSAGE.to_string(),
            ),
            ApiError::InternalError(_) | ApiError::SerializationError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

/// Maps every rejection to a JSON error body, including warp's own
/// (missing or oversized body, bad header, wrong method, unknown path).
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    let (code, message) = if let Some(api_err) = err.find::<ApiError>() {
        let (code, message) = api_err.status_and_message();
        if code == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %api_err, "Request failed");
        }
        (code, message)
    } else if err.find::<reject::InvalidHeader>().is_some() {
        // Only the authorization header is read as a typed header.
        (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
    } else if err.find::<reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Length required".to_string())
    } else if err.find::<reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else {
        error!(rejection = ?err, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    let json = warp::reply::json(&ErrorBody { error: message });
    Ok(warp::reply::with_status(json, code))
}
