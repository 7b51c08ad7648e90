use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Identifier the client sends for a note that has not been saved yet.
pub const UNSAVED_NOTE_ID: &str = "temp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// API Request/Response models
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CreateNoteRequest {
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNoteRequest {
    /// Fields that are present must not be blank.
    pub fn is_valid(&self) -> bool {
        let non_blank = |field: &Option<String>| {
            field.as_deref().map_or(true, |s| !s.trim().is_empty())
        };
        non_blank(&self.title) && non_blank(&self.content)
    }
}

/// Body of a summarize call. Both fields are kept loose so that a wrong JSON
/// type is handled by the endpoint rules instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    #[serde(rename = "noteId", default)]
    pub note_id: Option<serde_json::Value>,
    #[serde(default)]
    pub provider: Option<serde_json::Value>,
}

impl SummarizeRequest {
    pub fn note_id(&self) -> Option<&str> {
        self.note_id
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_ref().and_then(|v| v.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
