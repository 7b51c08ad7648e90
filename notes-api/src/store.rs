// Owner-scoped note storage. Every operation takes the owner id and never
// touches another owner's rows.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Note, UpdateNoteRequest};

pub type SharedStore = Arc<dyn NoteStore>;

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Owner's notes, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<Note>>;

    /// `None` when the note does not exist or belongs to someone else.
    async fn get(&self, note_id: &str, user_id: &str) -> Result<Option<Note>>;

    async fn create(&self, user_id: &str, title: &str, content: &str) -> Result<Note>;

    async fn update(
        &self,
        note_id: &str,
        user_id: &str,
        changes: &UpdateNoteRequest,
    ) -> Result<Option<Note>>;

    /// Returns whether a row was removed.
    async fn delete(&self, note_id: &str, user_id: &str) -> Result<bool>;
}

/// Process-local store, used by tests and local runs without Postgres.
#[derive(Default)]
pub struct InMemoryNoteStore {
    notes: RwLock<HashMap<String, Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a note with a caller-chosen id.
    pub async fn insert(&self, note: Note) {
        self.notes.write().await.insert(note.id.clone(), note);
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut owned: Vec<Note> = notes
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn get(&self, note_id: &str, user_id: &str) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes
            .get(note_id)
            .filter(|n| n.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: &str, title: &str, content: &str) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.insert(note.clone()).await;
        Ok(note)
    }

    async fn update(
        &self,
        note_id: &str,
        user_id: &str,
        changes: &UpdateNoteRequest,
    ) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        let Some(note) = notes.get_mut(note_id).filter(|n| n.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            note.title = title.clone();
        }
        if let Some(content) = &changes.content {
            note.content = content.clone();
        }
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete(&self, note_id: &str, user_id: &str) -> Result<bool> {
        let mut notes = self.notes.write().await;
        match notes.get(note_id) {
            Some(n) if n.user_id == user_id => {
                notes.remove(note_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
