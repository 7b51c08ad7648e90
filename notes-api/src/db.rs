use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Note, UpdateNoteRequest};
use crate::store::NoteStore;

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed notes. Every statement filters on `user_id`.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: DbPool,
}

impl PgNoteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list(&self, user_id: &str) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, content, created_at, updated_at
             FROM notes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn get(&self, note_id: &str, user_id: &str) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, user_id, title, content, created_at, updated_at
             FROM notes WHERE id = $1 AND user_id = $2",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn create(&self, user_id: &str, title: &str, content: &str) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (id, user_id, title, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, NOW(), NOW())
             RETURNING id, user_id, title, content, created_at, updated_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(note)
    }

    async fn update(
        &self,
        note_id: &str,
        user_id: &str,
        changes: &UpdateNoteRequest,
    ) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            "UPDATE notes
             SET title = COALESCE($3, title), content = COALESCE($4, content), updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING id, user_id, title, content, created_at, updated_at",
        )
        .bind(note_id)
        .bind(user_id)
        .bind(changes.title.as_deref())
        .bind(changes.content.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(note)
    }

    async fn delete(&self, note_id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
