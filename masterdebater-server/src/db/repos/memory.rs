//! Participant memory repository
//!
//! Key/value notes a participant keeps during one debate. A key is unique
//! per (participant, debate).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};
use crate::models::MemoryKey;

/// Memory entry from database
#[derive(Debug, Clone, FromRow)]
pub struct MemoryEntry {
    pub memory_id: String,
    pub participant_id: String,
    pub debate_id: String,
    pub memory_key: String,
    pub memory_value: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

const COLUMNS: &str =
    "memory_id, participant_id, debate_id, memory_key, memory_value, created_at, updated_at";

/// Participant memory repository
pub struct MemoryRepo<'a> {
    db: &'a Database,
}

impl<'a> MemoryRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a new key. An existing key is a unique violation.
    pub async fn insert(
        &self,
        participant_id: &str,
        debate_id: &str,
        key: &MemoryKey,
        value: &str,
    ) -> Result<MemoryEntry, DbError> {
        let mut session = self.db.session().await?;
        let now = Utc::now();
        let entry = sqlx::query_as::<_, MemoryEntry>(&format!(
            "INSERT INTO llm_memory ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(participant_id)
        .bind(debate_id)
        .bind(key.as_str())
        .bind(value)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *session)
        .await?;
        Ok(entry)
    }

    /// Insert or overwrite a key, keeping the existing id and `created_at`.
    pub async fn upsert(
        &self,
        participant_id: &str,
        debate_id: &str,
        key: &MemoryKey,
        value: &str,
    ) -> Result<MemoryEntry, DbError> {
        let mut session = self.db.session().await?;
        let now = Utc::now();
        let entry = sqlx::query_as::<_, MemoryEntry>(&format!(
            r#"
            INSERT INTO llm_memory ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (participant_id, debate_id, memory_key)
            DO UPDATE SET memory_value = excluded.memory_value, updated_at = excluded.updated_at
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(participant_id)
        .bind(debate_id)
        .bind(key.as_str())
        .bind(value)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *session)
        .await?;

        tracing::trace!(participant_id, key = key.as_str(), "Memory written");
        Ok(entry)
    }

    pub async fn get(
        &self,
        participant_id: &str,
        debate_id: &str,
        key: &MemoryKey,
    ) -> Result<Option<MemoryEntry>, DbError> {
        let mut session = self.db.session().await?;
        let entry = sqlx::query_as::<_, MemoryEntry>(&format!(
            r#"
            SELECT {COLUMNS} FROM llm_memory
            WHERE participant_id = ? AND debate_id = ? AND memory_key = ?
            "#
        ))
        .bind(participant_id)
        .bind(debate_id)
        .bind(key.as_str())
        .fetch_optional(&mut *session)
        .await?;
        Ok(entry)
    }

    /// Every key a participant holds in a debate, by key
    pub async fn list(
        &self,
        participant_id: &str,
        debate_id: &str,
    ) -> Result<Vec<MemoryEntry>, DbError> {
        let mut session = self.db.session().await?;
        let entries = sqlx::query_as::<_, MemoryEntry>(&format!(
            r#"
            SELECT {COLUMNS} FROM llm_memory
            WHERE participant_id = ? AND debate_id = ?
            ORDER BY memory_key
            "#
        ))
        .bind(participant_id)
        .bind(debate_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(entries)
    }

    /// Returns whether a row was removed
    pub async fn delete(
        &self,
        participant_id: &str,
        debate_id: &str,
        key: &MemoryKey,
    ) -> Result<bool, DbError> {
        let mut session = self.db.session().await?;
        let result = sqlx::query(
            "DELETE FROM llm_memory WHERE participant_id = ? AND debate_id = ? AND memory_key = ?",
        )
        .bind(participant_id)
        .bind(debate_id)
        .bind(key.as_str())
        .execute(&mut *session)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
