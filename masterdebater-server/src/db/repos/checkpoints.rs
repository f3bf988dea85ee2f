//! Checkpoint repository

use chrono::{DateTime, Utc};
use masterdebater_core::{CheckpointData, JsonColumn};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};

/// Checkpoint record from database
#[derive(Debug, Clone, FromRow)]
pub struct Checkpoint {
    pub checkpoint_id: String,
    pub debate_id: String,
    pub last_turn_id: String,
    pub checkpoint_data: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Checkpoint {
    /// Decoded payload. Fails on an envelope newer than this build understands.
    pub fn data(&self) -> Result<CheckpointData, DbError> {
        Ok(CheckpointData::from_column(&self.checkpoint_data)?)
    }
}

const COLUMNS: &str = "checkpoint_id, debate_id, last_turn_id, checkpoint_data, created_at";

/// Checkpoint repository
pub struct CheckpointRepo<'a> {
    db: &'a Database,
}

impl<'a> CheckpointRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        debate_id: &str,
        last_turn_id: &str,
        data: &CheckpointData,
    ) -> Result<Checkpoint, DbError> {
        let mut session = self.db.session().await?;
        let checkpoint = sqlx::query_as::<_, Checkpoint>(&format!(
            "INSERT INTO debate_checkpoints ({COLUMNS}) VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(debate_id)
        .bind(last_turn_id)
        .bind(data.to_column()?)
        .bind(Utc::now())
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(
            debate_id,
            last_turn_id,
            phase = %data.current_phase,
            "Checkpoint saved"
        );
        Ok(checkpoint)
    }

    /// Most recent checkpoint of a debate, if any
    pub async fn latest_for_debate(&self, debate_id: &str) -> Result<Option<Checkpoint>, DbError> {
        let mut session = self.db.session().await?;
        let checkpoint = sqlx::query_as::<_, Checkpoint>(&format!(
            r#"
            SELECT {COLUMNS} FROM debate_checkpoints
            WHERE debate_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#
        ))
        .bind(debate_id)
        .fetch_optional(&mut *session)
        .await?;
        Ok(checkpoint)
    }

    pub async fn list_for_debate(&self, debate_id: &str) -> Result<Vec<Checkpoint>, DbError> {
        let mut session = self.db.session().await?;
        let checkpoints = sqlx::query_as::<_, Checkpoint>(&format!(
            "SELECT {COLUMNS} FROM debate_checkpoints \
             WHERE debate_id = ? ORDER BY created_at, rowid"
        ))
        .bind(debate_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(checkpoints)
    }
}
