//! Debate repository

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};
use crate::models::DebateTitle;

/// Status written when a debate is created
pub const STATUS_PENDING: &str = "pending";
/// Status written by [`DebateRepo::complete`]
pub const STATUS_COMPLETED: &str = "completed";

/// Debate record from database
#[derive(Debug, Clone, FromRow)]
pub struct Debate {
    pub debate_id: String,
    pub title: String,
    pub description: Option<String>,
    pub proposition: String,
    /// Name of the `debate_formats` row the debate follows
    pub format: String,
    pub status: String,
    pub moderator_id: String,
    pub time_limit_minutes: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Debate {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Fields for a new debate
#[derive(Debug, Clone)]
pub struct NewDebate {
    pub title: DebateTitle,
    pub description: Option<String>,
    pub proposition: String,
    pub format: String,
    pub moderator_id: String,
    pub time_limit_minutes: Option<i32>,
}

const COLUMNS: &str = "debate_id, title, description, proposition, format, status, moderator_id, \
                       time_limit_minutes, created_at, updated_at, completed_at";

/// Debate repository
pub struct DebateRepo<'a> {
    db: &'a Database,
}

impl<'a> DebateRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a debate in [`STATUS_PENDING`].
    pub async fn create(&self, new: NewDebate) -> Result<Debate, DbError> {
        let mut session = self.db.session().await?;
        let now = Utc::now();
        let debate = sqlx::query_as::<_, Debate>(&format!(
            r#"
            INSERT INTO debates ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(new.title.as_str())
        .bind(new.description.as_deref())
        .bind(&new.proposition)
        .bind(&new.format)
        .bind(STATUS_PENDING)
        .bind(&new.moderator_id)
        .bind(new.time_limit_minutes)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *session)
        .await?;

        tracing::info!(debate_id = %debate.debate_id, format = %debate.format, "Debate created");
        Ok(debate)
    }

    pub async fn get(&self, debate_id: &str) -> Result<Debate, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, Debate>(&format!("SELECT {COLUMNS} FROM debates WHERE debate_id = ?"))
            .bind(debate_id)
            .fetch_optional(&mut *session)
            .await?
            .ok_or_else(|| DbError::not_found("debate", debate_id))
    }

    /// Debates in a status, newest first
    pub async fn list_by_status(&self, status: &str) -> Result<Vec<Debate>, DbError> {
        let mut session = self.db.session().await?;
        let debates = sqlx::query_as::<_, Debate>(&format!(
            "SELECT {COLUMNS} FROM debates WHERE status = ? ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(status)
        .fetch_all(&mut *session)
        .await?;
        Ok(debates)
    }

    pub async fn set_status(&self, debate_id: &str, status: &str) -> Result<Debate, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, Debate>(&format!(
            r#"
            UPDATE debates SET status = ?, updated_at = ?
            WHERE debate_id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(status)
        .bind(Utc::now())
        .bind(debate_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("debate", debate_id))
    }

    /// Mark a debate completed and stamp `completed_at`.
    pub async fn complete(&self, debate_id: &str) -> Result<Debate, DbError> {
        let mut session = self.db.session().await?;
        let now = Utc::now();
        let debate = sqlx::query_as::<_, Debate>(&format!(
            r#"
            UPDATE debates SET status = ?, updated_at = ?, completed_at = ?
            WHERE debate_id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(STATUS_COMPLETED)
        .bind(now)
        .bind(now)
        .bind(debate_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("debate", debate_id))?;

        tracing::info!(debate_id, "Debate completed");
        Ok(debate)
    }
}
