//! User repository
//!
//! Humans and model-backed agents share the table; `is_llm` tells them apart
//! and `llm_config_id` points model-backed users at their configuration.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};
use crate::models::{Email, Username};

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: Option<String>,
    pub is_llm: bool,
    pub llm_config_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Option<Email>,
    pub is_llm: bool,
    pub llm_config_id: Option<String>,
}

impl NewUser {
    pub fn human(username: Username, email: Email) -> Self {
        Self {
            username,
            email: Some(email),
            is_llm: false,
            llm_config_id: None,
        }
    }

    pub fn agent(username: Username, llm_config_id: impl Into<String>) -> Self {
        Self {
            username,
            email: None,
            is_llm: true,
            llm_config_id: Some(llm_config_id.into()),
        }
    }
}

const COLUMNS: &str = "user_id, username, email, is_llm, llm_config_id, created_at, updated_at";

/// User repository
pub struct UserRepo<'a> {
    db: &'a Database,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a user. Duplicate email is a unique violation.
    pub async fn create(&self, new: NewUser) -> Result<User, DbError> {
        let mut session = self.db.session().await?;
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(new.username.as_str())
        .bind(new.email.as_ref().map(Email::as_str))
        .bind(new.is_llm)
        .bind(new.llm_config_id.as_deref())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(user_id = %user.user_id, is_llm = user.is_llm, "User created");
        Ok(user)
    }

    pub async fn get(&self, user_id: &str) -> Result<User, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE user_id = ?"))
            .bind(user_id)
            .fetch_optional(&mut *session)
            .await?
            .ok_or_else(|| DbError::not_found("user", user_id))
    }

    /// Lookup by address, normalized the same way `Email` stores it
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let mut session = self.db.session().await?;
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
                .bind(email.trim().to_lowercase())
                .fetch_optional(&mut *session)
                .await?;
        Ok(user)
    }

    /// Users backed by a given LLM configuration
    pub async fn list_for_config(&self, config_id: &str) -> Result<Vec<User>, DbError> {
        let mut session = self.db.session().await?;
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE llm_config_id = ? ORDER BY created_at, rowid"
        ))
        .bind(config_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(users)
    }

    pub async fn rename(&self, user_id: &str, username: Username) -> Result<User, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET username = ?, updated_at = ?
            WHERE user_id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(username.as_str())
        .bind(Utc::now())
        .bind(user_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("user", user_id))
    }

    /// Point a user at a configuration, or detach it with `None`.
    pub async fn assign_config(
        &self,
        user_id: &str,
        llm_config_id: Option<&str>,
    ) -> Result<User, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET llm_config_id = ?, updated_at = ?
            WHERE user_id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(llm_config_id)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("user", user_id))
    }
}
