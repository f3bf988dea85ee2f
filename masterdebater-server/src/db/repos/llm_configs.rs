//! LLM configuration repository

use chrono::{DateTime, Utc};
use masterdebater_core::{ConfigRole, JsonColumn, SamplingParams};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};

/// LLM configuration record from database
#[derive(Debug, Clone, FromRow)]
pub struct LlmConfig {
    pub config_id: String,
    pub name: String,
    pub role: String,
    pub model: String,
    pub base_prompt: String,
    pub temperature: f64,
    pub max_tokens: Option<i32>,
    pub other_params: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LlmConfig {
    pub fn role(&self) -> Result<ConfigRole, DbError> {
        Ok(self.role.parse()?)
    }

    /// Decoded `other_params`, if the column is set
    pub fn sampling_params(&self) -> Result<Option<SamplingParams>, DbError> {
        self.other_params
            .as_deref()
            .map(SamplingParams::from_column)
            .transpose()
            .map_err(DbError::from)
    }
}

/// Fields for a new configuration
#[derive(Debug, Clone)]
pub struct NewLlmConfig {
    pub name: String,
    pub role: ConfigRole,
    pub model: String,
    pub base_prompt: String,
    pub temperature: f64,
    pub max_tokens: Option<i32>,
    pub other_params: Option<SamplingParams>,
}

const COLUMNS: &str = "config_id, name, role, model, base_prompt, temperature, max_tokens, \
                       other_params, created_at, updated_at";

/// LLM configuration repository
pub struct LlmConfigRepo<'a> {
    db: &'a Database,
}

impl<'a> LlmConfigRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewLlmConfig) -> Result<LlmConfig, DbError> {
        let mut session = self.db.session().await?;
        let other_params = new
            .other_params
            .as_ref()
            .map(SamplingParams::to_column)
            .transpose()?;
        let now = Utc::now();

        let config = sqlx::query_as::<_, LlmConfig>(&format!(
            r#"
            INSERT INTO llm_configs ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&new.name)
        .bind(new.role.as_str())
        .bind(&new.model)
        .bind(&new.base_prompt)
        .bind(new.temperature)
        .bind(new.max_tokens)
        .bind(other_params)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(config_id = %config.config_id, name = %config.name, "LLM config created");
        Ok(config)
    }

    pub async fn get(&self, config_id: &str) -> Result<LlmConfig, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, LlmConfig>(&format!(
            "SELECT {COLUMNS} FROM llm_configs WHERE config_id = ?"
        ))
        .bind(config_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("llm config", config_id))
    }

    /// Configurations for a role, in insertion order
    pub async fn list_by_role(&self, role: ConfigRole) -> Result<Vec<LlmConfig>, DbError> {
        let mut session = self.db.session().await?;
        let configs = sqlx::query_as::<_, LlmConfig>(&format!(
            "SELECT {COLUMNS} FROM llm_configs WHERE role = ? ORDER BY created_at, rowid"
        ))
        .bind(role.as_str())
        .fetch_all(&mut *session)
        .await?;
        Ok(configs)
    }

    /// Replace temperature and auxiliary sampling parameters.
    pub async fn update_sampling(
        &self,
        config_id: &str,
        temperature: f64,
        other_params: Option<&SamplingParams>,
    ) -> Result<LlmConfig, DbError> {
        let mut session = self.db.session().await?;
        let other_params = other_params.map(SamplingParams::to_column).transpose()?;

        sqlx::query_as::<_, LlmConfig>(&format!(
            r#"
            UPDATE llm_configs SET temperature = ?, other_params = ?, updated_at = ?
            WHERE config_id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(temperature)
        .bind(other_params)
        .bind(Utc::now())
        .bind(config_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("llm config", config_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{empty_db, llm_config};

    #[tokio::test]
    async fn sampling_params_round_trip_through_column() {
        let db = empty_db().await;
        let config = llm_config(&db).await;

        assert_eq!(config.role().unwrap(), ConfigRole::Debater);
        let params = config.sampling_params().unwrap().unwrap();
        assert_eq!(params.top_p, Some(0.9));
    }

    #[tokio::test]
    async fn update_sampling_clears_params() {
        let db = empty_db().await;
        let repo = LlmConfigRepo::new(&db);
        let config = llm_config(&db).await;

        let updated = repo.update_sampling(&config.config_id, 0.2, None).await.unwrap();
        assert_eq!(updated.temperature, 0.2);
        assert!(updated.sampling_params().unwrap().is_none());
        assert!(updated.updated_at >= config.updated_at);
    }

    #[tokio::test]
    async fn corrupt_params_surface_as_payload_error() {
        let db = empty_db().await;
        let config = llm_config(&db).await;
        sqlx::query("UPDATE llm_configs SET other_params = 'not json' WHERE config_id = ?")
            .bind(&config.config_id)
            .execute(db.pool())
            .await
            .unwrap();

        let stored = LlmConfigRepo::new(&db).get(&config.config_id).await.unwrap();
        assert!(matches!(stored.sampling_params(), Err(DbError::Payload(_))));
    }
}
