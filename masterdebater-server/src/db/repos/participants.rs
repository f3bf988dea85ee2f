//! Participant repository
//!
//! A participant binds one user to one debate on one side. "Users of a
//! debate" is answered here by joining, not by a back-pointer on the debate.

use masterdebater_core::Side;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};

/// Participant record from database
#[derive(Debug, Clone, FromRow)]
pub struct Participant {
    pub participant_id: String,
    pub debate_id: String,
    pub user_id: String,
    pub side: String,
}

impl Participant {
    pub fn side(&self) -> Result<Side, DbError> {
        Ok(self.side.parse()?)
    }
}

/// Participant joined with its user
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantWithUser {
    pub participant_id: String,
    pub debate_id: String,
    pub user_id: String,
    pub side: String,
    pub username: String,
    pub is_llm: bool,
    pub llm_config_id: Option<String>,
}

const COLUMNS: &str = "participant_id, debate_id, user_id, side";

/// Participant repository
pub struct ParticipantRepo<'a> {
    db: &'a Database,
}

impl<'a> ParticipantRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Seat a user in a debate. A user may hold only one seat per debate.
    pub async fn add(
        &self,
        debate_id: &str,
        user_id: &str,
        side: Side,
    ) -> Result<Participant, DbError> {
        let mut session = self.db.session().await?;
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "INSERT INTO debate_participants ({COLUMNS}) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(debate_id)
        .bind(user_id)
        .bind(side.as_str())
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(debate_id, user_id, side = %side, "Participant added");
        Ok(participant)
    }

    pub async fn get(&self, participant_id: &str) -> Result<Participant, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {COLUMNS} FROM debate_participants WHERE participant_id = ?"
        ))
        .bind(participant_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("participant", participant_id))
    }

    /// Everyone seated in a debate, with their user fields
    pub async fn list_for_debate(
        &self,
        debate_id: &str,
    ) -> Result<Vec<ParticipantWithUser>, DbError> {
        let mut session = self.db.session().await?;
        let rows = sqlx::query_as::<_, ParticipantWithUser>(
            r#"
            SELECT p.participant_id, p.debate_id, p.user_id, p.side,
                   u.username, u.is_llm, u.llm_config_id
            FROM debate_participants p
            JOIN users u ON u.user_id = p.user_id
            WHERE p.debate_id = ?
            ORDER BY p.rowid
            "#,
        )
        .bind(debate_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(rows)
    }
}
