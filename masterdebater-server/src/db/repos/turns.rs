//! Turn repository
//!
//! Turn numbers are unique within a debate; the store rejects a reused
//! number rather than this layer checking first.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};

/// Turn record from database
#[derive(Debug, Clone, FromRow)]
pub struct Turn {
    pub turn_id: String,
    pub debate_id: String,
    pub participant_id: String,
    pub content: String,
    pub turn_number: i32,
    pub phase: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub tokens_used: Option<i32>,
}

/// Fields for a new turn
#[derive(Debug, Clone)]
pub struct NewTurn {
    pub debate_id: String,
    pub participant_id: String,
    pub content: String,
    pub turn_number: i32,
    pub phase: String,
    pub tokens_used: Option<i32>,
}

const COLUMNS: &str =
    "turn_id, debate_id, participant_id, content, turn_number, phase, timestamp, tokens_used";

/// Turn repository
pub struct TurnRepo<'a> {
    db: &'a Database,
}

impl<'a> TurnRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewTurn) -> Result<Turn, DbError> {
        let mut session = self.db.session().await?;
        let turn = sqlx::query_as::<_, Turn>(&format!(
            r#"
            INSERT INTO debate_turns ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&new.debate_id)
        .bind(&new.participant_id)
        .bind(&new.content)
        .bind(new.turn_number)
        .bind(&new.phase)
        .bind(Utc::now())
        .bind(new.tokens_used)
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(
            debate_id = %turn.debate_id,
            turn_number = turn.turn_number,
            phase = %turn.phase,
            "Turn recorded"
        );
        Ok(turn)
    }

    pub async fn get(&self, turn_id: &str) -> Result<Turn, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, Turn>(&format!("SELECT {COLUMNS} FROM debate_turns WHERE turn_id = ?"))
            .bind(turn_id)
            .fetch_optional(&mut *session)
            .await?
            .ok_or_else(|| DbError::not_found("turn", turn_id))
    }

    /// Transcript of a debate, in turn order
    pub async fn list_for_debate(&self, debate_id: &str) -> Result<Vec<Turn>, DbError> {
        let mut session = self.db.session().await?;
        let turns = sqlx::query_as::<_, Turn>(&format!(
            "SELECT {COLUMNS} FROM debate_turns WHERE debate_id = ? ORDER BY turn_number"
        ))
        .bind(debate_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(turns)
    }

    /// One past the highest recorded turn number (1 for an empty debate)
    pub async fn next_turn_number(&self, debate_id: &str) -> Result<i32, DbError> {
        let mut session = self.db.session().await?;
        let (next,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(turn_number), 0) + 1 FROM debate_turns WHERE debate_id = ?",
        )
        .bind(debate_id)
        .fetch_one(&mut *session)
        .await?;
        Ok(next)
    }

    /// Turns already taken in one phase of a debate
    pub async fn count_in_phase(&self, debate_id: &str, phase: &str) -> Result<i64, DbError> {
        let mut session = self.db.session().await?;
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM debate_turns WHERE debate_id = ? AND phase = ?")
                .bind(debate_id)
                .bind(phase)
                .fetch_one(&mut *session)
                .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{debate, empty_db, participant};
    use masterdebater_core::Side;

    fn turn(debate_id: &str, participant_id: &str, number: i32, phase: &str) -> NewTurn {
        NewTurn {
            debate_id: debate_id.to_owned(),
            participant_id: participant_id.to_owned(),
            content: format!("turn {}", number),
            turn_number: number,
            phase: phase.to_owned(),
            tokens_used: Some(42),
        }
    }

    #[tokio::test]
    async fn reused_turn_number_rejected() {
        let db = empty_db().await;
        let debate = debate(&db).await;
        let speaker = participant(&db, &debate, "Ada", Side::Affirmative).await;
        let repo = TurnRepo::new(&db);

        repo.create(turn(&debate.debate_id, &speaker.participant_id, 1, "opening_pro"))
            .await
            .unwrap();
        let err = repo
            .create(turn(&debate.debate_id, &speaker.participant_id, 1, "opening_con"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn missing_participant_is_foreign_key_violation() {
        let db = empty_db().await;
        let debate = debate(&db).await;

        let err = TurnRepo::new(&db)
            .create(turn(&debate.debate_id, "nobody", 1, "discussion"))
            .await
            .unwrap_err();
        assert!(err.is_foreign_key_violation());
    }

    #[tokio::test]
    async fn numbering_and_phase_counts() {
        let db = empty_db().await;
        let debate = debate(&db).await;
        let pro = participant(&db, &debate, "Ada", Side::Affirmative).await;
        let con = participant(&db, &debate, "Bob", Side::Negative).await;
        let repo = TurnRepo::new(&db);

        assert_eq!(repo.next_turn_number(&debate.debate_id).await.unwrap(), 1);

        repo.create(turn(&debate.debate_id, &pro.participant_id, 1, "opening_pro"))
            .await
            .unwrap();
        repo.create(turn(&debate.debate_id, &con.participant_id, 2, "opening_con"))
            .await
            .unwrap();
        repo.create(turn(&debate.debate_id, &pro.participant_id, 3, "cross_examination"))
            .await
            .unwrap();
        repo.create(turn(&debate.debate_id, &con.participant_id, 4, "cross_examination"))
            .await
            .unwrap();

        assert_eq!(repo.next_turn_number(&debate.debate_id).await.unwrap(), 5);
        assert_eq!(
            repo.count_in_phase(&debate.debate_id, "cross_examination").await.unwrap(),
            2
        );

        let transcript = repo.list_for_debate(&debate.debate_id).await.unwrap();
        let numbers: Vec<_> = transcript.iter().map(|t| t.turn_number).collect();
        assert_eq!(numbers, [1, 2, 3, 4]);
    }
}
