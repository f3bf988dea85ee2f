//! Moderator comment repository

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};

/// Moderator comment record from database
#[derive(Debug, Clone, FromRow)]
pub struct ModeratorComment {
    pub comment_id: String,
    pub debate_id: String,
    /// Turn the comment responds to, if any
    pub turn_id: Option<String>,
    pub content: String,
    pub comment_type: String,
    pub timestamp: Option<DateTime<Utc>>,
}

const COLUMNS: &str = "comment_id, debate_id, turn_id, content, comment_type, timestamp";

/// Moderator comment repository
pub struct CommentRepo<'a> {
    db: &'a Database,
}

impl<'a> CommentRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        debate_id: &str,
        turn_id: Option<&str>,
        content: &str,
        comment_type: &str,
    ) -> Result<ModeratorComment, DbError> {
        let mut session = self.db.session().await?;
        let comment = sqlx::query_as::<_, ModeratorComment>(&format!(
            "INSERT INTO moderator_comments ({COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(debate_id)
        .bind(turn_id)
        .bind(content)
        .bind(comment_type)
        .bind(Utc::now())
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(debate_id, comment_type, "Moderator comment recorded");
        Ok(comment)
    }

    pub async fn list_for_debate(&self, debate_id: &str) -> Result<Vec<ModeratorComment>, DbError> {
        let mut session = self.db.session().await?;
        let comments = sqlx::query_as::<_, ModeratorComment>(&format!(
            "SELECT {COLUMNS} FROM moderator_comments WHERE debate_id = ? ORDER BY timestamp, rowid"
        ))
        .bind(debate_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(comments)
    }

    pub async fn list_for_turn(&self, turn_id: &str) -> Result<Vec<ModeratorComment>, DbError> {
        let mut session = self.db.session().await?;
        let comments = sqlx::query_as::<_, ModeratorComment>(&format!(
            "SELECT {COLUMNS} FROM moderator_comments WHERE turn_id = ? ORDER BY timestamp, rowid"
        ))
        .bind(turn_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{NewTurn, TurnRepo};
    use crate::db::testing::{debate, empty_db, participant};
    use masterdebater_core::Side;

    #[tokio::test]
    async fn comments_attach_to_debate_and_turn() {
        let db = empty_db().await;
        let debate = debate(&db).await;
        let speaker = participant(&db, &debate, "Ada", Side::Affirmative).await;
        let turn = TurnRepo::new(&db)
            .create(NewTurn {
                debate_id: debate.debate_id.clone(),
                participant_id: speaker.participant_id.clone(),
                content: "Opening".into(),
                turn_number: 1,
                phase: "discussion".into(),
                tokens_used: None,
            })
            .await
            .unwrap();
        let repo = CommentRepo::new(&db);

        repo.create(&debate.debate_id, None, "Welcome", "announcement").await.unwrap();
        repo.create(&debate.debate_id, Some(&turn.turn_id), "Stay on topic", "warning")
            .await
            .unwrap();

        assert_eq!(repo.list_for_debate(&debate.debate_id).await.unwrap().len(), 2);
        let on_turn = repo.list_for_turn(&turn.turn_id).await.unwrap();
        assert_eq!(on_turn.len(), 1);
        assert_eq!(on_turn[0].comment_type, "warning");
    }

    #[tokio::test]
    async fn unknown_turn_is_foreign_key_violation() {
        let db = empty_db().await;
        let debate = debate(&db).await;
        let err = CommentRepo::new(&db)
            .create(&debate.debate_id, Some("missing"), "?", "note")
            .await
            .unwrap_err();
        assert!(err.is_foreign_key_violation());
    }
}
