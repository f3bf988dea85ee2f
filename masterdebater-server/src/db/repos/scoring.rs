//! Scoring repository
//!
//! Criteria are reference data; a judge's score for a debate is one
//! `debate_scores` row plus one `criteria_scores` row per criterion.

use chrono::{DateTime, Utc};
use masterdebater_core::WinnerSide;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{Database, DbError};

/// Scoring criterion record from database
#[derive(Debug, Clone, FromRow)]
pub struct ScoringCriterion {
    pub criteria_id: String,
    pub name: String,
    pub description: String,
    pub max_score: i32,
    pub weight: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A judge's overall score for a debate
#[derive(Debug, Clone, FromRow)]
pub struct DebateScore {
    pub score_id: String,
    pub debate_id: String,
    /// Participant id of the judge
    pub judge_id: String,
    pub verdict_summary: Option<String>,
    pub winner_side: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DebateScore {
    pub fn winner(&self) -> Result<Option<WinnerSide>, DbError> {
        Ok(self.winner_side.as_deref().map(str::parse::<WinnerSide>).transpose()?)
    }
}

/// Criteria score joined with its criterion
#[derive(Debug, Clone, FromRow)]
pub struct CriteriaScoreDetail {
    pub criteria_score_id: String,
    pub score_id: String,
    pub criteria_id: String,
    pub criterion_name: String,
    pub max_score: i32,
    pub weight: f64,
    pub score_value: i32,
    pub comment: Option<String>,
}

const CRITERION_COLUMNS: &str =
    "criteria_id, name, description, max_score, weight, created_at, updated_at";
const SCORE_COLUMNS: &str =
    "score_id, debate_id, judge_id, verdict_summary, winner_side, created_at, updated_at";

/// Scoring repository
pub struct ScoringRepo<'a> {
    db: &'a Database,
}

impl<'a> ScoringRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn create_criterion(
        &self,
        name: &str,
        description: &str,
        max_score: i32,
        weight: f64,
    ) -> Result<ScoringCriterion, DbError> {
        let mut session = self.db.session().await?;
        let now = Utc::now();
        let criterion = sqlx::query_as::<_, ScoringCriterion>(&format!(
            r#"
            INSERT INTO scoring_criteria ({CRITERION_COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {CRITERION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(description)
        .bind(max_score)
        .bind(weight)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(criterion = name, "Scoring criterion created");
        Ok(criterion)
    }

    /// All criteria, in insertion order
    pub async fn list_criteria(&self) -> Result<Vec<ScoringCriterion>, DbError> {
        let mut session = self.db.session().await?;
        let criteria = sqlx::query_as::<_, ScoringCriterion>(&format!(
            "SELECT {CRITERION_COLUMNS} FROM scoring_criteria ORDER BY created_at, rowid"
        ))
        .fetch_all(&mut *session)
        .await?;
        Ok(criteria)
    }

    /// Open a judge's score for a debate. One per (debate, judge).
    pub async fn create_score(
        &self,
        debate_id: &str,
        judge_id: &str,
    ) -> Result<DebateScore, DbError> {
        let mut session = self.db.session().await?;
        let now = Utc::now();
        let score = sqlx::query_as::<_, DebateScore>(&format!(
            r#"
            INSERT INTO debate_scores ({SCORE_COLUMNS})
            VALUES (?, ?, ?, NULL, NULL, ?, ?)
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(debate_id)
        .bind(judge_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *session)
        .await?;

        tracing::debug!(debate_id, judge_id, "Debate score opened");
        Ok(score)
    }

    /// Record the judge's verdict and winner.
    pub async fn set_verdict(
        &self,
        score_id: &str,
        verdict_summary: &str,
        winner: WinnerSide,
    ) -> Result<DebateScore, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, DebateScore>(&format!(
            r#"
            UPDATE debate_scores SET verdict_summary = ?, winner_side = ?, updated_at = ?
            WHERE score_id = ?
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(verdict_summary)
        .bind(winner.as_str())
        .bind(Utc::now())
        .bind(score_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("score", score_id))
    }

    /// Score one criterion. One per (score, criterion).
    pub async fn add_criteria_score(
        &self,
        score_id: &str,
        criteria_id: &str,
        score_value: i32,
        comment: Option<&str>,
    ) -> Result<String, DbError> {
        let mut session = self.db.session().await?;
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO criteria_scores
                (criteria_score_id, score_id, criteria_id, score_value, comment)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(score_id)
        .bind(criteria_id)
        .bind(score_value)
        .bind(comment)
        .execute(&mut *session)
        .await?;
        Ok(id)
    }

    /// Per-criterion breakdown of a score
    pub async fn criteria_scores_for(
        &self,
        score_id: &str,
    ) -> Result<Vec<CriteriaScoreDetail>, DbError> {
        let mut session = self.db.session().await?;
        let rows = sqlx::query_as::<_, CriteriaScoreDetail>(
            r#"
            SELECT cs.criteria_score_id, cs.score_id, cs.criteria_id,
                   c.name AS criterion_name, c.max_score, c.weight,
                   cs.score_value, cs.comment
            FROM criteria_scores cs
            JOIN scoring_criteria c ON c.criteria_id = cs.criteria_id
            WHERE cs.score_id = ?
            ORDER BY c.created_at, c.rowid
            "#,
        )
        .bind(score_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(rows)
    }

    /// All judges' scores for a debate
    pub async fn scores_for_debate(&self, debate_id: &str) -> Result<Vec<DebateScore>, DbError> {
        let mut session = self.db.session().await?;
        let scores = sqlx::query_as::<_, DebateScore>(&format!(
            "SELECT {SCORE_COLUMNS} FROM debate_scores \
             WHERE debate_id = ? ORDER BY created_at, rowid"
        ))
        .bind(debate_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(scores)
    }
}
