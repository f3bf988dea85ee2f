//! Debate format repository
//!
//! A format is stored twice over: the `phases`/`turn_limits` JSON columns on
//! `debate_formats`, and one `debate_format_phases` row per phase carrying
//! the prompt template. `create` writes both in one transaction so they
//! cannot disagree.

use chrono::{DateTime, Utc};
use masterdebater_core::{FormatStructure, JsonColumn, PhaseList, TurnLimits};
use sqlx::{Connection, FromRow};
use uuid::Uuid;

use crate::db::{Database, DbError};

/// Format record from database
#[derive(Debug, Clone, FromRow)]
pub struct DebateFormat {
    pub format_id: String,
    pub name: String,
    pub description: Option<String>,
    pub phases: String,
    pub turn_limits: Option<String>,
    pub structure: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DebateFormat {
    pub fn phase_list(&self) -> Result<PhaseList, DbError> {
        Ok(PhaseList::from_column(&self.phases)?)
    }

    /// Decoded turn limits; a NULL column means every phase is unlimited.
    pub fn turn_limits(&self) -> Result<TurnLimits, DbError> {
        match self.turn_limits.as_deref() {
            Some(text) => Ok(TurnLimits::from_column(text)?),
            None => Ok(TurnLimits::new()),
        }
    }

    pub fn structure(&self) -> Result<FormatStructure, DbError> {
        Ok(self.structure.parse()?)
    }
}

/// Phase row from database
#[derive(Debug, Clone, FromRow)]
pub struct FormatPhase {
    pub phase_id: String,
    pub format_id: String,
    pub name: String,
    pub description: Option<String>,
    pub sequence: i32,
    pub prompt_template: String,
    pub turn_limit: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Phase definition for a new format; sequence follows list position.
#[derive(Debug, Clone)]
pub struct NewPhase {
    pub name: String,
    pub description: Option<String>,
    pub prompt_template: String,
    pub turn_limit: Option<u32>,
}

/// Fields for a new format
#[derive(Debug, Clone)]
pub struct NewFormat {
    pub name: String,
    pub description: Option<String>,
    pub structure: FormatStructure,
    pub phases: Vec<NewPhase>,
}

/// `turn_limit` column value; NULL means unlimited.
pub(crate) fn turn_limit_column(limit: Option<u32>) -> Result<Option<i32>, DbError> {
    limit
        .map(|l| {
            i32::try_from(l).map_err(|_| DbError::OutOfRange {
                field: "turn_limit",
                value: i64::from(l),
            })
        })
        .transpose()
}

const FORMAT_COLUMNS: &str =
    "format_id, name, description, phases, turn_limits, structure, created_at, updated_at";
const PHASE_COLUMNS: &str = "phase_id, format_id, name, description, sequence, prompt_template, \
                             turn_limit, created_at, updated_at";

/// Format repository
pub struct FormatRepo<'a> {
    db: &'a Database,
}

impl<'a> FormatRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a format and its phase rows (atomic).
    pub async fn create(&self, new: NewFormat) -> Result<DebateFormat, DbError> {
        let phases = PhaseList::new(new.phases.iter().map(|p| p.name.as_str()));
        let limits: TurnLimits = new
            .phases
            .iter()
            .map(|p| (p.name.clone(), p.turn_limit))
            .collect();
        let limit_columns = new
            .phases
            .iter()
            .map(|p| turn_limit_column(p.turn_limit))
            .collect::<Result<Vec<_>, _>>()?;
        let now = Utc::now();

        let mut session = self.db.session().await?;
        let mut tx = session.begin().await?;

        let format = sqlx::query_as::<_, DebateFormat>(&format!(
            r#"
            INSERT INTO debate_formats ({FORMAT_COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {FORMAT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(phases.to_column()?)
        .bind(limits.to_column()?)
        .bind(new.structure.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for (i, (phase, turn_limit)) in new.phases.iter().zip(limit_columns).enumerate() {
            sqlx::query(&format!(
                "INSERT INTO debate_format_phases ({PHASE_COLUMNS}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ))
            .bind(Uuid::new_v4().to_string())
            .bind(&format.format_id)
            .bind(&phase.name)
            .bind(phase.description.as_deref())
            .bind(i as i32 + 1)
            .bind(&phase.prompt_template)
            .bind(turn_limit)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(format = %format.name, phases = new.phases.len(), "Format created");
        Ok(format)
    }

    pub async fn get(&self, format_id: &str) -> Result<DebateFormat, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, DebateFormat>(&format!(
            "SELECT {FORMAT_COLUMNS} FROM debate_formats WHERE format_id = ?"
        ))
        .bind(format_id)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("format", format_id))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<DebateFormat, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, DebateFormat>(&format!(
            "SELECT {FORMAT_COLUMNS} FROM debate_formats WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("format", name))
    }

    /// All formats, in insertion order
    pub async fn list(&self) -> Result<Vec<DebateFormat>, DbError> {
        let mut session = self.db.session().await?;
        let formats = sqlx::query_as::<_, DebateFormat>(&format!(
            "SELECT {FORMAT_COLUMNS} FROM debate_formats ORDER BY created_at, rowid"
        ))
        .fetch_all(&mut *session)
        .await?;
        Ok(formats)
    }

    /// Phase rows of a format, by sequence
    pub async fn phases(&self, format_id: &str) -> Result<Vec<FormatPhase>, DbError> {
        let mut session = self.db.session().await?;
        let phases = sqlx::query_as::<_, FormatPhase>(&format!(
            "SELECT {PHASE_COLUMNS} FROM debate_format_phases WHERE format_id = ? ORDER BY sequence"
        ))
        .bind(format_id)
        .fetch_all(&mut *session)
        .await?;
        Ok(phases)
    }

    /// One named phase of a format
    pub async fn phase(&self, format_id: &str, name: &str) -> Result<FormatPhase, DbError> {
        let mut session = self.db.session().await?;
        sqlx::query_as::<_, FormatPhase>(&format!(
            "SELECT {PHASE_COLUMNS} FROM debate_format_phases WHERE format_id = ? AND name = ?"
        ))
        .bind(format_id)
        .bind(name)
        .fetch_optional(&mut *session)
        .await?
        .ok_or_else(|| DbError::not_found("phase", format!("{}/{}", format_id, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::empty_db;

    fn two_phase_format(name: &str) -> NewFormat {
        NewFormat {
            name: name.to_owned(),
            description: None,
            structure: FormatStructure::Strict,
            phases: vec![
                NewPhase {
                    name: "opening".into(),
                    description: None,
                    prompt_template: "Open {{position}}.".into(),
                    turn_limit: Some(1),
                },
                NewPhase {
                    name: "open_floor".into(),
                    description: Some("Anything goes".into()),
                    prompt_template: "Discuss.".into(),
                    turn_limit: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_writes_columns_and_rows() {
        let db = empty_db().await;
        let repo = FormatRepo::new(&db);
        let format = repo.create(two_phase_format("Duel")).await.unwrap();

        assert_eq!(format.phases, r#"["opening","open_floor"]"#);
        let limits = format.turn_limits().unwrap();
        assert_eq!(limits.limit_for("opening"), Some(1));
        assert_eq!(limits.limit_for("open_floor"), None);

        let rows = repo.phases(&format.format_id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].sequence, 2);
        assert_eq!(rows[1].turn_limit, None);

        let opening = repo.phase(&format.format_id, "opening").await.unwrap();
        assert_eq!(opening.prompt_template, "Open {{position}}.");
    }

    #[tokio::test]
    async fn duplicate_name_rolls_back_phases() {
        let db = empty_db().await;
        let repo = FormatRepo::new(&db);
        repo.create(two_phase_format("Duel")).await.unwrap();

        let err = repo.create(two_phase_format("Duel")).await.unwrap_err();
        assert!(err.is_unique_violation());

        let (phase_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM debate_format_phases")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(phase_rows, 2);
    }

    #[tokio::test]
    async fn oversized_turn_limit_rejected_before_writing() {
        let db = empty_db().await;
        let repo = FormatRepo::new(&db);
        let mut format = two_phase_format("Marathon");
        format.phases[1].turn_limit = Some(u32::MAX);

        let err = repo.create(format).await.unwrap_err();
        assert!(matches!(err, DbError::OutOfRange { field: "turn_limit", .. }));
        assert!(repo.list().await.unwrap().is_empty());
        assert_eq!(db.open_sessions(), 0);
    }

    #[test]
    fn turn_limit_column_bounds() {
        assert_eq!(turn_limit_column(None).unwrap(), None);
        assert_eq!(turn_limit_column(Some(3)).unwrap(), Some(3));
        assert_eq!(
            turn_limit_column(Some(i32::MAX as u32)).unwrap(),
            Some(i32::MAX)
        );
        assert!(turn_limit_column(Some(i32::MAX as u32 + 1)).is_err());
    }

    #[tokio::test]
    async fn null_turn_limits_mean_unlimited() {
        let db = empty_db().await;
        let repo = FormatRepo::new(&db);
        let format = repo.create(two_phase_format("Duel")).await.unwrap();
        sqlx::query("UPDATE debate_formats SET turn_limits = NULL WHERE format_id = ?")
            .bind(&format.format_id)
            .execute(db.pool())
            .await
            .unwrap();

        let stored = repo.get_by_name("Duel").await.unwrap();
        assert_eq!(stored.turn_limits().unwrap().limit_for("opening"), None);
    }
}
