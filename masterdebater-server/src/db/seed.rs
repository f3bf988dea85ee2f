//! Initial seed revision: reference formats, rubric and model configs
//!
//! `upgrade` is not idempotent. Running it twice fails on the unique format
//! name and the transaction rolls back, leaving the first seed untouched.
//! `downgrade` removes seeded rows by business key; criteria, phases and
//! formats are removed wholesale, including rows added after seeding.

use chrono::{DateTime, Utc};
use masterdebater_core::seed::{
    self, ADMIN_USER, CRITERIA, FORMATS, GENERIC_BASE_PROMPT, LLM_CONFIGS, SEEDED_CONFIG_ROLE,
    SEED_DOWN_REVISION, SEED_REVISION,
};
use masterdebater_core::JsonColumn;
use serde::Serialize;
use sqlx::Connection;
use uuid::Uuid;

use super::repos::formats::turn_limit_column;
use super::schema::count_rows_on;
use super::{Database, DbError};

/// Tables the seed writes to, in insertion order
pub const SEEDED_TABLES: &[&str] = &[
    "debate_formats",
    "debate_format_phases",
    "scoring_criteria",
    "llm_configs",
    "users",
];

/// Rows touched per table by an upgrade or downgrade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub formats: u64,
    pub phases: u64,
    pub criteria: u64,
    pub llm_configs: u64,
    pub users: u64,
}

/// Whether the seed revision is applied, with current row counts
#[derive(Debug, Clone, Serialize)]
pub struct SeedStatus {
    pub revision: &'static str,
    pub applied_at: Option<DateTime<Utc>>,
    pub row_counts: Vec<(&'static str, i64)>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Apply the seed. Each step runs in order inside one transaction.
pub async fn upgrade(db: &Database) -> Result<SeedReport, DbError> {
    tracing::info!(revision = SEED_REVISION, "Applying seed revision");
    let now = Utc::now();
    let mut report = SeedReport::default();
    let mut session = db.session().await?;
    let mut tx = session.begin().await?;

    // Step 1: formats
    let mut format_ids = Vec::with_capacity(FORMATS.len());
    for format in FORMATS {
        let format_id = new_id();
        sqlx::query(
            r#"
            INSERT INTO debate_formats
                (format_id, name, description, phases, turn_limits, structure,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&format_id)
        .bind(format.name)
        .bind(format.description)
        .bind(format.phase_list().to_column()?)
        .bind(format.turn_limits().to_column()?)
        .bind(format.structure.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        format_ids.push(format_id);
        report.formats += 1;
    }

    // Step 2: phases per format
    for (format, format_id) in FORMATS.iter().zip(&format_ids) {
        for phase in format.phases {
            sqlx::query(
                r#"
                INSERT INTO debate_format_phases
                    (phase_id, format_id, name, description, sequence, prompt_template,
                     turn_limit, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(new_id())
            .bind(format_id)
            .bind(phase.name)
            .bind(phase.description)
            .bind(phase.sequence)
            .bind(phase.prompt_template)
            .bind(turn_limit_column(phase.turn_limit)?)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            report.phases += 1;
        }
        tracing::debug!(format = format.name, phases = format.phases.len(), "Seeded format");
    }

    // Step 3: scoring criteria
    for criterion in CRITERIA {
        sqlx::query(
            r#"
            INSERT INTO scoring_criteria
                (criteria_id, name, description, max_score, weight, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new_id())
        .bind(criterion.name)
        .bind(criterion.description)
        .bind(criterion.max_score)
        .bind(criterion.weight)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        report.criteria += 1;
    }

    // Step 4: model configurations
    for config in LLM_CONFIGS {
        sqlx::query(
            r#"
            INSERT INTO llm_configs
                (config_id, name, role, model, base_prompt, temperature, max_tokens,
                 other_params, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new_id())
        .bind(config.name)
        .bind(SEEDED_CONFIG_ROLE.as_str())
        .bind(config.model)
        .bind(GENERIC_BASE_PROMPT)
        .bind(config.temperature)
        .bind(config.max_tokens)
        .bind(config.sampling_params().to_column()?)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        report.llm_configs += 1;
    }

    // Step 5: admin user
    sqlx::query(
        r#"
        INSERT INTO users (user_id, username, email, is_llm, llm_config_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, NULL, ?, ?)
        "#,
    )
    .bind(new_id())
    .bind(ADMIN_USER.username)
    .bind(ADMIN_USER.email)
    .bind(ADMIN_USER.is_llm)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    report.users += 1;

    sqlx::query("INSERT INTO seed_revisions (revision, down_revision, applied_at) VALUES (?, ?, ?)")
        .bind(SEED_REVISION)
        .bind(SEED_DOWN_REVISION)
        .bind(now)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        formats = report.formats,
        phases = report.phases,
        criteria = report.criteria,
        llm_configs = report.llm_configs,
        users = report.users,
        "Seed revision applied"
    );
    Ok(report)
}

/// Revert the seed, newest data first.
///
/// Foreign keys stay enforced: if any surviving row still references a
/// seeded row (an agent on a seeded config, a debate moderated by the admin,
/// a score against a seeded criterion), the revert fails with
/// `ForeignKeyViolation` and the transaction leaves the seed untouched.
pub async fn downgrade(db: &Database) -> Result<SeedReport, DbError> {
    tracing::info!(revision = SEED_REVISION, "Reverting seed revision");
    let mut session = db.session().await?;
    let mut tx = session.begin().await?;

    let users = sqlx::query("DELETE FROM users WHERE email = ?")
        .bind(seed::ADMIN_EMAIL)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let llm_configs = sqlx::query("DELETE FROM llm_configs WHERE role = ?")
        .bind(SEEDED_CONFIG_ROLE.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    // These three are unconditional: they also remove rows written after the seed.
    let criteria = sqlx::query("DELETE FROM scoring_criteria")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let phases = sqlx::query("DELETE FROM debate_format_phases")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let formats = sqlx::query("DELETE FROM debate_formats")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM seed_revisions WHERE revision = ?")
        .bind(SEED_REVISION)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let report = SeedReport {
        formats,
        phases,
        criteria,
        llm_configs,
        users,
    };
    warn_on_extra_rows(&report);

    tracing::info!(
        formats,
        phases,
        criteria,
        llm_configs,
        users,
        "Seed revision reverted"
    );
    Ok(report)
}

fn warn_on_extra_rows(report: &SeedReport) {
    let seeded = [
        ("debate_formats", report.formats, FORMATS.len() as u64),
        ("debate_format_phases", report.phases, seed::phase_count() as u64),
        ("scoring_criteria", report.criteria, CRITERIA.len() as u64),
        ("llm_configs", report.llm_configs, LLM_CONFIGS.len() as u64),
    ];
    for (table, deleted, expected) in seeded {
        if deleted > expected {
            tracing::warn!(
                table,
                deleted,
                seeded = expected,
                "Seed revert removed rows that were not written by the seed"
            );
        }
    }
}

/// Report whether the seed is applied and how many rows each seeded table holds.
pub async fn status(db: &Database) -> Result<SeedStatus, DbError> {
    let mut session = db.session().await?;
    let applied_at: Option<(DateTime<Utc>,)> =
        sqlx::query_as("SELECT applied_at FROM seed_revisions WHERE revision = ?")
            .bind(SEED_REVISION)
            .fetch_optional(&mut *session)
            .await?;

    let mut row_counts = Vec::with_capacity(SEEDED_TABLES.len());
    for table in SEEDED_TABLES {
        row_counts.push((*table, count_rows_on(&mut session, table).await?));
    }

    Ok(SeedStatus {
        revision: SEED_REVISION,
        applied_at: applied_at.map(|(t,)| t),
        row_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{FormatRepo, LlmConfigRepo, NewUser, ScoringRepo, UserRepo};
    use crate::db::schema::{self, count_rows};
    use crate::models::Username;
    use masterdebater_core::{ConfigRole, FormatStructure};

    async fn seeded_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        schema::create_all(&db).await.unwrap();
        upgrade(&db).await.unwrap();
        db
    }

    async fn phase_table(db: &Database, format: &str) -> Vec<(String, i32, Option<i32>)> {
        let repo = FormatRepo::new(db);
        let format = repo.get_by_name(format).await.unwrap();
        repo.phases(&format.format_id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.name, p.sequence, p.turn_limit))
            .collect()
    }

    fn expected(names: &[&str], limits: &[Option<i32>]) -> Vec<(String, i32, Option<i32>)> {
        names
            .iter()
            .zip(limits)
            .enumerate()
            .map(|(i, (n, l))| (n.to_string(), i as i32 + 1, *l))
            .collect()
    }

    #[tokio::test]
    async fn upgrade_reports_row_counts() {
        let db = Database::open_in_memory().await.unwrap();
        schema::create_all(&db).await.unwrap();

        let report = upgrade(&db).await.unwrap();
        assert_eq!(
            report,
            SeedReport {
                formats: 5,
                phases: 23,
                criteria: 5,
                llm_configs: 3,
                users: 1,
            }
        );
    }

    #[tokio::test]
    async fn single_phase_formats() {
        let db = seeded_db().await;
        assert_eq!(
            phase_table(&db, "Open-Ended").await,
            expected(&["discussion"], &[None])
        );
        assert_eq!(
            phase_table(&db, "Fixed-Turn (10)").await,
            expected(&["debate"], &[Some(10)])
        );
    }

    #[tokio::test]
    async fn oxford_phases() {
        let db = seeded_db().await;
        let names = [
            "opening_pro",
            "opening_con",
            "rebuttal_pro",
            "rebuttal_con",
            "cross_examination",
            "closing_con",
            "closing_pro",
        ];
        let limits = [Some(1), Some(1), Some(1), Some(1), Some(3), Some(1), Some(1)];
        assert_eq!(phase_table(&db, "Oxford Style").await, expected(&names, &limits));
    }

    #[tokio::test]
    async fn lincoln_douglas_phases() {
        let db = seeded_db().await;
        let names = [
            "affirmative_constructive",
            "cross_examination_1",
            "negative_constructive",
            "cross_examination_2",
            "affirmative_rebuttal",
            "negative_rebuttal",
            "affirmative_conclusion",
        ];
        let limits = [Some(1), Some(3), Some(1), Some(3), Some(1), Some(1), Some(1)];
        assert_eq!(phase_table(&db, "Lincoln-Douglas").await, expected(&names, &limits));
    }

    #[tokio::test]
    async fn popper_phases() {
        let db = seeded_db().await;
        let names = [
            "affirmative_position",
            "negative_position",
            "exchange_1",
            "exchange_2",
            "exchange_3",
            "affirmative_conclusion",
            "negative_conclusion",
        ];
        let limits = [Some(1), Some(1), Some(2), Some(2), Some(2), Some(1), Some(1)];
        assert_eq!(phase_table(&db, "Popper").await, expected(&names, &limits));
    }

    #[tokio::test]
    async fn format_columns_agree_with_phase_rows() {
        let db = seeded_db().await;
        let repo = FormatRepo::new(&db);
        let oxford = repo.get_by_name("Oxford Style").await.unwrap();

        assert_eq!(oxford.structure().unwrap(), FormatStructure::Strict);
        let phases = oxford.phase_list().unwrap();
        assert_eq!(phases.len(), 7);
        assert_eq!(phases.sequence_of("cross_examination"), Some(5));
        assert_eq!(oxford.turn_limits().unwrap().limit_for("cross_examination"), Some(3));

        let open = repo.get_by_name("Open-Ended").await.unwrap();
        assert_eq!(open.structure().unwrap(), FormatStructure::Flexible);
    }

    #[tokio::test]
    async fn five_criteria_with_uniform_scale() {
        let db = seeded_db().await;
        let criteria = ScoringRepo::new(&db).list_criteria().await.unwrap();

        assert_eq!(criteria.len(), 5);
        for c in &criteria {
            assert_eq!(c.max_score, 10);
            assert_eq!(c.weight, 1.0);
        }
    }

    #[tokio::test]
    async fn three_configs_share_prompt() {
        let db = seeded_db().await;
        let configs = LlmConfigRepo::new(&db)
            .list_by_role(ConfigRole::General)
            .await
            .unwrap();

        assert_eq!(configs.len(), 3);
        let temps: Vec<f64> = configs.iter().map(|c| c.temperature).collect();
        assert_eq!(temps, vec![0.7, 0.3, 0.9]);
        assert!(configs.iter().all(|c| c.base_prompt == GENERIC_BASE_PROMPT));
        assert!(configs.iter().all(|c| c.max_tokens == Some(1024)));

        let creative = configs[2].sampling_params().unwrap().unwrap();
        assert_eq!(creative.top_p, Some(0.98));
        assert_eq!(creative.frequency_penalty, Some(-0.2));
    }

    #[tokio::test]
    async fn single_admin_user() {
        let db = seeded_db().await;
        assert_eq!(count_rows(&db, "users").await.unwrap(), 1);

        let admin = UserRepo::new(&db)
            .find_by_email("admin@example.com")
            .await
            .unwrap()
            .expect("admin user seeded");
        assert_eq!(admin.username, "Admin");
        assert!(!admin.is_llm);
        assert!(admin.llm_config_id.is_none());
    }

    #[tokio::test]
    async fn downgrade_empties_seeded_tables() {
        let db = seeded_db().await;
        downgrade(&db).await.unwrap();

        for table in SEEDED_TABLES {
            assert_eq!(count_rows(&db, table).await.unwrap(), 0, "{} not empty", table);
        }
        assert!(status(&db).await.unwrap().applied_at.is_none());
    }

    #[tokio::test]
    async fn second_upgrade_fails_and_keeps_first_seed() {
        let db = seeded_db().await;

        let err = upgrade(&db).await.unwrap_err();
        assert!(err.is_unique_violation(), "unexpected error: {err}");
        assert_eq!(db.open_sessions(), 0);

        assert_eq!(count_rows(&db, "debate_formats").await.unwrap(), 5);
        assert_eq!(count_rows(&db, "scoring_criteria").await.unwrap(), 5);
        assert_eq!(count_rows(&db, "llm_configs").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn downgrade_refused_while_seeded_config_in_use() {
        let db = seeded_db().await;
        let config = LlmConfigRepo::new(&db)
            .list_by_role(ConfigRole::General)
            .await
            .unwrap()
            .remove(0);
        UserRepo::new(&db)
            .create(NewUser::agent(Username::new("Balanced Bot").unwrap(), &config.config_id))
            .await
            .unwrap();

        let err = downgrade(&db).await.unwrap_err();
        assert!(err.is_foreign_key_violation(), "unexpected error: {err}");

        assert_eq!(count_rows(&db, "debate_formats").await.unwrap(), 5);
        assert_eq!(count_rows(&db, "debate_format_phases").await.unwrap(), 23);
        assert_eq!(count_rows(&db, "users").await.unwrap(), 2);
        assert!(status(&db).await.unwrap().applied_at.is_some());
        assert_eq!(db.open_sessions(), 0);
    }

    #[tokio::test]
    async fn upgrade_after_downgrade_succeeds() {
        let db = seeded_db().await;
        downgrade(&db).await.unwrap();
        let report = upgrade(&db).await.unwrap();
        assert_eq!(report.formats, 5);
    }

    #[tokio::test]
    async fn downgrade_removes_criteria_added_after_seed() {
        let db = seeded_db().await;
        ScoringRepo::new(&db)
            .create_criterion("Humor", "Wit under pressure", 5, 0.5)
            .await
            .unwrap();

        let report = downgrade(&db).await.unwrap();
        assert_eq!(report.criteria, 6);
        assert_eq!(count_rows(&db, "scoring_criteria").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn status_tracks_revision() {
        let db = Database::open_in_memory().await.unwrap();
        schema::create_all(&db).await.unwrap();

        let before = status(&db).await.unwrap();
        assert!(before.applied_at.is_none());
        assert!(before.row_counts.iter().all(|(_, n)| *n == 0));

        upgrade(&db).await.unwrap();
        let after = status(&db).await.unwrap();
        assert!(after.applied_at.is_some());
        assert!(after.row_counts.contains(&("debate_format_phases", 23)));
    }
}
