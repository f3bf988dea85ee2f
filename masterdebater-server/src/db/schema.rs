//! Table definitions for the debate store
//!
//! Declaration only: identifiers and timestamps are supplied by the writer,
//! never defaulted by the store. Column names and types match the
//! long-standing layout so existing database files stay readable.

use sqlx::{Connection, SqliteConnection};

use super::{Database, DbError};

/// Tables in creation (dependency) order
pub const TABLES: &[&str] = &[
    "llm_configs",
    "users",
    "debate_formats",
    "debate_format_phases",
    "debates",
    "debate_participants",
    "debate_turns",
    "moderator_comments",
    "scoring_criteria",
    "debate_scores",
    "criteria_scores",
    "debate_checkpoints",
    "llm_memory",
    "seed_revisions",
];

const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS llm_configs (
        config_id VARCHAR NOT NULL PRIMARY KEY,
        name VARCHAR NOT NULL,
        role VARCHAR NOT NULL,
        model VARCHAR NOT NULL,
        base_prompt TEXT NOT NULL,
        temperature FLOAT NOT NULL,
        max_tokens INTEGER,
        other_params VARCHAR,
        created_at DATETIME,
        updated_at DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id VARCHAR NOT NULL PRIMARY KEY,
        username VARCHAR NOT NULL,
        email VARCHAR UNIQUE,
        is_llm BOOLEAN NOT NULL,
        llm_config_id VARCHAR REFERENCES llm_configs (config_id),
        created_at DATETIME,
        updated_at DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS debate_formats (
        format_id VARCHAR NOT NULL PRIMARY KEY,
        name VARCHAR NOT NULL UNIQUE,
        description VARCHAR,
        phases VARCHAR NOT NULL,
        turn_limits VARCHAR,
        structure VARCHAR NOT NULL,
        created_at DATETIME,
        updated_at DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS debate_format_phases (
        phase_id VARCHAR NOT NULL PRIMARY KEY,
        format_id VARCHAR NOT NULL REFERENCES debate_formats (format_id),
        name VARCHAR NOT NULL,
        description TEXT,
        sequence INTEGER NOT NULL,
        prompt_template TEXT NOT NULL,
        turn_limit INTEGER,
        created_at DATETIME,
        updated_at DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS debates (
        debate_id VARCHAR NOT NULL PRIMARY KEY,
        title VARCHAR NOT NULL,
        description VARCHAR,
        proposition TEXT NOT NULL,
        format VARCHAR NOT NULL,
        status VARCHAR NOT NULL,
        moderator_id VARCHAR NOT NULL REFERENCES users (user_id),
        time_limit_minutes INTEGER,
        created_at DATETIME,
        updated_at DATETIME,
        completed_at DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS debate_participants (
        participant_id VARCHAR NOT NULL PRIMARY KEY,
        debate_id VARCHAR NOT NULL REFERENCES debates (debate_id),
        user_id VARCHAR NOT NULL REFERENCES users (user_id),
        side VARCHAR NOT NULL,
        CONSTRAINT unique_participant UNIQUE (debate_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS debate_turns (
        turn_id VARCHAR NOT NULL PRIMARY KEY,
        debate_id VARCHAR NOT NULL REFERENCES debates (debate_id),
        participant_id VARCHAR NOT NULL REFERENCES debate_participants (participant_id),
        content TEXT NOT NULL,
        turn_number INTEGER NOT NULL,
        phase VARCHAR NOT NULL,
        timestamp DATETIME,
        tokens_used INTEGER,
        CONSTRAINT unique_turn_number UNIQUE (debate_id, turn_number)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS moderator_comments (
        comment_id VARCHAR NOT NULL PRIMARY KEY,
        debate_id VARCHAR NOT NULL REFERENCES debates (debate_id),
        turn_id VARCHAR REFERENCES debate_turns (turn_id),
        content TEXT NOT NULL,
        comment_type VARCHAR NOT NULL,
        timestamp DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS scoring_criteria (
        criteria_id VARCHAR NOT NULL PRIMARY KEY,
        name VARCHAR NOT NULL,
        description TEXT NOT NULL,
        max_score INTEGER NOT NULL,
        weight FLOAT NOT NULL,
        created_at DATETIME,
        updated_at DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS debate_scores (
        score_id VARCHAR NOT NULL PRIMARY KEY,
        debate_id VARCHAR NOT NULL REFERENCES debates (debate_id),
        judge_id VARCHAR NOT NULL REFERENCES debate_participants (participant_id),
        verdict_summary TEXT,
        winner_side VARCHAR,
        created_at DATETIME,
        updated_at DATETIME,
        CONSTRAINT unique_judge_score UNIQUE (debate_id, judge_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS criteria_scores (
        criteria_score_id VARCHAR NOT NULL PRIMARY KEY,
        score_id VARCHAR NOT NULL REFERENCES debate_scores (score_id),
        criteria_id VARCHAR NOT NULL REFERENCES scoring_criteria (criteria_id),
        score_value INTEGER NOT NULL,
        comment TEXT,
        CONSTRAINT unique_criteria_score UNIQUE (score_id, criteria_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS debate_checkpoints (
        checkpoint_id VARCHAR NOT NULL PRIMARY KEY,
        debate_id VARCHAR NOT NULL REFERENCES debates (debate_id),
        last_turn_id VARCHAR NOT NULL REFERENCES debate_turns (turn_id),
        checkpoint_data TEXT NOT NULL,
        created_at DATETIME
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS llm_memory (
        memory_id VARCHAR NOT NULL PRIMARY KEY,
        participant_id VARCHAR NOT NULL REFERENCES debate_participants (participant_id),
        debate_id VARCHAR NOT NULL REFERENCES debates (debate_id),
        memory_key VARCHAR NOT NULL,
        memory_value TEXT NOT NULL,
        created_at DATETIME,
        updated_at DATETIME,
        CONSTRAINT unique_memory_key UNIQUE (participant_id, debate_id, memory_key)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS seed_revisions (
        revision VARCHAR NOT NULL PRIMARY KEY,
        down_revision VARCHAR,
        applied_at DATETIME NOT NULL
    )
    "#,
];

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_llm_config ON users(llm_config_id)",
    "CREATE INDEX IF NOT EXISTS idx_format_phases_format \
     ON debate_format_phases(format_id, sequence)",
    "CREATE INDEX IF NOT EXISTS idx_debates_moderator ON debates(moderator_id)",
    "CREATE INDEX IF NOT EXISTS idx_debates_status ON debates(status)",
    "CREATE INDEX IF NOT EXISTS idx_participants_user ON debate_participants(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_turns_participant ON debate_turns(participant_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_debate ON moderator_comments(debate_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_turn ON moderator_comments(turn_id)",
    "CREATE INDEX IF NOT EXISTS idx_scores_judge ON debate_scores(judge_id)",
    "CREATE INDEX IF NOT EXISTS idx_checkpoints_debate \
     ON debate_checkpoints(debate_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_memory_debate ON llm_memory(debate_id)",
];

/// Create every table and index that does not exist yet.
pub async fn create_all(db: &Database) -> Result<(), DbError> {
    tracing::info!("Creating debate schema...");

    let mut session = db.session().await?;
    let mut tx = session.begin().await?;
    for ddl in CREATE_TABLES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    for ddl in CREATE_INDEXES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(tables = TABLES.len(), "Debate schema ready");
    Ok(())
}

/// Drop every table, children first.
pub async fn drop_all(db: &Database) -> Result<(), DbError> {
    let mut session = db.session().await?;
    let mut tx = session.begin().await?;
    for table in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(&mut *tx)
            .await?;
        tracing::debug!(table, "Dropped table");
    }
    tx.commit().await?;

    tracing::warn!("Debate schema dropped");
    Ok(())
}

/// Row count for one of [`TABLES`].
pub async fn count_rows(db: &Database, table: &str) -> Result<i64, DbError> {
    let mut session = db.session().await?;
    count_rows_on(&mut session, table).await
}

/// [`count_rows`] on a connection the caller already holds
pub(crate) async fn count_rows_on(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<i64, DbError> {
    if !TABLES.contains(&table) {
        return Err(DbError::not_found("table", table));
    }

    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
