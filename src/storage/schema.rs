//! Schema migrations for the feedback database
//!
//! Migrations are applied in order inside one transaction and tracked with
//! SQLite's `user_version` pragma. Tables use `IF NOT EXISTS` so databases
//! created by older deployments (which had no version stamp) are adopted
//! rather than rejected.

use crate::error::{AgllmError, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Ordered migrations; index + 1 is the schema version after applying
const MIGRATIONS: &[&str] = &[
    // 1: initial schema
    r#"
    CREATE TABLE IF NOT EXISTS submissions (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        student_repo  TEXT    NOT NULL,
        assignment_id INTEGER NOT NULL,
        code          TEXT    NOT NULL,
        submitted_at  TEXT    NOT NULL
    );

    CREATE TABLE IF NOT EXISTS code_files (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        submission_id INTEGER NOT NULL REFERENCES submissions(id),
        filename      TEXT    NOT NULL,
        code          TEXT    NOT NULL
    );

    CREATE TABLE IF NOT EXISTS autograder_outputs (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        submission_id INTEGER NOT NULL REFERENCES submissions(id),
        output        TEXT    NOT NULL,
        generated_at  TEXT    NOT NULL
    );

    CREATE TABLE IF NOT EXISTS feedback (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        submission_id    INTEGER NOT NULL REFERENCES submissions(id),
        repo_name        TEXT    NOT NULL,
        feedback_text    TEXT    NOT NULL,
        generated_at     TEXT    NOT NULL,
        reviewed         INTEGER NOT NULL DEFAULT 0,
        teacher_comments TEXT,
        reviewed_at      TEXT
    );
    "#,
    // 2: history lookup index
    r#"
    CREATE INDEX IF NOT EXISTS idx_feedback_repo_reviewed
        ON feedback (repo_name, reviewed, reviewed_at);

    CREATE INDEX IF NOT EXISTS idx_code_files_submission
        ON code_files (submission_id);
    "#,
];

/// Latest schema version known to this build
pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

/// Current `user_version` of the database
pub fn current_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Bring the schema up to [`latest_version`]
///
/// Returns the number of migrations applied.
pub fn migrate(conn: &mut Connection) -> Result<usize> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(AgllmError::Config(format!(
            "Database schema version {} is newer than supported version {}",
            current, latest
        )));
    }

    if current == latest {
        debug!("Database schema is current (version {})", current);
        return Ok(0);
    }

    info!("Migrating database schema from version {} to {}", current, latest);

    let tx = conn.transaction()?;
    for (index, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        debug!("Applying migration {}", index + 1);
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", latest)?;
    tx.commit()?;

    Ok((latest - current) as usize)
}
