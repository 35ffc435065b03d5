//! SQLite storage backend implementation
//!
//! One connection is opened per run and shared by the history lookup and
//! the final inserts. The four inserts for a submission run in a single
//! transaction; dropping an uncommitted transaction rolls it back.

use crate::error::Result;
use crate::storage::{schema, StorageBackend, TableCounts};
use crate::types::{NewSubmission, SubmissionId, SubmissionReceipt};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (creating if missing) the database at `path` and migrate it
    ///
    /// # Example
    /// ```ignore
    /// let storage = SqliteStorage::open("/home/me/agllmdatabase.db")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening SQLite database: {}", path.display());

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Self::from_connection(conn)
    }

    /// Private in-memory database, for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(30))?;
        conn.pragma_update(None, "foreign_keys", true)?;
        schema::migrate(&mut conn)?;

        Ok(Self { conn })
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Row counts of the four feedback tables
    pub fn table_counts(&self) -> Result<TableCounts> {
        let count = |table: &str| -> Result<i64> {
            Ok(self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?)
        };

        Ok(TableCounts {
            submissions: count("submissions")?,
            code_files: count("code_files")?,
            autograder_outputs: count("autograder_outputs")?,
            feedback: count("feedback")?,
        })
    }

    /// Close the connection, surfacing any error from SQLite
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        debug!("SQLite connection closed");
        Ok(())
    }
}

impl StorageBackend for SqliteStorage {
    fn recent_teacher_comments(&self, repo_name: &str, limit: usize) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT teacher_comments
              FROM feedback
             WHERE repo_name = ?1
               AND reviewed = 1
          ORDER BY reviewed_at DESC
             LIMIT ?2
            "#,
        )?;

        // The limit applies to reviewed rows; blank comments drop out afterwards
        let rows = stmt
            .query_map(params![repo_name, limit as i64], |row| {
                row.get::<_, Option<String>>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|comment| comment.filter(|c| !c.is_empty()))
            .collect())
    }

    fn record_submission(&mut self, submission: &NewSubmission<'_>) -> Result<SubmissionReceipt> {
        debug!(
            "Recording submission for {} ({} file(s))",
            submission.repo_name,
            submission.bundle.len()
        );

        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO submissions (student_repo, assignment_id, code, submitted_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                submission.repo_name,
                submission.assignment_id,
                submission.bundle.blob(),
                submission.timestamp,
            ],
        )?;
        let submission_id = SubmissionId(tx.last_insert_rowid());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO code_files (submission_id, filename, code) VALUES (?1, ?2, ?3)",
            )?;
            for file in &submission.bundle.files {
                stmt.execute(params![submission_id.0, file.relative_path, file.content])?;
            }
        }

        tx.execute(
            r#"
            INSERT INTO autograder_outputs (submission_id, output, generated_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![
                submission_id.0,
                submission.autograder_output,
                submission.timestamp,
            ],
        )?;

        tx.execute(
            r#"
            INSERT INTO feedback (submission_id, repo_name, feedback_text, generated_at, reviewed)
            VALUES (?1, ?2, ?3, ?4, 0)
            "#,
            params![
                submission_id.0,
                submission.repo_name,
                submission.feedback_text,
                submission.timestamp,
            ],
        )?;
        let feedback_id = tx.last_insert_rowid();

        tx.commit()?;

        info!("Stored submission {} for {}", submission_id, submission.repo_name);
        Ok(SubmissionReceipt {
            submission_id,
            feedback_id,
            file_count: submission.bundle.len(),
        })
    }
}
