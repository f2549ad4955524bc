// SQLite persistence for role tokens and in-progress answer drafts.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{AnswerEntry, Role};

/// Local store for the acting roles' bearer tokens and for answers typed
/// during an active test that the server has not yet accepted.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS tokens (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS answer_drafts (
                test_id     TEXT NOT NULL,
                question_id TEXT NOT NULL,
                answer      TEXT NOT NULL,
                position    INTEGER NOT NULL,
                updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (test_id, question_id)
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // -- tokens ------------------------------------------------------------

    pub fn save_token(&self, role: Role, token: &str) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO tokens (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![role.token_key(), token],
            )
            .with_context(|| format!("failed to save {}", role.token_key()))?;
        Ok(())
    }

    pub fn load_token(&self, role: Role) -> Result<Option<String>> {
        self.conn()
            .query_row(
                "SELECT value FROM tokens WHERE key = ?1",
                params![role.token_key()],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to load {}", role.token_key()))
    }

    pub fn delete_token(&self, role: Role) -> Result<()> {
        self.conn()
            .execute(
                "DELETE FROM tokens WHERE key = ?1",
                params![role.token_key()],
            )
            .with_context(|| format!("failed to delete {}", role.token_key()))?;
        Ok(())
    }

    // -- answer drafts -----------------------------------------------------

    /// Replace the stored draft for `test_id` with `answers`, keeping their
    /// order.
    pub fn save_drafts(&self, test_id: &str, answers: &[AnswerEntry]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin draft save")?;
        tx.execute(
            "DELETE FROM answer_drafts WHERE test_id = ?1",
            params![test_id],
        )?;
        for (position, entry) in answers.iter().enumerate() {
            tx.execute(
                "INSERT INTO answer_drafts (test_id, question_id, answer, position)
                 VALUES (?1, ?2, ?3, ?4)",
                params![test_id, entry.question_id, entry.answer, position as i64],
            )?;
        }
        tx.commit().context("failed to commit answer drafts")?;
        Ok(())
    }

    pub fn load_drafts(&self, test_id: &str) -> Result<Vec<AnswerEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT question_id, answer FROM answer_drafts
             WHERE test_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![test_id], |row| {
                Ok(AnswerEntry {
                    question_id: row.get(0)?,
                    answer: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to read answer drafts")?;
        Ok(rows)
    }

    pub fn clear_drafts(&self, test_id: &str) -> Result<()> {
        self.conn()
            .execute(
                "DELETE FROM answer_drafts WHERE test_id = ?1",
                params![test_id],
            )
            .context("failed to clear answer drafts")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open(":memory:").unwrap()
    }

    #[test]
    fn token_roundtrip_per_role() {
        let db = db();
        assert_eq!(db.load_token(Role::Student).unwrap(), None);

        db.save_token(Role::Student, "stu").unwrap();
        db.save_token(Role::Admin, "adm").unwrap();
        assert_eq!(db.load_token(Role::Student).unwrap().as_deref(), Some("stu"));
        assert_eq!(db.load_token(Role::Admin).unwrap().as_deref(), Some("adm"));
        assert_eq!(db.load_token(Role::Teacher).unwrap(), None);
    }

    #[test]
    fn saving_token_overwrites_previous() {
        let db = db();
        db.save_token(Role::Teacher, "old").unwrap();
        db.save_token(Role::Teacher, "new").unwrap();
        assert_eq!(db.load_token(Role::Teacher).unwrap().as_deref(), Some("new"));

        db.delete_token(Role::Teacher).unwrap();
        assert_eq!(db.load_token(Role::Teacher).unwrap(), None);
    }

    #[test]
    fn drafts_keep_order_and_are_scoped_to_test() {
        let db = db();
        let answers = vec![AnswerEntry::new("q2", "b"), AnswerEntry::new("q1", "a")];
        db.save_drafts("t1", &answers).unwrap();
        db.save_drafts("t2", &[AnswerEntry::new("q9", "z")]).unwrap();

        assert_eq!(db.load_drafts("t1").unwrap(), answers);
        assert_eq!(db.load_drafts("t2").unwrap().len(), 1);
    }

    #[test]
    fn saving_drafts_replaces_previous_set() {
        let db = db();
        db.save_drafts("t1", &[AnswerEntry::new("q1", "a"), AnswerEntry::new("q2", "b")])
            .unwrap();
        db.save_drafts("t1", &[AnswerEntry::new("q1", "changed")])
            .unwrap();

        assert_eq!(
            db.load_drafts("t1").unwrap(),
            vec![AnswerEntry::new("q1", "changed")]
        );
    }

    #[test]
    fn clear_drafts_only_touches_one_test() {
        let db = db();
        db.save_drafts("t1", &[AnswerEntry::new("q1", "a")]).unwrap();
        db.save_drafts("t2", &[AnswerEntry::new("q1", "a")]).unwrap();

        db.clear_drafts("t1").unwrap();
        assert!(db.load_drafts("t1").unwrap().is_empty());
        assert_eq!(db.load_drafts("t2").unwrap().len(), 1);
    }
}
