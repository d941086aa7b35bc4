//! Persistent question history.
//!
//! Recent questions live in a small SQLite key-value table under the key
//! `question_history`, stored as a JSON array oldest-first. The store uses
//! WAL mode so several CLI invocations can share it.
//!
//! The database path is `ACTIVITY_QA_DB_PATH` when set, otherwise
//! `history.db` in the per-user data directory.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::warn;

use crate::utils::data_dir;

/// Questions kept after each push
pub const HISTORY_LIMIT: usize = 10;

const HISTORY_KEY: &str = "question_history";

/// Value stored under a key, with the time it was last written
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub value: String,
    pub updated_at: Option<i64>,
}

/// Get the database file path
///
/// Checks `ACTIVITY_QA_DB_PATH` environment variable first,
/// falls back to `<data dir>/history.db`
pub fn db_path() -> Result<PathBuf> {
    if let Ok(custom_path) = env::var("ACTIVITY_QA_DB_PATH") {
        return Ok(PathBuf::from(custom_path));
    }
    let dir = data_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir: {}", dir.display()))?;
    }
    Ok(dir.join("history.db"))
}

/// Open database connection with WAL mode and retry logic
///
/// Retries "database locked" errors with a growing delay.
pub fn open_db(path: &Path) -> Result<Connection> {
    let mut attempts = 0;
    let max_attempts = 3;

    loop {
        match Connection::open(path) {
            Ok(conn) => {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "busy_timeout", 5000)?;
                init_schema(&conn)?;
                return Ok(conn);
            }
            Err(e) if e.to_string().contains("locked") && attempts < max_attempts => {
                attempts += 1;
                thread::sleep(Duration::from_millis(100 * attempts));
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open history db: {}", path.display()));
            }
        }
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER
        );
        INSERT OR IGNORE INTO metadata (key, value) VALUES ('schema_version', '1');",
    )?;
    Ok(())
}

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<StoredValue>> {
    let mut stmt = conn.prepare("SELECT value, updated_at FROM metadata WHERE key = ?1")?;
    let result = stmt
        .query_row(params![key], |row| {
            Ok(StoredValue {
                value: row.get(0)?,
                updated_at: row.get(1)?,
            })
        })
        .optional()?;
    Ok(result)
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO metadata (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().timestamp()],
    )?;
    Ok(())
}

/// Move `question` to the newest position and keep the last `limit` entries.
pub fn push_question(history: &mut Vec<String>, question: &str, limit: usize) {
    history.retain(|q| q != question);
    history.push(question.to_string());
    if history.len() > limit {
        let excess = history.len() - limit;
        history.drain(..excess);
    }
}

/// Question history backed by one SQLite file
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Open the store at [`db_path`]
    pub fn open_default() -> Result<Self> {
        Self::open(&db_path()?)
    }

    /// Stored questions, oldest first. A corrupt value reads as empty.
    pub fn load(&self) -> Result<Vec<String>> {
        let Some(stored) = get_value(&self.conn, HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&stored.value) {
            Ok(list) => Ok(list),
            Err(e) => {
                warn!(error = %e, "question history is corrupt; starting fresh");
                Ok(Vec::new())
            }
        }
    }

    /// Questions for display, most recent first
    pub fn recent(&self) -> Result<Vec<String>> {
        let mut list = self.load()?;
        list.reverse();
        Ok(list)
    }

    pub fn push(&self, question: &str) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(());
        }
        let mut list = self.load()?;
        push_question(&mut list, question, HISTORY_LIMIT);
        let json = serde_json::to_string(&list)?;
        set_value(&self.conn, HISTORY_KEY, &json)
    }
}
