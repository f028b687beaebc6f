use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::AppError;
use crate::records::{FeedbackRecord, InteractionRecord, NewFeedback, NewInteraction};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS query_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        function_type TEXT NOT NULL,
        style TEXT NOT NULL,
        query TEXT NOT NULL,
        response TEXT NOT NULL,
        processing_time REAL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_feedback (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        query_history_id INTEGER REFERENCES query_history(id) ON DELETE CASCADE,
        function_type TEXT NOT NULL,
        query TEXT NOT NULL,
        response TEXT NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        suggestions TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_user_feedback_function ON user_feedback(function_type);
"#;

/// SQLite-backed store for the HTTP front end. Append-only: rows are never
/// updated or deleted by the application.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!("Opened query store at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))
    }

    pub fn insert_interaction(&self, new: &NewInteraction) -> Result<InteractionRecord, AppError> {
        let created_at = Utc::now();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO query_history (function_type, style, query, response, processing_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &new.function_type,
                &new.style,
                &new.query,
                &new.response,
                new.processing_time,
                created_at
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Stored interaction {} ({}/{})", id, new.function_type, new.style);

        Ok(InteractionRecord {
            id,
            function_type: new.function_type.clone(),
            style: new.style.clone(),
            query: new.query.clone(),
            response: new.response.clone(),
            processing_time: new.processing_time,
            created_at,
        })
    }

    pub fn get_interaction(&self, id: i64) -> Result<Option<InteractionRecord>, AppError> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT id, function_type, style, query, response, processing_time, created_at
                 FROM query_history WHERE id = ?1",
                params![id],
                interaction_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Newest first. Ids are monotonic since rows are never deleted.
    pub fn list_interactions(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<InteractionRecord>, AppError> {
        // SQLite reads a negative OFFSET as 0, so anything past i64 is simply empty
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(Vec::new());
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, function_type, style, query, response, processing_time, created_at
             FROM query_history
             ORDER BY id DESC
             LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit, offset], interaction_from_row)?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn count_interactions(&self) -> Result<usize, AppError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM query_history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn insert_feedback(&self, new: &NewFeedback) -> Result<FeedbackRecord, AppError> {
        let created_at = Utc::now();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO user_feedback (query_history_id, function_type, query, response, rating, suggestions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.query_id,
                &new.function_type,
                &new.query,
                &new.response,
                new.rating,
                &new.suggestions,
                created_at
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("Stored feedback {} (rating {})", id, new.rating);

        Ok(FeedbackRecord {
            id,
            query_id: new.query_id,
            function_type: new.function_type.clone(),
            query: new.query.clone(),
            response: new.response.clone(),
            rating: new.rating,
            suggestions: new.suggestions.clone(),
            created_at,
        })
    }

    pub fn get_feedback(&self, id: i64) -> Result<Option<FeedbackRecord>, AppError> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT id, query_history_id, function_type, query, response, rating, suggestions, created_at
                 FROM user_feedback WHERE id = ?1",
                params![id],
                feedback_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Newest first.
    pub fn all_feedback(&self) -> Result<Vec<FeedbackRecord>, AppError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, query_history_id, function_type, query, response, rating, suggestions, created_at
             FROM user_feedback
             ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], feedback_from_row)?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn interaction_from_row(row: &Row<'_>) -> rusqlite::Result<InteractionRecord> {
    Ok(InteractionRecord {
        id: row.get(0)?,
        function_type: row.get(1)?,
        style: row.get(2)?,
        query: row.get(3)?,
        response: row.get(4)?,
        processing_time: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    Ok(FeedbackRecord {
        id: row.get(0)?,
        query_id: row.get(1)?,
        function_type: row.get(2)?,
        query: row.get(3)?,
        response: row.get(4)?,
        rating: row.get(5)?,
        suggestions: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(query: &str) -> NewInteraction {
        NewInteraction {
            function_type: "question_answering".to_string(),
            style: "factual".to_string(),
            query: query.to_string(),
            response: "answer".to_string(),
            processing_time: Some(0.25),
        }
    }

    #[test]
    fn test_interaction_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let stored = store.insert_interaction(&interaction("What is osmosis?")).unwrap();
        let loaded = store.get_interaction(stored.id).unwrap().unwrap();
        assert_eq!(stored, loaded);
        assert!(store.get_interaction(stored.id + 100).unwrap().is_none());
    }

    #[test]
    fn test_list_is_newest_first_and_paged() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 0..5 {
            store.insert_interaction(&interaction(&format!("q{}", i))).unwrap();
        }
        assert_eq!(store.count_interactions().unwrap(), 5);

        let first = store.list_interactions(0, 2).unwrap();
        assert_eq!(
            first.iter().map(|r| r.query.as_str()).collect::<Vec<_>>(),
            vec!["q4", "q3"]
        );
        let last = store.list_interactions(4, 2).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].query, "q0");
        assert!(store.list_interactions(10, 2).unwrap().is_empty());
    }

    #[test]
    fn test_offset_beyond_i64_is_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 0..3 {
            store.insert_interaction(&interaction(&format!("q{}", i))).unwrap();
        }
        assert!(store.list_interactions(usize::MAX, 10).unwrap().is_empty());
        assert!(store
            .list_interactions(i64::MAX as usize + 1, 10)
            .unwrap()
            .is_empty());
        assert_eq!(store.list_interactions(0, usize::MAX).unwrap().len(), 3);
    }

    #[test]
    fn test_null_processing_time() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut new = interaction("q");
        new.processing_time = None;
        let stored = store.insert_interaction(&new).unwrap();
        assert_eq!(store.get_interaction(stored.id).unwrap().unwrap().processing_time, None);
    }

    #[test]
    fn test_feedback_linked_to_interaction() {
        let store = SqliteStore::open_in_memory().unwrap();
        let interaction = store.insert_interaction(&interaction("q")).unwrap();
        let fb = NewFeedback::new("question_answering", "q", "answer", 4, "shorter please")
            .unwrap()
            .with_query_id(interaction.id);
        let stored = store.insert_feedback(&fb).unwrap();
        let loaded = store.get_feedback(stored.id).unwrap().unwrap();
        assert_eq!(stored, loaded);
        assert_eq!(loaded.query_id, Some(interaction.id));
    }

    #[test]
    fn test_feedback_with_dangling_link_is_refused() {
        let store = SqliteStore::open_in_memory().unwrap();
        let fb = NewFeedback::new("question_answering", "q", "a", 3, "")
            .unwrap()
            .with_query_id(999);
        assert!(store.insert_feedback(&fb).is_err());
        assert!(store.all_feedback().unwrap().is_empty());
    }
}
