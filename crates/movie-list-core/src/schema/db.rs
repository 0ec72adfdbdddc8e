use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

use super::migrations::MIGRATIONS;
use super::session::Session;

/// How long a connection waits on a lock held by another invocation.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A database connection. All reads and writes go through a [`Session`].
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Cascading deletes depend on this; it is per connection in SQLite.
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a scoped session.
    ///
    /// The session rolls back when dropped unless [`Session::commit`] was
    /// called.
    pub fn session(&mut self) -> Result<Session<'_>> {
        let tx = self.conn.transaction()?;
        Ok(Session::new(tx))
    }

    /// Run `f` inside a session, committing if it returns `Ok` and rolling
    /// back on every other exit path.
    pub fn with_session<T, E, F>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Session<'_>) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let session = self.session()?;
        let value = f(&session)?;
        session.commit()?;
        Ok(value)
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let enabled: i64 = db
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_reopen_does_not_reapply_migrations() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lists.db");

        drop(Database::open(&path).unwrap());
        let db = Database::open(&path).unwrap();

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_with_session_commits_on_ok() {
        let mut db = Database::open_in_memory().unwrap();
        db.with_session(|s| s.find_or_create_list("movies").map(|_| ()))
            .unwrap();

        let lists = db.with_session(|s| s.lists()).unwrap();
        assert_eq!(lists.len(), 1);
    }

    #[test]
    fn test_with_session_rolls_back_on_err() {
        let mut db = Database::open_in_memory().unwrap();
        let result: Result<()> = db.with_session(|s| {
            s.find_or_create_list("movies")?;
            Err(Error::InvalidData("abort".to_string()))
        });
        assert!(result.is_err());

        let lists = db.with_session(|s| s.lists()).unwrap();
        assert!(lists.is_empty());
    }

    #[test]
    fn test_dropped_session_rolls_back() {
        let mut db = Database::open_in_memory().unwrap();
        {
            let session = db.session().unwrap();
            session.find_or_create_list("movies").unwrap();
        }

        let lists = db.with_session(|s| s.lists()).unwrap();
        assert!(lists.is_empty());
    }
}
