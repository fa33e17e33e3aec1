//! SQLite-backed session storage

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::SessionStore;
use crate::error::StorageError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, StorageError>;

/// Session entries in a single-table SQLite database.
///
/// Several `eatit` processes may share one file; each operation is a single
/// statement, so SQLite's own locking keeps them consistent.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store at the default data location
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::default_path()?)
    }

    /// Default database path (`~/.local/share/eatit/session.db` on Linux)
    pub fn default_path() -> Result<PathBuf> {
        let data_base = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(data_base.join("eatit").join("session.db"))
    }

    /// Open or create the store at a specific file
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::Io(format!("Failed to create data dir: {}", e)))?;
        }

        let conn = Connection::open(path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Session store schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(path)
                .map_err(|e| StorageError::Io(format!("Failed to remove session DB: {}", e)))?;
            return Self::open_at(path);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS session_entries (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        // The token is a credential; keep the file private on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let restrict = || -> std::io::Result<()> {
                let mut perms = std::fs::metadata(path)?.permissions();
                perms.set_mode(0o600);
                std::fs::set_permissions(path, perms)
            };
            restrict().map_err(|e| {
                StorageError::Io(format!("Failed to set session DB permissions: {}", e))
            })?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM session_entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO session_entries (key, value, updated_at)
             VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM session_entries WHERE key = ?1", [key])?;
        Ok(())
    }
}
