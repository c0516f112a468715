//! SQLite-backed key-value store
//!
//! One `kv` table holding the whole namespace, so values survive between CLI
//! invocations the way browser local storage survives page loads.

use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::StoreError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, StoreError>;

/// Persistent store in a single SQLite file
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store at the default location
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::default_path()?)
    }

    /// Default database path (~/.cache/vidhub/storage.db on Linux)
    pub fn default_path() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(StoreError::NoHome)?;
        Ok(cache_base.join("vidhub").join("storage.db"))
    }

    /// Open or create the store at a specific database file
    pub fn open_at(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("Failed to create store dir: {}", e)))?;
        }

        let conn = Connection::open(db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Store schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(db_path)
                .map_err(|e| StoreError::Io(format!("Failed to remove store DB: {}", e)))?;
            return Self::open_at(db_path);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: db_path.to_path_buf(),
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn()?.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open_at(&dir.path().join("storage.db")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_set_get() {
        let (store, _dir) = test_store();
        store.set("user", r#"{"id":1}"#).unwrap();
        assert_eq!(store.get("user").unwrap(), Some(r#"{"id":1}"#.to_string()));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn test_replace_and_remove() {
        let (store, _dir) = test_store();
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_keys_sorted() {
        let (store, _dir) = test_store();
        store.set("video_platform_cache_videos", "{}").unwrap();
        store.set("user", "{}").unwrap();
        assert_eq!(
            store.keys().unwrap(),
            vec!["user".to_string(), "video_platform_cache_videos".to_string()]
        );
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.db");
        {
            let store = SqliteStore::open_at(&path).unwrap();
            store.set("k", "v").unwrap();
        }
        let store = SqliteStore::open_at(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_schema_mismatch_rebuilds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.db");
        {
            let store = SqliteStore::open_at(&path).unwrap();
            store.set("k", "v").unwrap();
            store
                .conn()
                .unwrap()
                .pragma_update(None, "user_version", 99)
                .unwrap();
        }
        let store = SqliteStore::open_at(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
