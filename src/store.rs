use crate::app_dirs::AppDirs;
use crate::error::{NoDataDirSnafu, SqliteSnafu, StoreDirSnafu, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use snafu::{OptionExt, ResultExt};
use std::path::Path;

/// Flat string key-value storage; every write is immediately durable.
pub trait KvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
    /// All keys in first-insertion order
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// SQLite-backed store, one row per key
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at the default state location
    pub fn open_default() -> StoreResult<Self> {
        let path = AppDirs::db_path().context(NoDataDirSnafu)?;
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context(StoreDirSnafu)?;
            }
        }

        let conn = Connection::open(path).context(SqliteSnafu)?;
        Self::init(conn)
    }

    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().context(SqliteSnafu)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            "#,
            [],
        )
        .context(SqliteSnafu)?;

        Ok(Self { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .context(SqliteSnafu)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        // upsert keeps the original rowid, and with it the enumeration order
        self.conn
            .execute(
                r#"
                INSERT INTO kv (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
                params![key, value],
            )
            .context(SqliteSnafu)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .context(SqliteSnafu)?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv ORDER BY rowid")
            .context(SqliteSnafu)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context(SqliteSnafu)?
            .collect::<Result<Vec<_>, _>>()
            .context(SqliteSnafu)?;
        Ok(keys)
    }
}

/// In-process store for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Vec<(String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.retain(|(k, _)| k != key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.iter().map(|(k, _)| k.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn exercise(store: &mut dyn KvStore) {
        assert_eq!(store.get("a").unwrap(), None);

        store.set("b", "1").unwrap();
        store.set("a", "2").unwrap();
        store.set("b", "3").unwrap();
        assert_eq!(store.get("b").unwrap(), Some("3".to_string()));
        assert_eq!(store.keys().unwrap(), vec!["b", "a"]);

        store.remove("b").unwrap();
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.keys().unwrap(), vec!["a"]);

        // removing a missing key is fine
        store.remove("zzz").unwrap();
    }

    #[test]
    fn memory_store_semantics() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn sqlite_store_semantics() {
        exercise(&mut SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sessions.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.set("session:Default", "[]").unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("session:Default").unwrap(),
            Some("[]".to_string())
        );
    }
}
