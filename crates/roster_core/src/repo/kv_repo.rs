//! Key-value repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-value get/set/remove over string keys.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `set_item` replaces the full value for a key.
//! - `remove_items` deletes all requested keys in one transaction.

use crate::db::DbError;
use crate::model::entry::EntryValidationError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document persistence and decoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Entry failed invariants on a read or write path.
    Validation(EntryValidationError),
    /// Document could not be encoded to JSON.
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    /// Persisted document is corrupt or has an unexpected shape.
    InvalidData(String),
    /// A write could not be read back.
    VerifyFailed(&'static str),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Encode { key, source } => {
                write!(f, "failed to encode document `{key}`: {source}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::VerifyFailed(key) => {
                write!(f, "failed to verify saved document `{key}`")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Encode { source, .. } => Some(source),
            Self::InvalidData(_) | Self::VerifyFailed(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for raw key-value documents.
pub trait KeyValueRepository {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes the given keys and returns how many existed.
    fn remove_items(&self, keys: &[&str]) -> RepoResult<usize>;
    /// Returns stored keys sorted ascending.
    fn list_keys(&self) -> RepoResult<Vec<String>>;
}

impl<T: KeyValueRepository + ?Sized> KeyValueRepository for &T {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_items(&self, keys: &[&str]) -> RepoResult<usize> {
        (**self).remove_items(keys)
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        (**self).list_keys()
    }
}

/// SQLite-backed key-value repository over `kv_store`.
pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_store'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("kv_store"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        for key in keys {
            removed += tx.execute("DELETE FROM kv_store WHERE key = ?1;", [*key])?;
        }
        tx.commit()?;
        Ok(removed)
    }

    fn list_keys(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_store ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}
