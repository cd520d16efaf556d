//! Order ledger persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Load the persisted global order once at startup.
//! - Overwrite the single order record after each ledger mutation.
//!
//! # Invariants
//! - At most one row exists in `order_ledger` (`id = 1`).
//! - The record holds a JSON array of id strings.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::item::ItemId;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from order persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted record cannot be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "order repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted order: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
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

/// Persistence interface for the global order.
pub trait OrderRepository {
    /// Loads the persisted order, `None` when nothing was ever saved.
    fn load_order(&self) -> RepoResult<Option<Vec<ItemId>>>;
    /// Overwrites the persisted order.
    fn save_order(&self, ids: &[ItemId]) -> RepoResult<()>;
}

/// SQLite-backed order repository.
///
/// Owns its connection so the ledger can live in long-lived server state.
pub struct SqliteOrderRepository {
    conn: Connection,
}

impl SqliteOrderRepository {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_order_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl OrderRepository for SqliteOrderRepository {
    fn load_order(&self) -> RepoResult<Option<Vec<ItemId>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT ids_json
                 FROM order_ledger
                 WHERE id = 1;",
                [],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|text| {
            serde_json::from_str::<Vec<ItemId>>(&text).map_err(|err| {
                RepoError::InvalidData(format!("order_ledger.ids_json is not a string array: {err}"))
            })
        })
        .transpose()
    }

    fn save_order(&self, ids: &[ItemId]) -> RepoResult<()> {
        let encoded = serde_json::to_string(ids)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode order: {err}")))?;
        self.conn.execute(
            "INSERT INTO order_ledger (id, ids_json, updated_at)
             VALUES (1, ?1, (strftime('%s', 'now') * 1000))
             ON CONFLICT(id) DO UPDATE SET
                ids_json = excluded.ids_json,
                updated_at = excluded.updated_at;",
            params![encoded],
        )?;
        Ok(())
    }
}

fn ensure_order_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
