//! `stockbook-store` — SQLite-backed persistence.
//!
//! One single-file database in WAL journal mode: readers are never blocked
//! by reads, and there is one active writer at a time. All identifiers are
//! stored as their text form; timestamps as UTC text via chrono.
//!
//! Multi-row writes (request creation) run inside a transaction; status
//! transitions are guarded by the previously observed status so racing
//! writers cannot both succeed from the same source state.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use stockbook_core::{Error, Result};

pub mod catalog;
pub mod ledger;
pub mod procurement;
pub mod schema;
pub mod snapshot;

pub use snapshot::{ProductDetail, RequestDetail, RequestItemDetail, Snapshot};

/// Handle to the persistent store.
///
/// Explicitly owned and passed around; opened once at process start, no
/// module-level singletons. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the single-file database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("open", e))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Open an in-memory database for tests.
    ///
    /// Pinned to a single connection: each SQLite in-memory connection is
    /// its own database, so a larger pool would see different data per
    /// checkout.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| map_sqlx_error("open_in_memory", e))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("open_in_memory", e))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        tracing::debug!("schema ensured");
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Map a sqlx failure onto the shared taxonomy.
///
/// Unique violations become `Conflict` (duplicate barcode/name/email);
/// everything else that reaches this point is an unexpected store failure.
pub(crate) fn map_sqlx_error(op: &'static str, err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::RowNotFound => Error::not_found(op),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::conflict(format!("{op}: {}", db.message()))
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            Error::validation(format!("{op}: {}", db.message()))
        }
        _ => Error::internal(format!("{op}: {err}")),
    }
}

/// Read a column, folding decode failures into `Internal`.
pub(crate) fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| Error::internal(format!("column {name}: {e}")))
}

/// Read a text column and parse it into a typed value.
pub(crate) fn parsed_column<T>(row: &SqliteRow, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    let raw: String = column(row, name)?;
    raw.parse()
        .map_err(|e| Error::internal(format!("column {name}: {e}")))
}

/// Read an optional text column and parse it when present.
pub(crate) fn parsed_column_opt<T>(row: &SqliteRow, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    let raw: Option<String> = column(row, name)?;
    raw.map(|s| {
        s.parse()
            .map_err(|e| Error::internal(format!("column {name}: {e}")))
    })
    .transpose()
}
