//! SQLite bootstrap for the durable task slot.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteSlotRepository`.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Slots must not be read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Why a task database could not be opened or queried.
#[derive(Debug)]
pub enum DbError {
    /// Connecting failed before any schema work ran.
    Connect {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// A statement failed on an open connection.
    Query(rusqlite::Error),
    /// `user_version` is ahead of every migration this build ships, so the
    /// file was written by a newer build and is left untouched.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect { mode, source } => {
                write!(f, "cannot open {mode} task database: {source}")
            }
            Self::Query(err) => write!(f, "task database query failed: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "task database uses schema {found}, this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Query(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}
