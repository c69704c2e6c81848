use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;
use crate::model::PerformerType;

use super::ddl::{REQUIRED_TABLES, SCHEMA_SQL};
use super::functions::register_functions;

/// What [`ensure_schema`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Every required table was already present; nothing was executed.
    AlreadyPresent,
    /// At least one table was missing and the schema script was run.
    Created,
}

/// A handle on the catalog store.
///
/// The handle owns its connection; dropping it closes the store. Components
/// receive it explicitly, there is no process-wide connection.
#[derive(Debug)]
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open (or create) a store at the given path and ensure the schema.
    ///
    /// The parent directory is created when missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                log::info!("Created store directory {}", parent.display());
            }
        }

        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(&conn)?;
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Names of the required tables absent from the store, in declaration order.
pub fn missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")?;

    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        let found: Option<String> = stmt
            .query_row([*table], |row| row.get(0))
            .optional()?;
        if found.is_none() {
            missing.push(*table);
        }
    }
    Ok(missing)
}

/// Make sure every catalog table exists.
///
/// When all required tables are present this is a no-op. Otherwise the full
/// schema script runs; it only creates what is missing, so a partially
/// initialised store is completed without touching existing rows. The
/// `types` seed rows are inserted if absent.
pub fn ensure_schema(conn: &Connection) -> Result<SchemaAction> {
    let missing = missing_tables(conn)?;
    if missing.is_empty() {
        log::debug!("Schema already complete");
        return Ok(SchemaAction::AlreadyPresent);
    }

    log::info!("Creating missing tables: {}", missing.join(", "));
    conn.execute_batch(SCHEMA_SQL)?;

    let mut seed =
        conn.prepare("INSERT OR IGNORE INTO types (id_type, description) VALUES (?1, ?2)")?;
    for kind in PerformerType::ALL {
        seed.execute(rusqlite::params![kind.id(), kind.description()])?;
    }

    Ok(SchemaAction::Created)
}
