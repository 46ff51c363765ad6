//! Local SQLite database layer.
//!
//! One file, one table: `slots` is a plain key-value store holding the
//! serialized ledger and the admin contact number, replacing the browser
//! localStorage the stand used before. Uses rusqlite with WAL mode and
//! numbered migrations tracked in `schema_version`.

use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::PosError;

/// Shared database handle.
pub struct DbState {
    pub conn: Mutex<Connection>,
    pub db_path: PathBuf,
}

/// Current schema version. Bump when adding new migrations.
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Initialize the database at `{data_dir}/pos.db`.
///
/// Creates the directory if needed, opens the connection, sets pragmas,
/// and runs any pending migrations. On corruption or open failure,
/// deletes the file and retries once: a fresh empty store is preferable
/// to blocking the stand's operation.
pub fn init(data_dir: &Path) -> Result<DbState, PosError> {
    fs::create_dir_all(data_dir).map_err(|e| PosError::Db(format!("create data dir: {e}")))?;

    let db_path = data_dir.join("pos.db");
    info!("Opening database at {}", db_path.display());

    let conn = match open_and_configure(&db_path) {
        Ok(c) => c,
        Err(first_err) => {
            warn!(
                "Database open failed ({}), deleting and retrying once",
                first_err
            );
            if db_path.exists() {
                let _ = fs::remove_file(&db_path);
                // Also remove WAL/SHM files if present
                let _ = fs::remove_file(db_path.with_extension("db-wal"));
                let _ = fs::remove_file(db_path.with_extension("db-shm"));
            }
            open_and_configure(&db_path)
                .map_err(|e| PosError::Db(format!("open failed after retry: {e}")))?
        }
    };

    run_migrations(&conn)?;

    info!("Database initialized (schema v{CURRENT_SCHEMA_VERSION})");

    Ok(DbState {
        conn: Mutex::new(conn),
        db_path,
    })
}

/// Open the database file and apply pragmas.
fn open_and_configure(path: &Path) -> Result<Connection, PosError> {
    let conn = Connection::open(path).map_err(|e| PosError::Db(format!("sqlite open: {e}")))?;

    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )
    .map_err(|e| PosError::Db(format!("pragma setup: {e}")))?;

    Ok(conn)
}

/// Run all pending migrations up to `CURRENT_SCHEMA_VERSION`.
pub(crate) fn run_migrations(conn: &Connection) -> Result<(), PosError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT DEFAULT (datetime('now'))
        );",
    )
    .map_err(|e| PosError::Db(format!("create schema_version: {e}")))?;

    let current: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current >= CURRENT_SCHEMA_VERSION {
        info!("Database schema up to date (v{current})");
        return Ok(());
    }

    info!("Migrating database from v{current} to v{CURRENT_SCHEMA_VERSION}");

    if current < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Migration v1: the slots key-value table.
fn migrate_v1(conn: &Connection) -> Result<(), PosError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS slots (
            slot_key TEXT PRIMARY KEY,
            slot_value TEXT NOT NULL,
            updated_at TEXT DEFAULT (datetime('now'))
        );

        INSERT INTO schema_version (version) VALUES (1);
        ",
    )
    .map_err(|e| {
        error!("Migration v1 failed: {e}");
        PosError::Db(format!("migration v1: {e}"))
    })?;

    info!("Applied migration v1 (slots table)");
    Ok(())
}

// ---------------------------------------------------------------------------
// Slot helpers
// ---------------------------------------------------------------------------

/// Get a single slot value.
pub fn get_slot(conn: &Connection, key: &str) -> Option<String> {
    conn.query_row(
        "SELECT slot_value FROM slots WHERE slot_key = ?1",
        params![key],
        |row| row.get(0),
    )
    .ok()
}

/// Insert or update a slot.
pub fn set_slot(conn: &Connection, key: &str, value: &str) -> Result<(), PosError> {
    conn.execute(
        "INSERT INTO slots (slot_key, slot_value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(slot_key) DO UPDATE SET
            slot_value = excluded.slot_value,
            updated_at = excluded.updated_at",
        params![key, value],
    )
    .map_err(|e| PosError::Db(format!("set_slot: {e}")))?;
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================
