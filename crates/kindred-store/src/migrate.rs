//! Forward-only schema migrations.
//!
//! The applied version lives in the single-row `kindred_schema` table and
//! counts the scripts below. A database stamped with a version this build
//! does not ship is refused untouched: run it with the binary that wrote it,
//! or restore a backup.

use crate::error::{Result, StoreError};
use rusqlite::Connection;
use tracing::{debug, info};

const SCHEMA_TABLE: &str = "kindred_schema";

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "001_init",
    sql: include_str!("../migrations/001_init.sql"),
}];

pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applied version, 0 for a database that was never migrated.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    Ok(read_version(conn)?.unwrap_or(0))
}

/// Applies every pending script in one transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let current = match read_version(&tx)? {
        Some(version) => version,
        None => {
            tx.execute_batch(
                "CREATE TABLE kindred_schema (version INTEGER NOT NULL);
                 INSERT INTO kindred_schema (version) VALUES (0);",
            )?;
            0
        }
    };

    let latest = latest_version();
    if current > latest {
        return Err(StoreError::Migration(format!(
            "database schema version {current} is newer than this build supports ({latest})"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute(
            "UPDATE kindred_schema SET version = ?1;",
            [migration.version],
        )?;
        info!(migration = migration.name, version = migration.version, "applied migration");
    }

    tx.commit()?;
    debug!(version = latest, "schema current");
    Ok(())
}

/// `None` until the schema table exists. Anything but exactly one row is
/// treated as a damaged database.
fn read_version(conn: &Connection) -> Result<Option<i64>> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [SCHEMA_TABLE],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(None);
    }

    let mut stmt = conn.prepare("SELECT version FROM kindred_schema;")?;
    let mut rows = stmt.query([])?;
    let mut versions = Vec::new();
    while let Some(row) = rows.next()? {
        versions.push(row.get::<_, i64>(0)?);
    }

    match versions.as_slice() {
        [version] => Ok(Some(*version)),
        _ => Err(StoreError::Migration(format!(
            "expected one row in {SCHEMA_TABLE}, found {}",
            versions.len()
        ))),
    }
}
