//! Connection setup shared by file-backed and in-memory stores.
//!
//! Every connection gets foreign keys (activities and goals cascade with
//! their owners), a busy timeout for the API's blocking pool, and the
//! `fold_case` SQL function used by name search.

use crate::error::Result;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::debug;

const BUSY_TIMEOUT_MS: i64 = 5000;

/// Name of the Unicode lowercasing SQL function. SQLite's own `lower()`,
/// `LIKE` and `NOCASE` only fold ASCII.
pub const FOLD_CASE_FN: &str = "fold_case";

pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    owner_only(path)?;
    configure(&conn)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    debug!(path = %path.display(), "database opened");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|value| fold_case(&value)))
        },
    )?;
    Ok(())
}

/// Case folding applied to both stored names and search input.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Contact data is personal; the database file is readable by its owner only.
#[cfg(unix)]
fn owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if path.exists() {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn owner_only(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_connections_enforce_foreign_keys() {
        let conn = open_in_memory().expect("open");
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .expect("pragma");
        assert_eq!(enabled, 1);
    }

    #[test]
    fn fold_case_lowercases_beyond_ascii() {
        let conn = open_in_memory().expect("open");
        let folded: String = conn
            .query_row("SELECT fold_case('ÉMILE Ödön');", [], |row| row.get(0))
            .expect("fold");
        assert_eq!(folded, "émile ödön");

        let null: Option<String> = conn
            .query_row("SELECT fold_case(NULL);", [], |row| row.get(0))
            .expect("fold null");
        assert_eq!(null, None);
    }
}
