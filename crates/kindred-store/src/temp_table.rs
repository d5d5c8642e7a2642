use crate::error::Result;
use rusqlite::Connection;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TABLE: AtomicU64 = AtomicU64::new(0);

/// Session-scoped table of ids used to join a whole id set in one query
/// instead of issuing one query per id. Dropped with the guard.
pub(crate) struct TempIdTable<'a> {
    conn: &'a Connection,
    name: String,
}

impl<'a> TempIdTable<'a> {
    pub(crate) fn create<I, T>(conn: &'a Connection, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let name = format!("temp.{}", next_table_name());
        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name};
             CREATE TEMP TABLE {name} (id TEXT PRIMARY KEY);"
        ))?;
        let table = Self { conn, name };

        {
            let mut insert = table
                .conn
                .prepare(&format!("INSERT OR IGNORE INTO {} (id) VALUES (?1);", table.name))?;
            for id in ids {
                insert.execute([id.to_string()])?;
            }
        }

        Ok(table)
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TempIdTable<'_> {
    fn drop(&mut self) {
        let _ = self
            .conn
            .execute(&format!("DROP TABLE IF EXISTS {};", self.name), []);
    }
}

fn next_table_name() -> String {
    let seq = NEXT_TABLE.fetch_add(1, Ordering::Relaxed);
    format!("kindred_ids_{}_{}", std::process::id(), seq)
}
