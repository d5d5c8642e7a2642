pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod repo;
pub(crate) mod temp_table;

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

pub use error::{StoreError, StoreErrorKind};

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn users(&self) -> repo::UsersRepo<'_> {
        repo::UsersRepo::new(&self.conn)
    }

    pub fn contacts(&self) -> repo::ContactsRepo<'_> {
        repo::ContactsRepo::new(&self.conn)
    }

    pub fn activities(&self) -> repo::ActivitiesRepo<'_> {
        repo::ActivitiesRepo::new(&self.conn)
    }

    pub fn goals(&self) -> repo::GoalsRepo<'_> {
        repo::GoalsRepo::new(&self.conn)
    }

    pub fn subscriptions(&self) -> repo::SubscriptionsRepo<'_> {
        repo::SubscriptionsRepo::new(&self.conn)
    }
}
