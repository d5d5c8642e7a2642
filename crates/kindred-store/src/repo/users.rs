use crate::error::{Result, StoreError};
use crate::repo::parse_id;
use kindred_core::domain::{normalize_email, User, UserId};
use kindred_core::CoreError;
use rusqlite::{params, Connection};

const USER_COLUMNS: &str = "id, email, name, has_viewed_dashboard_tutorial, \
     has_viewed_contacts_tutorial, has_viewed_profile_tutorial, created_at";

/// `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct TutorialFlags {
    pub dashboard: Option<bool>,
    pub contacts: Option<bool>,
    pub profile: Option<bool>,
}

pub struct UsersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> UsersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Creates the user on first sign-in; later calls only refresh the name
    /// when one is given.
    pub fn upsert(&self, now_utc: i64, email: &str, name: Option<&str>) -> Result<User> {
        let email = normalize_email(email).ok_or(CoreError::EmptyEmail)?;
        let name = name.map(str::trim).filter(|value| !value.is_empty());

        self.conn.execute(
            "INSERT INTO users (id, email, name, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(email) DO UPDATE SET name = COALESCE(excluded.name, users.name);",
            params![UserId::new().to_string(), email, name, now_utc],
        )?;

        self.find_by_email(&email)?
            .ok_or_else(|| StoreError::NotFound(email.clone()))
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(email) = normalize_email(email) else {
            return Ok(None);
        };
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        match rows.next()? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn set_tutorials(&self, id: UserId, flags: TutorialFlags) -> Result<User> {
        let updated = self.conn.execute(
            "UPDATE users SET
                has_viewed_dashboard_tutorial = COALESCE(?2, has_viewed_dashboard_tutorial),
                has_viewed_contacts_tutorial = COALESCE(?3, has_viewed_contacts_tutorial),
                has_viewed_profile_tutorial = COALESCE(?4, has_viewed_profile_tutorial)
             WHERE id = ?1;",
            params![id.to_string(), flags.dashboard, flags.contacts, flags.profile],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<User> {
    Ok(User {
        id: parse_id(row.get(0)?)?,
        email: row.get(1)?,
        name: row.get(2)?,
        has_viewed_dashboard_tutorial: row.get(3)?,
        has_viewed_contacts_tutorial: row.get(4)?,
        has_viewed_profile_tutorial: row.get(5)?,
        created_at: row.get(6)?,
    })
}
