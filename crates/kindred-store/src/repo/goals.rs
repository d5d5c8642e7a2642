use crate::error::{Result, StoreError};
use crate::repo::parse_id;
use kindred_core::domain::{validate_goal_target, Goals, UserId};
use rusqlite::{params, Connection};

const GOALS_COLUMNS: &str = "user_id, connections, messages, goal_connections, goal_messages, \
     has_shown_confetti, created_at, updated_at";

pub struct GoalsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> GoalsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, user_id: UserId) -> Result<Option<Goals>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {GOALS_COLUMNS} FROM goals WHERE user_id = ?1;"))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(goals_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Creates the goals row or rewrites its targets. Rewriting re-arms the
    /// confetti latch; counters are kept.
    pub fn upsert_targets(
        &self,
        now_utc: i64,
        user_id: UserId,
        goal_connections: i32,
        goal_messages: i32,
    ) -> Result<Goals> {
        let goal_connections = validate_goal_target(goal_connections)?;
        let goal_messages = validate_goal_target(goal_messages)?;

        self.conn.execute(
            "INSERT INTO goals (user_id, goal_connections, goal_messages, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                goal_connections = excluded.goal_connections,
                goal_messages = excluded.goal_messages,
                has_shown_confetti = 0,
                updated_at = excluded.updated_at;",
            params![
                user_id.to_string(),
                goal_connections,
                goal_messages,
                now_utc
            ],
        )?;

        self.get(user_id)?
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }

    /// No-op for users who never set goals.
    pub fn increment_messages(&self, now_utc: i64, user_id: UserId) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE goals SET messages = messages + 1, updated_at = ?2 WHERE user_id = ?1;",
            params![user_id.to_string(), now_utc],
        )?;
        Ok(updated > 0)
    }

    /// Flips the confetti latch from false to true. Returns whether this call
    /// did the flip, so concurrent readers celebrate at most once.
    pub fn latch_confetti(&self, now_utc: i64, user_id: UserId) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE goals SET has_shown_confetti = 1, updated_at = ?2
             WHERE user_id = ?1 AND has_shown_confetti = 0;",
            params![user_id.to_string(), now_utc],
        )?;
        Ok(updated == 1)
    }
}

/// Counted inside the contact-creation transaction; no-op without goals.
pub(crate) fn increment_connections(
    conn: &Connection,
    now_utc: i64,
    user_id: UserId,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE goals SET connections = connections + 1, updated_at = ?2 WHERE user_id = ?1;",
        params![user_id.to_string(), now_utc],
    )?;
    Ok(updated > 0)
}

fn goals_from_row(row: &rusqlite::Row<'_>) -> Result<Goals> {
    Ok(Goals {
        user_id: parse_id(row.get(0)?)?,
        connections: row.get(1)?,
        messages: row.get(2)?,
        goal_connections: row.get(3)?,
        goal_messages: row.get(4)?,
        has_shown_confetti: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
