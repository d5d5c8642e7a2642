use crate::error::{Result, StoreError};
use crate::repo::parse_id;
use kindred_core::domain::{Subscription, SubscriptionId, UserId};
use kindred_core::CoreError;
use rusqlite::{params, Connection};

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, endpoint, p256dh, auth, new_action, streak, \
     meet_goal, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SubscriptionNew {
    pub user_id: UserId,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreferences {
    pub new_action: bool,
    pub streak: bool,
    pub meet_goal: bool,
}

pub struct SubscriptionsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> SubscriptionsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// One row per push endpoint. Re-registering an endpoint refreshes its
    /// keys and owner but keeps the preferences.
    pub fn upsert(&self, now_utc: i64, input: SubscriptionNew) -> Result<Subscription> {
        let endpoint = input.endpoint.trim();
        if endpoint.is_empty() {
            return Err(CoreError::EmptyEndpoint.into());
        }

        self.conn.execute(
            "INSERT INTO subscriptions (id, user_id, endpoint, p256dh, auth, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(endpoint) DO UPDATE SET
                user_id = excluded.user_id,
                p256dh = excluded.p256dh,
                auth = excluded.auth,
                updated_at = excluded.updated_at;",
            params![
                SubscriptionId::new().to_string(),
                input.user_id.to_string(),
                endpoint,
                input.p256dh,
                input.auth,
                now_utc,
            ],
        )?;

        self.find_by_endpoint(endpoint)?
            .ok_or_else(|| StoreError::NotFound(endpoint.to_string()))
    }

    pub fn get(&self, id: SubscriptionId) -> Result<Option<Subscription>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = ?1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(subscription_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn find_by_endpoint(&self, endpoint: &str) -> Result<Option<Subscription>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE endpoint = ?1;"
        ))?;
        let mut rows = stmt.query([endpoint.trim()])?;
        match rows.next()? {
            Some(row) => Ok(Some(subscription_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn update_preferences(
        &self,
        now_utc: i64,
        id: SubscriptionId,
        preferences: NotificationPreferences,
    ) -> Result<Subscription> {
        let updated = self.conn.execute(
            "UPDATE subscriptions SET new_action = ?2, streak = ?3, meet_goal = ?4, updated_at = ?5
             WHERE id = ?1;",
            params![
                id.to_string(),
                preferences.new_action,
                preferences.streak,
                preferences.meet_goal,
                now_utc,
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Subscriptions that opted into new-action alerts, grouped by user.
    pub fn list_new_action(&self) -> Result<Vec<Subscription>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
             WHERE new_action = 1
             ORDER BY user_id ASC, created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(subscription_from_row(row)?);
        }
        Ok(items)
    }
}

fn subscription_from_row(row: &rusqlite::Row<'_>) -> Result<Subscription> {
    Ok(Subscription {
        id: parse_id(row.get(0)?)?,
        user_id: parse_id(row.get(1)?)?,
        endpoint: row.get(2)?,
        p256dh: row.get(3)?,
        auth: row.get(4)?,
        new_action: row.get(5)?,
        streak: row.get(6)?,
        meet_goal: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
