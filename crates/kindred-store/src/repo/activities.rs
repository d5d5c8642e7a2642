use crate::error::{Result, StoreError};
use crate::repo::parse_id;
use crate::temp_table::TempIdTable;
use kindred_core::domain::{Activity, ActivityId, ActivityKind, ContactId, UserId};
use kindred_core::rules::select_latest_activities;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::str::FromStr;

const ACTIVITY_COLUMNS: &str = "id, contact_id, kind, title, note, description, date, created_at";

#[derive(Debug, Clone)]
pub struct ActivityNew {
    pub contact_id: ContactId,
    pub kind: ActivityKind,
    pub title: String,
    pub note: String,
    pub description: String,
    pub date: i64,
    pub created_at: i64,
}

impl ActivityNew {
    /// Placeholder written alongside every new contact.
    pub fn seed(contact_id: ContactId, now_utc: i64) -> Self {
        Self {
            contact_id,
            kind: ActivityKind::System,
            title: String::new(),
            note: String::new(),
            description: String::new(),
            date: now_utc,
            created_at: now_utc,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub note: Option<String>,
    pub description: Option<String>,
    pub date: Option<i64>,
}

pub struct ActivitiesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ActivitiesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn add(&self, input: ActivityNew) -> Result<Activity> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM contacts WHERE id = ?1;",
                [input.contact_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(input.contact_id.to_string()));
        }
        insert_activity(self.conn, input)
    }

    pub fn get(&self, id: ActivityId) -> Result<Option<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(activity_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Edits an activity in place. The activity must belong to `contact_id`.
    pub fn update(
        &self,
        contact_id: ContactId,
        id: ActivityId,
        update: ActivityUpdate,
    ) -> Result<Activity> {
        let mut activity = self
            .get(id)?
            .filter(|activity| activity.contact_id == contact_id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = update.title {
            activity.title = title;
        }
        if let Some(note) = update.note {
            activity.note = note;
        }
        if let Some(description) = update.description {
            activity.description = description;
        }
        if let Some(date) = update.date {
            activity.date = date;
        }

        self.conn.execute(
            "UPDATE activities SET title = ?2, note = ?3, description = ?4, date = ?5
             WHERE id = ?1;",
            params![
                activity.id.to_string(),
                activity.title,
                activity.note,
                activity.description,
                activity.date,
            ],
        )?;
        Ok(activity)
    }

    pub fn delete(&self, contact_id: ContactId, id: ActivityId) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM activities WHERE id = ?1 AND contact_id = ?2;",
            params![id.to_string(), contact_id.to_string()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Full history, newest first.
    pub fn list_for_contact(&self, contact_id: ContactId) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities
             WHERE contact_id = ?1
             ORDER BY date DESC, created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([contact_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(activity_from_row(row)?);
        }
        Ok(items)
    }

    /// The activity that drives reminders for each contact, newest first.
    /// One query picks the latest USER activity per contact, a second picks
    /// the original SYSTEM seed for the contacts that have none.
    pub fn latest_for_contacts(&self, contact_ids: &[ContactId]) -> Result<Vec<Activity>> {
        if contact_ids.is_empty() {
            return Ok(Vec::new());
        }

        let all = TempIdTable::create(self.conn, contact_ids)?;
        let mut picks = self.first_per_contact(
            all.name(),
            ActivityKind::User,
            "a.date DESC, a.created_at DESC, a.id ASC",
        )?;
        drop(all);

        let covered: HashSet<ContactId> =
            picks.iter().map(|activity| activity.contact_id).collect();
        let missing: Vec<ContactId> = contact_ids
            .iter()
            .filter(|id| !covered.contains(*id))
            .copied()
            .collect();

        if !missing.is_empty() {
            let rest = TempIdTable::create(self.conn, &missing)?;
            picks.extend(self.first_per_contact(
                rest.name(),
                ActivityKind::System,
                "a.created_at ASC, a.id ASC",
            )?);
        }

        Ok(select_latest_activities(&picks))
    }

    /// USER activities across every contact the user owns, archived included.
    pub fn count_user_activities(&self, user_id: UserId) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM activities a
             INNER JOIN contacts c ON c.id = a.contact_id
             WHERE c.user_id = ?1 AND a.kind = 'USER';",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn first_per_contact(
        &self,
        id_table: &str,
        kind: ActivityKind,
        order_by: &str,
    ) -> Result<Vec<Activity>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM (
                SELECT a.*, ROW_NUMBER() OVER (
                    PARTITION BY a.contact_id ORDER BY {order_by}
                ) AS pick
                FROM activities a
                INNER JOIN {id_table} tmp ON tmp.id = a.contact_id
                WHERE a.kind = ?1
             )
             WHERE pick = 1;"
        ))?;
        let mut rows = stmt.query([kind.as_str()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(activity_from_row(row)?);
        }
        Ok(items)
    }
}

pub(crate) fn insert_activity(conn: &Connection, input: ActivityNew) -> Result<Activity> {
    let activity = Activity {
        id: ActivityId::new(),
        contact_id: input.contact_id,
        kind: input.kind,
        title: input.title,
        note: input.note,
        description: input.description,
        date: input.date,
        created_at: input.created_at,
    };

    conn.execute(
        &format!(
            "INSERT INTO activities ({ACTIVITY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);"
        ),
        params![
            activity.id.to_string(),
            activity.contact_id.to_string(),
            activity.kind.as_str(),
            activity.title,
            activity.note,
            activity.description,
            activity.date,
            activity.created_at,
        ],
    )?;

    Ok(activity)
}

fn activity_from_row(row: &rusqlite::Row<'_>) -> Result<Activity> {
    let kind_raw: String = row.get(2)?;
    let kind = ActivityKind::from_str(&kind_raw)
        .map_err(|_| StoreError::InvalidActivityKind(kind_raw.clone()))?;
    Ok(Activity {
        id: parse_id(row.get(0)?)?,
        contact_id: parse_id(row.get(1)?)?,
        kind,
        title: row.get(3)?,
        note: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
    })
}
