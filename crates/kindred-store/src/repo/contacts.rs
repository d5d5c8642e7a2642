use crate::db::{fold_case, FOLD_CASE_FN};
use crate::error::{Result, StoreError};
use crate::repo::activities::{insert_activity, ActivityNew};
use crate::repo::goals::increment_connections;
use crate::repo::parse_id;
use kindred_core::domain::{validate_contact_fields, Contact, ContactId, UserId};
use rusqlite::{params, params_from_iter, Connection};
use tracing::debug;

const NAME_ORDER: &str = "fold_case(first_name) ASC, fold_case(last_name) ASC, id ASC";

const CONTACT_COLUMNS: &str = "id, user_id, first_name, last_name, title, company, industry, \
     email, phone, links, interests, goal_days, is_archived, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ContactNew {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub links: Vec<String>,
    pub interests: Vec<String>,
    pub goal_days: i32,
}

/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub industry: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub links: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub goal_days: Option<i32>,
    pub is_archived: Option<bool>,
}

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts the contact together with its SYSTEM seed activity and bumps
    /// the owner's connection counter, all in one transaction.
    pub fn create(&self, now_utc: i64, input: ContactNew) -> Result<Contact> {
        validate_contact_fields(&input.first_name, input.goal_days)?;

        let tx = self.conn.unchecked_transaction()?;
        let contact = Contact {
            id: ContactId::new(),
            user_id: input.user_id,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            title: clean_optional(input.title),
            company: clean_optional(input.company),
            industry: clean_optional(input.industry),
            email: clean_optional(input.email),
            phone: clean_optional(input.phone),
            links: clean_list(input.links),
            interests: clean_list(input.interests),
            goal_days: input.goal_days,
            is_archived: false,
            created_at: now_utc,
            updated_at: now_utc,
        };

        tx.execute(
            &format!(
                "INSERT INTO contacts ({CONTACT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);"
            ),
            params![
                contact.id.to_string(),
                contact.user_id.to_string(),
                contact.first_name,
                contact.last_name,
                contact.title,
                contact.company,
                contact.industry,
                contact.email,
                contact.phone,
                serde_json::to_string(&contact.links)?,
                serde_json::to_string(&contact.interests)?,
                contact.goal_days,
                contact.is_archived,
                contact.created_at,
                contact.updated_at,
            ],
        )?;

        insert_activity(&tx, ActivityNew::seed(contact.id, now_utc))?;
        increment_connections(&tx, now_utc, contact.user_id)?;

        tx.commit()?;
        debug!(contact_id = %contact.id, "contact created");
        Ok(contact)
    }

    pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(contact_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// All of a user's contacts, archived included, ordered by first then
    /// last name. A two-word `name` must match first and last name; a single
    /// word may match either. Matching is a substring match on Unicode
    /// case-folded names, so "émile" finds "Émile".
    pub fn search(&self, user_id: UserId, name: Option<&str>) -> Result<Vec<Contact>> {
        let mut sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = ?1");
        let mut values = vec![user_id.to_string()];

        let mut words = name.unwrap_or_default().split_whitespace();
        match (words.next(), words.next()) {
            (Some(first), Some(last)) => {
                sql.push_str(&format!(
                    " AND {FOLD_CASE_FN}(first_name) LIKE ?2 ESCAPE '\\' \
                     AND {FOLD_CASE_FN}(last_name) LIKE ?3 ESCAPE '\\'"
                ));
                values.push(like_pattern(first));
                values.push(like_pattern(last));
            }
            (Some(word), None) => {
                sql.push_str(&format!(
                    " AND ({FOLD_CASE_FN}(first_name) LIKE ?2 ESCAPE '\\' \
                     OR {FOLD_CASE_FN}(last_name) LIKE ?2 ESCAPE '\\')"
                ));
                values.push(like_pattern(word));
            }
            _ => {}
        }
        sql.push_str(&format!(" ORDER BY {NAME_ORDER};"));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values.iter()))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    pub fn list_active(&self, user_id: UserId) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE user_id = ?1 AND is_archived = 0
             ORDER BY {NAME_ORDER};"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    pub fn count_for_user(&self, user_id: UserId) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE user_id = ?1;",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn update(&self, now_utc: i64, id: ContactId, update: ContactUpdate) -> Result<Contact> {
        let mut contact = self
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(first_name) = update.first_name {
            contact.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            contact.last_name = last_name.trim().to_string();
        }
        if let Some(title) = update.title {
            contact.title = clean_optional(title);
        }
        if let Some(company) = update.company {
            contact.company = clean_optional(company);
        }
        if let Some(industry) = update.industry {
            contact.industry = clean_optional(industry);
        }
        if let Some(email) = update.email {
            contact.email = clean_optional(email);
        }
        if let Some(phone) = update.phone {
            contact.phone = clean_optional(phone);
        }
        if let Some(links) = update.links {
            contact.links = clean_list(links);
        }
        if let Some(interests) = update.interests {
            contact.interests = clean_list(interests);
        }
        if let Some(goal_days) = update.goal_days {
            contact.goal_days = goal_days;
        }
        if let Some(is_archived) = update.is_archived {
            contact.is_archived = is_archived;
        }
        contact.validate()?;
        contact.updated_at = now_utc;

        self.conn.execute(
            "UPDATE contacts SET
                first_name = ?2, last_name = ?3, title = ?4, company = ?5, industry = ?6,
                email = ?7, phone = ?8, links = ?9, interests = ?10, goal_days = ?11,
                is_archived = ?12, updated_at = ?13
             WHERE id = ?1;",
            params![
                contact.id.to_string(),
                contact.first_name,
                contact.last_name,
                contact.title,
                contact.company,
                contact.industry,
                contact.email,
                contact.phone,
                serde_json::to_string(&contact.links)?,
                serde_json::to_string(&contact.interests)?,
                contact.goal_days,
                contact.is_archived,
                contact.updated_at,
            ],
        )?;

        Ok(contact)
    }

    /// Activities go with the contact via `ON DELETE CASCADE`.
    pub fn delete(&self, id: ContactId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn like_pattern(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len() + 2);
    escaped.push('%');
    for ch in fold_case(word).chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn contact_from_row(row: &rusqlite::Row<'_>) -> Result<Contact> {
    let links: String = row.get(9)?;
    let interests: String = row.get(10)?;
    Ok(Contact {
        id: parse_id(row.get(0)?)?,
        user_id: parse_id(row.get(1)?)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        title: row.get(4)?,
        company: row.get(5)?,
        industry: row.get(6)?,
        email: row.get(7)?,
        phone: row.get(8)?,
        links: serde_json::from_str(&links)?,
        interests: serde_json::from_str(&interests)?,
        goal_days: row.get(11)?,
        is_archived: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
