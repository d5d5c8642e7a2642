use crate::domain::ids::{ActivityId, ContactId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `System` activities are seeded when a contact is created; `User`
/// activities are interactions the user logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    System,
    User,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::System => "SYSTEM",
            ActivityKind::User => "USER",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SYSTEM" => Ok(ActivityKind::System),
            "USER" => Ok(ActivityKind::User),
            _ => Err(CoreError::InvalidActivityKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub contact_id: ContactId,
    pub kind: ActivityKind,
    pub title: String,
    pub note: String,
    pub description: String,
    /// When the interaction happened, not when it was recorded.
    pub date: i64,
    pub created_at: i64,
}

impl Activity {
    pub fn is_user(&self) -> bool {
        self.kind == ActivityKind::User
    }
}
