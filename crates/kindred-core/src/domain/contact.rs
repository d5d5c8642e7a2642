use crate::domain::ids::{ContactId, UserId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const MAX_GOAL_DAYS: i32 = 3650;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
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
    pub is_archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Contact {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_contact_fields(&self.first_name, self.goal_days)
    }
}

pub fn validate_contact_fields(first_name: &str, goal_days: i32) -> Result<(), CoreError> {
    if first_name.trim().is_empty() {
        return Err(CoreError::EmptyFirstName);
    }
    validate_goal_days(goal_days)
}

pub fn validate_goal_days(goal_days: i32) -> Result<(), CoreError> {
    if goal_days <= 0 || goal_days > MAX_GOAL_DAYS {
        return Err(CoreError::InvalidGoalDays(goal_days));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_contact_fields, validate_goal_days, MAX_GOAL_DAYS};
    use crate::error::CoreError;

    #[test]
    fn rejects_blank_first_name() {
        assert_eq!(
            validate_contact_fields("   ", 7),
            Err(CoreError::EmptyFirstName)
        );
    }

    #[test]
    fn goal_days_must_be_positive_and_bounded() {
        assert!(validate_goal_days(1).is_ok());
        assert!(validate_goal_days(MAX_GOAL_DAYS).is_ok());
        assert_eq!(validate_goal_days(0), Err(CoreError::InvalidGoalDays(0)));
        assert_eq!(
            validate_goal_days(MAX_GOAL_DAYS + 1),
            Err(CoreError::InvalidGoalDays(MAX_GOAL_DAYS + 1))
        );
    }
}
