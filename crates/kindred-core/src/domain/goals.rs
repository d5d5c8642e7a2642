use crate::domain::ids::UserId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub user_id: UserId,
    pub connections: i32,
    pub messages: i32,
    pub goal_connections: i32,
    pub goal_messages: i32,
    /// One-way latch: set once both counters first reach their targets and
    /// cleared only when the targets are rewritten.
    pub has_shown_confetti: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

pub fn validate_goal_target(value: i32) -> Result<i32, CoreError> {
    if value < 0 {
        return Err(CoreError::InvalidGoalTarget(value));
    }
    Ok(value)
}
