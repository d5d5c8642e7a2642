use crate::domain::{Activity, ActivityKind};
use crate::time::local_date;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

/// Days past a contact's goal interval before an upcoming action turns into
/// a priority one.
pub const UPCOMING_GRACE_DAYS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Priority,
    Upcoming,
    None,
}

/// Whole calendar days between the activity date and now, both taken as
/// dates in `offset`.
pub fn elapsed_days(now_utc: i64, date: i64, offset: FixedOffset) -> i64 {
    local_date(now_utc, offset)
        .signed_duration_since(local_date(date, offset))
        .num_days()
}

pub fn classify_action(elapsed_days: i64, goal_days: i32, kind: ActivityKind) -> ActionState {
    let goal_days = i64::from(goal_days);
    // A contact that only has its seed activity has never been reached out
    // to, so it is due from day zero.
    let priority_threshold = match kind {
        ActivityKind::User => goal_days,
        ActivityKind::System => 0,
    };
    let upcoming_ceiling = goal_days + UPCOMING_GRACE_DAYS;

    if elapsed_days > upcoming_ceiling {
        ActionState::Priority
    } else if priority_threshold <= elapsed_days {
        ActionState::Upcoming
    } else {
        ActionState::None
    }
}

pub fn classify_activity(
    now_utc: i64,
    offset: FixedOffset,
    activity: &Activity,
    goal_days: i32,
) -> (ActionState, i64) {
    let days = elapsed_days(now_utc, activity.date, offset);
    (classify_action(days, goal_days, activity.kind), days)
}
