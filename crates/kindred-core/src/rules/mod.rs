pub mod actions;
pub mod dashboard;
pub mod latest;
pub mod milestone;

pub use actions::{
    classify_action, classify_activity, elapsed_days, ActionState, UPCOMING_GRACE_DAYS,
};
pub use dashboard::{build_dashboard_actions, goals_met, DashboardActions};
pub use latest::select_latest_activities;
pub use milestone::{is_milestone, MILESTONE_INTERVAL};
