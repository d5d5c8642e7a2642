pub mod activity;
pub mod contact;
pub mod goals;
pub mod ids;
pub mod subscription;
pub mod user;

pub use activity::{Activity, ActivityKind};
pub use contact::{validate_contact_fields, validate_goal_days, Contact, MAX_GOAL_DAYS};
pub use goals::{validate_goal_target, Goals};
pub use ids::{ActivityId, ContactId, SubscriptionId, UserId};
pub use subscription::Subscription;
pub use user::{normalize_email, User};
