use crate::domain::ids::{SubscriptionId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub new_action: bool,
    pub streak: bool,
    pub meet_goal: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
