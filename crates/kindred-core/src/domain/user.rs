use crate::domain::ids::UserId;
use serde::{Deserialize, Serialize};

/// An account, keyed by the email it signed in with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub has_viewed_dashboard_tutorial: bool,
    pub has_viewed_contacts_tutorial: bool,
    pub has_viewed_profile_tutorial: bool,
    pub created_at: i64,
}

/// Sign-in providers differ in the case they report, so users are stored and
/// looked up by the lowercased address. `None` for a blank address.
pub fn normalize_email(value: &str) -> Option<String> {
    let email = value.trim();
    (!email.is_empty()).then(|| email.to_ascii_lowercase())
}
