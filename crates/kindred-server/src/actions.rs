use chrono::FixedOffset;
use kindred_core::domain::{ContactId, UserId};
use kindred_core::rules::{build_dashboard_actions, DashboardActions};
use kindred_store::error::Result;
use kindred_store::Store;

/// Priority and upcoming actions across the user's active contacts.
pub fn load_dashboard_actions(
    store: &Store,
    user_id: UserId,
    now_utc: i64,
    offset: FixedOffset,
) -> Result<DashboardActions> {
    let contacts = store.contacts().list_active(user_id)?;
    let ids: Vec<ContactId> = contacts.iter().map(|contact| contact.id).collect();
    let selected = store.activities().latest_for_contacts(&ids)?;
    Ok(build_dashboard_actions(
        now_utc, offset, &contacts, &selected,
    ))
}
