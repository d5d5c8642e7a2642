pub mod activities;
pub mod contacts;
pub mod goals;
pub mod subscriptions;
pub mod users;

pub use activities::{ActivitiesRepo, ActivityNew, ActivityUpdate};
pub use contacts::{ContactNew, ContactUpdate, ContactsRepo};
pub use goals::GoalsRepo;
pub use subscriptions::{NotificationPreferences, SubscriptionNew, SubscriptionsRepo};
pub use users::{TutorialFlags, UsersRepo};

use crate::error::{Result, StoreError};
use std::str::FromStr;

pub(crate) fn parse_id<T: FromStr>(raw: String) -> Result<T> {
    T::from_str(&raw).map_err(|_| StoreError::InvalidId(raw))
}
