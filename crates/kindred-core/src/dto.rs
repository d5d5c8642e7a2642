use crate::domain::{
    Activity, ActivityId, ActivityKind, Contact, ContactId, Goals, Subscription, SubscriptionId,
    User, UserId,
};
use crate::time::format_rfc3339;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub id: ActivityId,
    pub contact_id: ContactId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub note: String,
    pub description: String,
    pub date: String,
    pub created_at: String,
}

impl From<&Activity> for ActivityDto {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            contact_id: activity.contact_id,
            kind: activity.kind,
            title: activity.title.clone(),
            note: activity.note.clone(),
            description: activity.description.clone(),
            date: format_rfc3339(activity.date),
            created_at: format_rfc3339(activity.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListItemDto {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub goal_days: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub links: Vec<String>,
    pub interests: Vec<String>,
    /// Holds the single activity that drives reminders for this contact.
    pub activities: Vec<ActivityDto>,
    pub is_archived: bool,
}

impl ContactListItemDto {
    pub fn new(contact: &Contact, latest: Option<&Activity>) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            title: contact.title.clone(),
            company: contact.company.clone(),
            industry: contact.industry.clone(),
            goal_days: contact.goal_days,
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            links: contact.links.clone(),
            interests: contact.interests.clone(),
            activities: latest.map(ActivityDto::from).into_iter().collect(),
            is_archived: contact.is_archived,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetailDto {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub goal_days: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub links: Vec<String>,
    pub interests: Vec<String>,
    pub activities: Vec<ActivityDto>,
    pub is_archived: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ContactDetailDto {
    pub fn new(contact: &Contact, activities: &[Activity]) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            title: contact.title.clone(),
            company: contact.company.clone(),
            industry: contact.industry.clone(),
            goal_days: contact.goal_days,
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            links: contact.links.clone(),
            interests: contact.interests.clone(),
            activities: activities.iter().map(ActivityDto::from).collect(),
            is_archived: contact.is_archived,
            created_at: format_rfc3339(contact.created_at),
            updated_at: format_rfc3339(contact.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDto {
    pub contact_id: ContactId,
    pub contact_first_name: String,
    pub contact_last_name: String,
    pub title: Option<String>,
    pub note: String,
    pub days: i64,
    pub goal_days: i32,
    /// The contact has only its seed activity.
    pub is_new_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub priority_actions: Vec<ActionDto>,
    pub upcoming_actions: Vec<ActionDto>,
    pub has_contacts: bool,
    pub has_viewed_dashboard_tutorial: bool,
    pub show_confetti: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsDto {
    pub user_id: UserId,
    pub connections: i32,
    pub messages: i32,
    pub goal_connections: i32,
    pub goal_messages: i32,
    pub has_shown_confetti: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Goals> for GoalsDto {
    fn from(goals: &Goals) -> Self {
        Self {
            user_id: goals.user_id,
            connections: goals.connections,
            messages: goals.messages,
            goal_connections: goals.goal_connections,
            goal_messages: goals.goal_messages,
            has_shown_confetti: goals.has_shown_confetti,
            created_at: format_rfc3339(goals.created_at),
            updated_at: format_rfc3339(goals.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsStatusDto {
    pub is_meet_goals: bool,
    #[serde(flatten)]
    pub goals: Option<GoalsDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCreatedDto {
    pub show_quote: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreatedDto {
    pub id: SubscriptionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsDto {
    pub subscription_id: SubscriptionId,
    pub new_action: bool,
    pub streak: bool,
    pub meet_goal: bool,
}

impl From<&Subscription> for NotificationSettingsDto {
    fn from(subscription: &Subscription) -> Self {
        Self {
            subscription_id: subscription.id,
            new_action: subscription.new_action,
            streak: subscription.streak,
            meet_goal: subscription.meet_goal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub has_viewed_dashboard_tutorial: bool,
    pub has_viewed_contacts_tutorial: bool,
    pub has_viewed_profile_tutorial: bool,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            has_viewed_dashboard_tutorial: user.has_viewed_dashboard_tutorial,
            has_viewed_contacts_tutorial: user.has_viewed_contacts_tutorial,
            has_viewed_profile_tutorial: user.has_viewed_profile_tutorial,
        }
    }
}
