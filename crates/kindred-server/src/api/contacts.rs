use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use kindred_core::domain::{Activity, ContactId};
use kindred_core::dto::{ContactDetailDto, ContactListItemDto};
use kindred_core::time::now_utc;
use kindred_store::repo::{ContactNew, ContactUpdate};
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::{
    missing_as, parse_id, required, user_by_email, AckDto, MISSING_EMAIL, NO_CONTACT,
};
use crate::error::{not_found, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsQuery {
    pub user_email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub goal_days: Option<i32>,
}

/// Absent fields stay untouched; `null` clears the optional ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub industry: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    pub links: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub goal_days: Option<i32>,
    pub is_archived: Option<bool>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<UpdateContactBody> for ContactUpdate {
    fn from(body: UpdateContactBody) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            title: body.title,
            company: body.company,
            industry: body.industry,
            email: body.email,
            phone: body.phone,
            links: body.links,
            interests: body.interests,
            goal_days: body.goal_days,
            is_archived: body.is_archived,
        }
    }
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactsQuery>,
) -> ApiResult<Json<Vec<ContactListItemDto>>> {
    let email = required(query.user_email, MISSING_EMAIL)?;
    let name = query.name;

    let items: Vec<ContactListItemDto> = state
        .with_store(move |store| {
            let user = user_by_email(store, &email)?;
            let contacts = store.contacts().search(user.id, name.as_deref())?;
            let ids: Vec<ContactId> = contacts.iter().map(|contact| contact.id).collect();
            let latest: HashMap<ContactId, Activity> = store
                .activities()
                .latest_for_contacts(&ids)?
                .into_iter()
                .map(|activity| (activity.contact_id, activity))
                .collect();

            Ok(contacts
                .iter()
                .map(|contact| ContactListItemDto::new(contact, latest.get(&contact.id)))
                .collect())
        })
        .await?;
    Ok(Json(items))
}

pub async fn create_contact(
    State(state): State<AppState>,
    Query(query): Query<ContactsQuery>,
    body: Result<Json<CreateContactBody>, JsonRejection>,
) -> ApiResult<Json<ContactDetailDto>> {
    let email = required(query.user_email, MISSING_EMAIL)?;
    let Json(body) = body?;
    let goal_days = body.goal_days.unwrap_or(state.default_goal_days());
    let now = now_utc();

    let detail = state
        .with_store(move |store| {
            let user = user_by_email(store, &email)?;
            let contact = store.contacts().create(
                now,
                ContactNew {
                    user_id: user.id,
                    first_name: body.first_name.unwrap_or_default(),
                    last_name: body.last_name.unwrap_or_default(),
                    title: body.title,
                    company: body.company,
                    industry: body.industry,
                    email: body.email,
                    phone: body.phone,
                    links: body.links,
                    interests: body.interests,
                    goal_days,
                },
            )?;
            let activities = store.activities().list_for_contact(contact.id)?;
            info!(contact_id = %contact.id, user_id = %user.id, "contact created");
            Ok(ContactDetailDto::new(&contact, &activities))
        })
        .await?;
    Ok(Json(detail))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactDetailDto>> {
    let id: ContactId = parse_id(&id, NO_CONTACT)?;

    let detail = state
        .with_store(move |store| {
            let contact = store
                .contacts()
                .get(id)?
                .ok_or_else(|| not_found(NO_CONTACT))?;
            let activities = store.activities().list_for_contact(id)?;
            Ok(ContactDetailDto::new(&contact, &activities))
        })
        .await?;
    Ok(Json(detail))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateContactBody>, JsonRejection>,
) -> ApiResult<Json<ContactDetailDto>> {
    let id: ContactId = parse_id(&id, NO_CONTACT)?;
    let Json(body) = body?;
    let now = now_utc();

    let detail = state
        .with_store(move |store| {
            let contact = store
                .contacts()
                .update(now, id, ContactUpdate::from(body))
                .map_err(missing_as(NO_CONTACT))?;
            let activities = store.activities().list_for_contact(id)?;
            Ok(ContactDetailDto::new(&contact, &activities))
        })
        .await?;
    Ok(Json(detail))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AckDto>> {
    let id: ContactId = parse_id(&id, NO_CONTACT)?;
    state
        .with_store(move |store| {
            store
                .contacts()
                .delete(id)
                .map_err(missing_as(NO_CONTACT))
        })
        .await?;
    info!(contact_id = %id, "contact deleted");
    Ok(AckDto::ok())
}
