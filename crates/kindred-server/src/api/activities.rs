use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use kindred_core::domain::{ActivityId, ActivityKind, ContactId};
use kindred_core::dto::{ActivityCreatedDto, ActivityDto};
use kindred_core::rules::is_milestone;
use kindred_core::time::{now_utc, parse_activity_date};
use kindred_store::repo::{ActivityNew, ActivityUpdate};
use serde::Deserialize;
use tracing::{debug, info};

use super::{missing_as, parse_id, AckDto, NO_ACTIVITY, NO_CONTACT};
use crate::error::{not_found, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateActivityBody {
    pub title: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ActivityKind>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateActivityBody {
    pub title: Option<String>,
    pub date: Option<String>,
    pub note: Option<String>,
    pub description: Option<String>,
}

/// Logs an activity when both `date` and `type` are given. A non-empty
/// title counts towards the owner's message goal either way, and
/// `showQuote` reports whether the owner just hit a milestone.
pub async fn create_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CreateActivityBody>, JsonRejection>,
) -> ApiResult<Json<ActivityCreatedDto>> {
    let contact_id: ContactId = parse_id(&id, NO_CONTACT)?;
    let Json(body) = body?;
    let now = now_utc();
    let offset = state.offset();

    let counts_as_message = body
        .title
        .as_deref()
        .is_some_and(|title| !title.trim().is_empty());

    let created = state
        .with_store(move |store| {
            let contact = store
                .contacts()
                .get(contact_id)?
                .ok_or_else(|| not_found(NO_CONTACT))?;
            let date = match body.date.as_deref().map(str::trim) {
                Some(raw) if !raw.is_empty() => Some(parse_activity_date(raw, offset)?),
                _ => None,
            };

            match (date, body.kind) {
                (Some(date), Some(kind)) => {
                    let activity = store.activities().add(ActivityNew {
                        contact_id,
                        kind,
                        title: body.title.unwrap_or_default(),
                        note: body.note.unwrap_or_default(),
                        description: body.description.unwrap_or_default(),
                        date,
                        created_at: now,
                    })?;
                    info!(activity_id = %activity.id, contact_id = %contact_id, "activity logged");
                }
                _ => debug!(contact_id = %contact_id, "activity skipped, date or type missing"),
            }

            if counts_as_message {
                store.goals().increment_messages(now, contact.user_id)?;
            }

            let count = store.activities().count_user_activities(contact.user_id)?;
            Ok(ActivityCreatedDto {
                show_quote: is_milestone(count),
            })
        })
        .await?;
    Ok(Json(created))
}

pub async fn update_activity(
    State(state): State<AppState>,
    Path((contact_id, activity_id)): Path<(String, String)>,
    body: Result<Json<UpdateActivityBody>, JsonRejection>,
) -> ApiResult<Json<ActivityDto>> {
    let contact_id: ContactId = parse_id(&contact_id, NO_CONTACT)?;
    let activity_id: ActivityId = parse_id(&activity_id, NO_ACTIVITY)?;
    let Json(body) = body?;
    let offset = state.offset();

    let activity = state
        .with_store(move |store| {
            let known = store
                .activities()
                .get(activity_id)?
                .is_some_and(|activity| activity.contact_id == contact_id);
            if !known {
                return Err(not_found(NO_ACTIVITY));
            }
            let date = match body.date.as_deref() {
                Some(raw) => Some(parse_activity_date(raw, offset)?),
                None => None,
            };
            let update = ActivityUpdate {
                title: body.title,
                note: body.note,
                description: body.description,
                date,
            };
            store
                .activities()
                .update(contact_id, activity_id, update)
                .map_err(missing_as(NO_ACTIVITY))
        })
        .await?;
    Ok(Json(ActivityDto::from(&activity)))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path((contact_id, activity_id)): Path<(String, String)>,
) -> ApiResult<Json<AckDto>> {
    let contact_id: ContactId = parse_id(&contact_id, NO_CONTACT)?;
    let activity_id: ActivityId = parse_id(&activity_id, NO_ACTIVITY)?;
    state
        .with_store(move |store| {
            store
                .activities()
                .delete(contact_id, activity_id)
                .map_err(missing_as(NO_ACTIVITY))
        })
        .await?;
    Ok(AckDto::ok())
}
