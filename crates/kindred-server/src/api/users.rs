use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use kindred_core::dto::UserDto;
use kindred_core::time::now_utc;
use kindred_store::repo::TutorialFlags;
use serde::Deserialize;
use tracing::info;

use super::{missing_as, required, user_by_email, MISSING_EMAIL, NO_USER};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertUserBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialsBody {
    pub has_viewed_dashboard_tutorial: Option<bool>,
    pub has_viewed_contacts_tutorial: Option<bool>,
    pub has_viewed_profile_tutorial: Option<bool>,
}

/// Sign-in hook: creates the user on first sight, refreshes the name after.
pub async fn upsert_user(
    State(state): State<AppState>,
    body: Result<Json<UpsertUserBody>, JsonRejection>,
) -> ApiResult<Json<UserDto>> {
    let Json(body) = body?;
    let email = required(body.email, MISSING_EMAIL)?;
    let name = body.name;
    let now = now_utc();

    let user = state
        .with_store(move |store| Ok(store.users().upsert(now, &email, name.as_deref())?))
        .await?;
    info!(user_id = %user.id, "user signed in");
    Ok(Json(UserDto::from(&user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<UserDto>> {
    let email = required(query.email, MISSING_EMAIL)?;
    let user = state
        .with_store(move |store| user_by_email(store, &email))
        .await?;
    Ok(Json(UserDto::from(&user)))
}

pub async fn set_tutorials(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
    body: Result<Json<TutorialsBody>, JsonRejection>,
) -> ApiResult<Json<UserDto>> {
    let email = required(query.email, MISSING_EMAIL)?;
    let Json(body) = body?;
    let flags = TutorialFlags {
        dashboard: body.has_viewed_dashboard_tutorial,
        contacts: body.has_viewed_contacts_tutorial,
        profile: body.has_viewed_profile_tutorial,
    };

    let user = state
        .with_store(move |store| {
            let user = user_by_email(store, &email)?;
            store
                .users()
                .set_tutorials(user.id, flags)
                .map_err(missing_as(NO_USER))
        })
        .await?;
    Ok(Json(UserDto::from(&user)))
}
