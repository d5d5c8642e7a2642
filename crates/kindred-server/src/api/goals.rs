use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use kindred_core::dto::{GoalsDto, GoalsStatusDto};
use kindred_core::rules::goals_met;
use kindred_core::time::now_utc;
use serde::Deserialize;
use tracing::info;

use super::users::EmailQuery;
use super::{required, user_by_email, MISSING_EMAIL};
use crate::error::{bad_request, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsBody {
    pub goal_connections: Option<i32>,
    pub goal_messages: Option<i32>,
}

pub async fn get_goals(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<GoalsStatusDto>> {
    let email = required(query.email, MISSING_EMAIL)?;

    let status = state
        .with_store(move |store| {
            let user = user_by_email(store, &email)?;
            let goals = store.goals().get(user.id)?;
            Ok(GoalsStatusDto {
                is_meet_goals: goals.as_ref().is_some_and(goals_met),
                goals: goals.as_ref().map(GoalsDto::from),
            })
        })
        .await?;
    Ok(Json(status))
}

/// Sets both targets and re-arms the confetti latch.
pub async fn put_goals(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
    body: Result<Json<GoalsBody>, JsonRejection>,
) -> ApiResult<Json<GoalsDto>> {
    let email = required(query.email, MISSING_EMAIL)?;
    let Json(body) = body?;
    let (Some(goal_connections), Some(goal_messages)) = (body.goal_connections, body.goal_messages)
    else {
        return Err(bad_request("Missing Goals"));
    };
    let now = now_utc();

    let goals = state
        .with_store(move |store| {
            let user = user_by_email(store, &email)?;
            let goals = store
                .goals()
                .upsert_targets(now, user.id, goal_connections, goal_messages)?;
            info!(user_id = %user.id, goal_connections, goal_messages, "goals updated");
            Ok(goals)
        })
        .await?;
    Ok(Json(GoalsDto::from(&goals)))
}
