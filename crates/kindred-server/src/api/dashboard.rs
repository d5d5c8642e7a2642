use axum::extract::{Query, State};
use axum::Json;
use kindred_core::dto::DashboardDto;
use kindred_core::rules::goals_met;
use kindred_core::time::now_utc;

use super::users::EmailQuery;
use super::{required, user_by_email, MISSING_EMAIL};
use crate::actions::load_dashboard_actions;
use crate::error::ApiResult;
use crate::state::AppState;

/// Dashboard reminders plus the one-shot goals celebration. `showConfetti`
/// is true only on the read that flips the latch.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<Json<DashboardDto>> {
    let email = required(query.email, MISSING_EMAIL)?;
    let now = now_utc();
    let offset = state.offset();

    let dashboard = state
        .with_store(move |store| {
            let user = user_by_email(store, &email)?;
            let has_contacts = store.contacts().count_for_user(user.id)? > 0;
            let actions = load_dashboard_actions(store, user.id, now, offset)?;

            let show_confetti = match store.goals().get(user.id)? {
                Some(goals) if goals_met(&goals) && !goals.has_shown_confetti => {
                    store.goals().latch_confetti(now, user.id)?
                }
                _ => false,
            };

            Ok(DashboardDto {
                priority_actions: actions.priority,
                upcoming_actions: actions.upcoming,
                has_contacts,
                has_viewed_dashboard_tutorial: user.has_viewed_dashboard_tutorial,
                show_confetti,
            })
        })
        .await?;
    Ok(Json(dashboard))
}
