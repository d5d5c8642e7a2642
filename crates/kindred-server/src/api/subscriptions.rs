use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use kindred_core::domain::SubscriptionId;
use kindred_core::dto::{NotificationSettingsDto, SubscriptionCreatedDto};
use kindred_core::time::now_utc;
use kindred_store::repo::{NotificationPreferences, SubscriptionNew};
use serde::Deserialize;
use tracing::info;

use super::{
    missing_as, parse_id, required, user_by_email, MISSING_EMAIL, MISSING_ENDPOINT,
    NO_SUBSCRIPTION,
};
use crate::error::{bad_request, not_found, ApiResult};
use crate::state::AppState;

/// Shape of a browser `PushSubscription` serialized to JSON.
#[derive(Debug, Deserialize)]
pub struct PushSubscriptionJson {
    pub endpoint: Option<String>,
    pub keys: Option<PushKeys>,
}

#[derive(Debug, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionBody {
    pub email: Option<String>,
    pub subscription: Option<PushSubscriptionJson>,
}

#[derive(Debug, Deserialize)]
pub struct EndpointQuery {
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsBody {
    pub subscription_id: Option<String>,
    pub new_action: bool,
    pub streak: bool,
    pub meet_goal: bool,
}

pub async fn create_subscription(
    State(state): State<AppState>,
    body: Result<Json<CreateSubscriptionBody>, JsonRejection>,
) -> ApiResult<Json<SubscriptionCreatedDto>> {
    let Json(body) = body?;
    let email = required(body.email, MISSING_EMAIL)?;
    let subscription = body
        .subscription
        .ok_or_else(|| bad_request("Missing Subscription"))?;
    let endpoint = required(subscription.endpoint, MISSING_ENDPOINT)?;
    let keys = subscription
        .keys
        .ok_or_else(|| bad_request("Missing Subscription Keys"))?;
    let now = now_utc();

    let created = state
        .with_store(move |store| {
            let user = user_by_email(store, &email)?;
            let subscription = store.subscriptions().upsert(
                now,
                SubscriptionNew {
                    user_id: user.id,
                    endpoint,
                    p256dh: keys.p256dh,
                    auth: keys.auth,
                },
            )?;
            info!(subscription_id = %subscription.id, user_id = %user.id, "push subscription saved");
            Ok(SubscriptionCreatedDto {
                id: subscription.id,
            })
        })
        .await?;
    Ok(Json(created))
}

pub async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<EndpointQuery>,
) -> ApiResult<Json<NotificationSettingsDto>> {
    let endpoint = required(query.endpoint, MISSING_ENDPOINT)?;

    let subscription = state
        .with_store(move |store| {
            store
                .subscriptions()
                .find_by_endpoint(&endpoint)?
                .ok_or_else(|| not_found(NO_SUBSCRIPTION))
        })
        .await?;
    Ok(Json(NotificationSettingsDto::from(&subscription)))
}

pub async fn update_notifications(
    State(state): State<AppState>,
    body: Result<Json<NotificationSettingsBody>, JsonRejection>,
) -> ApiResult<Json<NotificationSettingsDto>> {
    let Json(body) = body?;
    let raw_id = required(body.subscription_id, "Missing Subscription Id")?;
    let id: SubscriptionId = parse_id(&raw_id, NO_SUBSCRIPTION)?;
    let preferences = NotificationPreferences {
        new_action: body.new_action,
        streak: body.streak,
        meet_goal: body.meet_goal,
    };
    let now = now_utc();

    let subscription = state
        .with_store(move |store| {
            store
                .subscriptions()
                .update_preferences(now, id, preferences)
                .map_err(missing_as(NO_SUBSCRIPTION))
        })
        .await?;
    Ok(Json(NotificationSettingsDto::from(&subscription)))
}
