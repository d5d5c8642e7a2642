pub mod activities;
pub mod contacts;
pub mod dashboard;
pub mod goals;
pub mod subscriptions;
pub mod users;

use std::str::FromStr;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use kindred_core::domain::User;
use kindred_store::{Store, StoreError, StoreErrorKind};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::{bad_request, not_found, ApiError, ApiResult};
use crate::state::AppState;

pub(crate) const MISSING_EMAIL: &str = "Missing Email";
pub(crate) const MISSING_ENDPOINT: &str = "Missing Endpoint";
pub(crate) const NO_USER: &str = "No User Found";
pub(crate) const NO_CONTACT: &str = "No Contact Found";
pub(crate) const NO_ACTIVITY: &str = "No Activity Found";
pub(crate) const NO_SUBSCRIPTION: &str = "No Subscription Found";

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/users", get(users::get_user).post(users::upsert_user))
        .route("/users/tutorials", put(users::set_tutorials))
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/contacts/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route(
            "/contacts/{id}/activities",
            post(activities::create_activity),
        )
        .route(
            "/contacts/{id}/activities/{activity_id}",
            put(activities::update_activity).delete(activities::delete_activity),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/goals", get(goals::get_goals).put(goals::put_goals))
        .route("/subscriptions", post(subscriptions::create_subscription))
        .route(
            "/notifications",
            get(subscriptions::get_notifications)
                .post(subscriptions::update_notifications)
                .put(subscriptions::update_notifications),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
}

async fn health() -> Json<HealthDto> {
    Json(HealthDto { status: "ok" })
}

#[derive(Debug, Serialize)]
pub struct AckDto {
    pub success: bool,
}

impl AckDto {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Trimmed, non-empty value of a required parameter.
pub(crate) fn required(value: Option<String>, message: &str) -> ApiResult<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| bad_request(message))
}

pub(crate) fn user_by_email(store: &Store, email: &str) -> ApiResult<User> {
    store
        .users()
        .find_by_email(email)?
        .ok_or_else(|| not_found(NO_USER))
}

/// Ids arrive as path segments; an id that does not parse names nothing.
pub(crate) fn parse_id<T: FromStr>(raw: &str, message: &str) -> ApiResult<T> {
    raw.trim().parse().map_err(|_| not_found(message))
}

/// Replaces the store's generic not-found with a resource-specific message.
pub(crate) fn missing_as(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
    move |err| match err.kind() {
        StoreErrorKind::NotFound => not_found(message),
        _ => ApiError::Store(err),
    }
}
