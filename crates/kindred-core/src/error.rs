use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("first name is required")]
    EmptyFirstName,
    #[error("email is required")]
    EmptyEmail,
    #[error("invalid goal days: {0}")]
    InvalidGoalDays(i32),
    #[error("invalid goal target: {0}")]
    InvalidGoalTarget(i32),
    #[error("invalid activity type: {0}")]
    InvalidActivityKind(String),
    #[error("push endpoint is required")]
    EmptyEndpoint,
}
