pub mod actions;
pub mod api;
pub mod error;
pub mod push;
pub mod state;

pub use api::build_router;
pub use error::ApiError;
pub use state::AppState;
