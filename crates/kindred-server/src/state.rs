use std::sync::{Arc, Mutex};

use chrono::FixedOffset;
use kindred_config::AppConfig;
use kindred_core::time::local_offset;
use kindred_store::Store;

use crate::error::ApiError;

/// Shared handler state. The store sits behind a mutex because a rusqlite
/// connection is not `Sync`; every handler borrows it for the length of one
/// blocking closure.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    settings: Arc<ApiSettings>,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub utc_offset: Option<FixedOffset>,
    pub default_goal_days: i32,
}

impl From<&AppConfig> for ApiSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            utc_offset: config.utc_offset,
            default_goal_days: config.default_goal_days,
        }
    }
}

impl AppState {
    pub fn new(store: Store, settings: ApiSettings) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            settings: Arc::new(settings),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.settings.utc_offset.unwrap_or_else(local_offset)
    }

    pub fn default_goal_days(&self) -> i32 {
        self.settings.default_goal_days
    }

    /// Runs `f` against the store on the blocking pool.
    pub async fn with_store<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Store) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}
