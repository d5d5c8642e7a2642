use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::FixedOffset;
use kindred_config::{PushBackend, PushConfig};
use kindred_core::domain::{Subscription, UserId};
use kindred_store::Store;
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::actions::load_dashboard_actions;

pub const NEW_ACTION_TITLE: &str = "New Action Alert";
pub const NEW_ACTION_BODY: &str = "New actions on your dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}

impl PushPayload {
    pub fn new_action() -> Self {
        Self {
            title: NEW_ACTION_TITLE.to_string(),
            body: NEW_ACTION_BODY.to_string(),
        }
    }
}

pub trait PushSender {
    fn send(&self, subscription: &Subscription, payload: &PushPayload) -> Result<()>;
}

/// Writes notifications to the log instead of delivering them.
pub struct LogPushSender;

impl PushSender for LogPushSender {
    fn send(&self, subscription: &Subscription, payload: &PushPayload) -> Result<()> {
        info!(
            subscription_id = %subscription.id,
            endpoint = %subscription.endpoint,
            title = %payload.title,
            body = %payload.body,
            "push notification"
        );
        Ok(())
    }
}

/// Hands each notification to an HTTP relay that owns the VAPID keys and
/// performs the Web Push encryption.
pub struct RelayPushSender {
    client: Client,
    url: Url,
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    endpoint: &'a str,
    keys: RelayKeys<'a>,
    payload: &'a PushPayload,
}

#[derive(Debug, Serialize)]
struct RelayKeys<'a> {
    p256dh: &'a str,
    auth: &'a str,
}

impl RelayPushSender {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .with_context(|| "build push relay client")?;
        Ok(Self { client, url })
    }
}

impl PushSender for RelayPushSender {
    fn send(&self, subscription: &Subscription, payload: &PushPayload) -> Result<()> {
        let request = RelayRequest {
            endpoint: &subscription.endpoint,
            keys: RelayKeys {
                p256dh: &subscription.p256dh,
                auth: &subscription.auth,
            },
            payload,
        };
        self.client
            .post(self.url.clone())
            .json(&request)
            .send()
            .with_context(|| format!("post to push relay {}", self.url))?
            .error_for_status()
            .with_context(|| format!("push relay rejected {}", subscription.id))?;
        Ok(())
    }
}

/// Builds the sender named by `[push] backend`.
pub fn sender_from_config(config: &PushConfig) -> Result<Box<dyn PushSender>> {
    match config.backend {
        PushBackend::Log => Ok(Box::new(LogPushSender)),
        PushBackend::Relay => {
            let url = config
                .relay_url
                .clone()
                .with_context(|| "push.relay_url is required for the relay backend")?;
            let timeout = Duration::from_secs(config.timeout_seconds);
            Ok(Box::new(RelayPushSender::new(url, timeout)?))
        }
    }
}

/// `failed` also counts subscriptions skipped because their owner's
/// actions could not be loaded; those are not `attempted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Sends a new-action alert to every opted-in subscription whose owner has
/// something on the dashboard. A failed delivery, or an owner whose actions
/// cannot be loaded, is logged and counted without stopping the batch.
pub fn dispatch_new_action_alerts(
    store: &Store,
    sender: &dyn PushSender,
    now_utc: i64,
    offset: FixedOffset,
) -> Result<DispatchSummary> {
    let subscriptions = store
        .subscriptions()
        .list_new_action()
        .with_context(|| "list push subscriptions")?;
    let payload = PushPayload::new_action();
    // `None` marks an owner whose actions could not be loaded.
    let mut has_actions: HashMap<UserId, Option<bool>> = HashMap::new();
    let mut summary = DispatchSummary::default();

    for subscription in &subscriptions {
        let owner = subscription.user_id;
        let due = *has_actions.entry(owner).or_insert_with(|| {
            match load_dashboard_actions(store, owner, now_utc, offset) {
                Ok(actions) => Some(!actions.is_empty()),
                Err(err) => {
                    warn!(user_id = %owner, error = %err, "loading actions failed");
                    None
                }
            }
        });

        let Some(due) = due else {
            summary.failed += 1;
            continue;
        };

        if !due {
            debug!(subscription_id = %subscription.id, "no actions, skipping");
            summary.skipped += 1;
            continue;
        }

        summary.attempted += 1;
        match sender.send(subscription, &payload) {
            Ok(()) => summary.delivered += 1,
            Err(err) => {
                warn!(subscription_id = %subscription.id, error = %err, "push delivery failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        attempted = summary.attempted,
        delivered = summary.delivered,
        failed = summary.failed,
        skipped = summary.skipped,
        "push dispatch finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_config::AppConfig;

    #[test]
    fn new_action_payload_text() {
        let payload = PushPayload::new_action();
        assert_eq!(payload.title, "New Action Alert");
        assert_eq!(payload.body, "New actions on your dashboard");
    }

    #[test]
    fn relay_backend_without_url_is_rejected() {
        let mut config = AppConfig::default().push;
        config.backend = PushBackend::Relay;
        assert!(sender_from_config(&config).is_err());
    }

    #[test]
    fn relay_request_shape() {
        let payload = PushPayload::new_action();
        let request = RelayRequest {
            endpoint: "https://push.example/abc",
            keys: RelayKeys {
                p256dh: "key",
                auth: "secret",
            },
            payload: &payload,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["endpoint"], "https://push.example/abc");
        assert_eq!(value["keys"]["p256dh"], "key");
        assert_eq!(value["payload"]["title"], "New Action Alert");
    }
}
