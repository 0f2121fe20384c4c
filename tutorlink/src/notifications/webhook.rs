//! Webhook delivery of relationship notifications
//!
//! [`WebhookNotifier`] POSTs every notification as JSON to a configured URL,
//! retrying failed requests with exponential backoff.

use super::traits::{Notifier, NotifyError};
use super::types::Notification;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for webhook requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f32,
    /// Maximum backoff duration in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            backoff_multiplier: 2.0,
            max_backoff_ms: 10000,
        }
    }
}

impl RetryPolicy {
    /// A policy that sends each notification exactly once
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt + 1`
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let backoff_ms =
            (self.initial_backoff_ms as f32 * self.backoff_multiplier.powi(attempt as i32)) as u64;
        Duration::from_millis(backoff_ms.min(self.max_backoff_ms))
    }

    /// Sum of all backoffs when every attempt fails
    pub fn total_backoff(&self) -> Duration {
        (0..self.max_retries).map(|a| self.backoff_duration(a)).sum()
    }
}

/// Notifier that POSTs notifications to a remote endpoint
///
/// # Example
///
/// ```no_run
/// use tutorlink::notifications::WebhookNotifier;
///
/// let notifier = WebhookNotifier::new("http://app-server:8000/api/relationship-events")
///     .with_header("Authorization", "Bearer token123");
/// ```
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Timeout of one HTTP request
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: Duration::from_secs(10),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Build a notifier from the webhook section of the configuration
    pub fn from_config(config: &crate::config::WebhookConfig) -> Self {
        Self::new(config.url.clone())
            .with_timeout(config.timeout)
            .with_retry_policy(config.retry.clone())
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Request body for a notification
    pub fn payload(notification: &Notification) -> Result<serde_json::Value, NotifyError> {
        Ok(serde_json::json!({
            "event": notification.kind.event_name(),
            "timestamp": Utc::now().to_rfc3339(),
            "data": serde_json::to_value(notification)?,
        }))
    }

    async fn send_with_retry(
        &self,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<(), NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| NotifyError::Delivery(format!("Failed to create HTTP client: {}", e)))?;

        let attempts = self.retry_policy.max_retries + 1;
        let mut last_error = String::from("no attempt made");

        for attempt in 0..attempts {
            match self.send_request(&client, event, payload).await {
                Ok(()) => {
                    debug!(event, url = %self.url, attempts = attempt + 1, "Webhook delivered");
                    return Ok(());
                }
                Err(e) => {
                    if attempt + 1 < attempts {
                        let backoff = self.retry_policy.backoff_duration(attempt);
                        warn!(
                            event,
                            attempt = attempt + 1,
                            max_attempts = attempts,
                            ?backoff,
                            error = %e,
                            "Webhook request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                    last_error = e;
                }
            }
        }

        Err(NotifyError::Delivery(format!(
            "{} failed after {} attempts: {}",
            self.url, attempts, last_error
        )))
    }

    async fn send_request(
        &self,
        client: &reqwest::Client,
        event: &str,
        payload: &serde_json::Value,
    ) -> Result<(), String> {
        let mut request = client.post(&self.url).json(payload);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request = request
            .header("X-Webhook-Event", event)
            .header("User-Agent", concat!("Tutorlink-Webhook/", env!("CARGO_PKG_VERSION")));

        let response = request
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ))
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = Self::payload(notification)?;
        self.send_with_retry(notification.kind.event_name(), &payload)
            .await
    }

    /// Covers every attempt plus the backoffs between them
    fn timeout_ms(&self) -> u64 {
        let attempts = self.retry_policy.max_retries + 1;
        let budget = self.timeout * attempts + self.retry_policy.total_backoff();
        budget.as_millis() as u64
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
