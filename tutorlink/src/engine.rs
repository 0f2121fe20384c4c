//! Engine wiring: store, notifications, relationship service and sweeper

use crate::config::TutorlinkConfig;
use crate::notifications::{LogNotifier, NotificationDispatcher, WebhookNotifier};
use crate::relationships::{CapacityGuard, RelationshipService};
use crate::storage::{PairingStore, create_store};
use crate::sweeper::ExpirySweeper;
use crate::Result;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A fully wired Tutorlink instance.
///
/// Owns the store, the notification dispatcher, the relationship service and
/// the expiry sweeper. The service and the sweeper share one
/// [`CapacityGuard`], so sweeps and user operations on the same provider never
/// interleave.
#[derive(Debug)]
pub struct Tutorlink {
    config: TutorlinkConfig,
    store: Arc<dyn PairingStore>,
    dispatcher: NotificationDispatcher,
    service: RelationshipService,
    sweeper: Arc<ExpirySweeper>,
    shutdown: CancellationToken,
    sweeper_task: Mutex<Option<JoinHandle<()>>>,
}

impl Tutorlink {
    /// Open the configured store and register the configured notifiers
    pub async fn new(config: TutorlinkConfig) -> Result<Self> {
        let store = create_store(&config.storage.surrealdb).await?;
        Self::with_store(config, store).await
    }

    /// Wire an engine around an already opened store
    pub async fn with_store(config: TutorlinkConfig, store: Arc<dyn PairingStore>) -> Result<Self> {
        let dispatcher = NotificationDispatcher::new();

        if config.notifications.log_notifications {
            dispatcher
                .register(Arc::new(LogNotifier::new(config.notifications.timeout_ms)))
                .await;
        }
        if let Some(webhook) = &config.notifications.webhook {
            info!(url = %webhook.url, "Registering webhook notifier");
            dispatcher
                .register(Arc::new(WebhookNotifier::from_config(webhook)))
                .await;
        }

        let guard = Arc::new(CapacityGuard::new());
        let service =
            RelationshipService::new(Arc::clone(&store), Arc::clone(&guard), dispatcher.clone());
        let sweeper = Arc::new(ExpirySweeper::new(
            Arc::clone(&store),
            guard,
            dispatcher.clone(),
            config.sweeper.clone(),
        ));

        info!(
            engine = config.storage.surrealdb.engine.as_str(),
            notifiers = dispatcher.notifier_count().await,
            "Tutorlink engine ready"
        );

        Ok(Self {
            config,
            store,
            dispatcher,
            service,
            sweeper,
            shutdown: CancellationToken::new(),
            sweeper_task: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &TutorlinkConfig {
        &self.config
    }

    /// User, subject and relationship storage
    pub fn store(&self) -> &Arc<dyn PairingStore> {
        &self.store
    }

    pub fn service(&self) -> &RelationshipService {
        &self.service
    }

    pub fn sweeper(&self) -> &Arc<ExpirySweeper> {
        &self.sweeper
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Token cancelled by [`Tutorlink::shutdown`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Start the periodic sweeper task.
    ///
    /// Returns false when the sweeper is disabled in the configuration or
    /// already running.
    pub fn start_sweeper(&self) -> bool {
        if !self.config.sweeper.enabled {
            info!("Expiry sweeper disabled by configuration");
            return false;
        }

        let mut task = self
            .sweeper_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        *task = Some(Arc::clone(&self.sweeper).spawn(self.shutdown.child_token()));
        true
    }

    /// Stop the sweeper, wait for outstanding notifications and close the store
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let task = self
            .sweeper_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = task
            && let Err(e) = handle.await
        {
            warn!(error = %e, "Expiry sweeper task ended abnormally");
        }

        self.dispatcher.drain().await;

        if let Err(e) = self.store.close().await {
            warn!(error = %e, "Failed to close store");
        }
        info!("Tutorlink engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[tokio::test]
    async fn test_engine_registers_configured_notifiers() {
        let config = ConfigBuilder::testing()
            .with_webhook("http://localhost:9/events")
            .build()
            .unwrap();
        let engine = Tutorlink::new(config).await.unwrap();

        assert_eq!(engine.dispatcher().list_notifiers().await, vec!["webhook", "log"]);
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_respects_enabled_flag() {
        let disabled = Tutorlink::new(ConfigBuilder::testing().build().unwrap())
            .await
            .unwrap();
        assert!(!disabled.start_sweeper());
        disabled.shutdown().await;

        let mut config = ConfigBuilder::testing()
            .with_sweep_interval(std::time::Duration::from_secs(3600))
            .build()
            .unwrap();
        config.sweeper.enabled = true;
        let engine = Tutorlink::new(config).await.unwrap();
        assert!(engine.start_sweeper());
        assert!(!engine.start_sweeper());
        engine.shutdown().await;
    }
}
