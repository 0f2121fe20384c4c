//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::num::NonZeroU32;
use std::sync::Arc;

use tutorlink::config::ConfigBuilder;
use tutorlink::notifications::MemoryNotifier;
use tutorlink::prelude::*;

/// Engine over an in-memory store with a capturing notifier registered
pub struct TestEngine {
    pub engine: Tutorlink,
    pub notifier: Arc<MemoryNotifier>,
}

impl TestEngine {
    pub async fn new() -> Self {
        let config = ConfigBuilder::testing()
            .without_log_notifications()
            .build()
            .expect("testing config is valid");
        let engine = Tutorlink::new(config)
            .await
            .expect("Failed to create test engine");
        Self::wrap(engine).await
    }

    pub async fn with_store(store: Arc<dyn PairingStore>) -> Self {
        let config = ConfigBuilder::testing()
            .without_log_notifications()
            .build()
            .expect("testing config is valid");
        let engine = Tutorlink::with_store(config, store)
            .await
            .expect("Failed to create test engine");
        Self::wrap(engine).await
    }

    async fn wrap(engine: Tutorlink) -> Self {
        let notifier = Arc::new(MemoryNotifier::new());
        engine.dispatcher().register(notifier.clone()).await;
        Self { engine, notifier }
    }

    pub fn service(&self) -> &RelationshipService {
        self.engine.service()
    }

    pub async fn add_requester(&self, id: &str) -> UserId {
        self.engine
            .store()
            .create_user(User::requester(id, format!("Requester {}", id)))
            .await
            .expect("Failed to create requester");
        UserId::from(id)
    }

    pub async fn add_provider(&self, id: &str, subjects: &[&str], limit: u32) -> UserId {
        let profile = ProviderProfile::new(
            subjects.iter().map(|s| SubjectId::from(*s)),
            NonZeroU32::new(limit).expect("limit must be positive"),
        );
        self.engine
            .store()
            .create_user(User::provider(id, format!("Provider {}", id), profile))
            .await
            .expect("Failed to create provider");
        UserId::from(id)
    }

    /// Wait until every dispatched notification has been delivered
    pub async fn settle(&self) {
        self.engine.dispatcher().drain().await;
    }

    pub async fn accepted_count(&self, provider: &UserId) -> usize {
        self.engine
            .store()
            .count_accepted(provider)
            .await
            .expect("Failed to count accepted relationships")
    }

    pub async fn relationship_count(&self) -> usize {
        self.engine
            .store()
            .count_relationships(None)
            .await
            .expect("Failed to count relationships")
    }
}

pub fn subjects(ids: &[&str]) -> Vec<SubjectId> {
    ids.iter().map(|s| SubjectId::from(*s)).collect()
}
