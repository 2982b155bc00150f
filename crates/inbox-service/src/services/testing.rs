//! Test harness wiring a [`ServiceContext`] to the in-memory store

use std::sync::Arc;

use inbox_common::auth::JwtService;
use inbox_common::config::MessagingConfig;
use inbox_core::entities::User;
use inbox_core::traits::UserRepository;
use inbox_core::value_objects::{HistoryPolicy, UserId};
use inbox_db::{InMemoryStore, StoreStats};

use super::context::ServiceContext;

pub(crate) struct Harness {
    pub store: InMemoryStore,
    pub ctx: ServiceContext,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(HistoryPolicy::default())
    }

    pub fn with_policy(history_policy: HistoryPolicy) -> Self {
        let store = InMemoryStore::new();
        let ctx = ServiceContext::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(JwtService::new("test-secret", 900)),
            MessagingConfig {
                history_policy,
                max_content_length: 50,
            },
        );
        Self { store, ctx }
    }

    /// Insert a user directly, bypassing registration
    pub async fn user(&self, username: &str) -> UserId {
        let user = User::new(username.to_string(), format!("{username}@example.com"));
        self.store.create(&user, "not-a-real-hash").await.unwrap();
        user.id
    }

    pub async fn stats(&self) -> StoreStats {
        self.store.stats().await
    }
}
