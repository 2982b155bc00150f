//! Service context - dependency container for services
//!
//! Holds the repositories, the transactional store and shared settings.

use std::sync::Arc;

use inbox_common::auth::JwtService;
use inbox_common::config::MessagingConfig;
use inbox_core::traits::{
    HistoryRepository, MessageRepository, MessagingStore, NotificationRepository, UserRepository,
};

/// Service context containing all dependencies
///
/// Read paths go through the repositories. Writes that carry a lifecycle
/// hook go through `store`, one transaction per operation.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    message_repo: Arc<dyn MessageRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    history_repo: Arc<dyn HistoryRepository>,

    // Transactional writes
    store: Arc<dyn MessagingStore>,

    // Services
    jwt_service: Arc<JwtService>,
    messaging: MessagingConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        message_repo: Arc<dyn MessageRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        history_repo: Arc<dyn HistoryRepository>,
        store: Arc<dyn MessagingStore>,
        jwt_service: Arc<JwtService>,
        messaging: MessagingConfig,
    ) -> Self {
        Self {
            user_repo,
            message_repo,
            notification_repo,
            history_repo,
            store,
            jwt_service,
            messaging,
        }
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    pub fn history_repo(&self) -> &dyn HistoryRepository {
        self.history_repo.as_ref()
    }

    /// Get the transactional store
    pub fn store(&self) -> &dyn MessagingStore {
        self.store.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Messaging settings (history policy, content limits)
    pub fn messaging(&self) -> &MessagingConfig {
        &self.messaging
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("store", &"dyn MessagingStore")
            .field("messaging", &self.messaging)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    history_repo: Option<Arc<dyn HistoryRepository>>,
    store: Option<Arc<dyn MessagingStore>>,
    jwt_service: Option<Arc<JwtService>>,
    messaging: Option<MessagingConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn history_repo(mut self, repo: Arc<dyn HistoryRepository>) -> Self {
        self.history_repo = Some(repo);
        self
    }

    pub fn store(mut self, store: Arc<dyn MessagingStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Defaults to `MessagingConfig::default()` when unset
    pub fn messaging(mut self, config: MessagingConfig) -> Self {
        self.messaging = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.user_repo.ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.message_repo.ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.notification_repo
                .ok_or_else(|| ServiceError::validation("notification_repo is required"))?,
            self.history_repo.ok_or_else(|| ServiceError::validation("history_repo is required"))?,
            self.store.ok_or_else(|| ServiceError::validation("store is required"))?,
            self.jwt_service.ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.messaging.unwrap_or_default(),
        ))
    }
}
