//! Account service
//!
//! Handles registration, login, profile lookup and account deletion.

use inbox_common::auth::{hash_password, verify_password};
use inbox_common::AppError;
use inbox_core::entities::User;
use inbox_core::value_objects::UserId;
use inbox_core::DomainError;
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::hooks::{self, CleanupReport};

/// Account service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        if self.ctx.user_repo().username_exists(&request.username).await? {
            return Err(DomainError::UsernameAlreadyExists.into());
        }
        if self.ctx.user_repo().email_exists(&request.email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let user = User::new(request.username, request.email);

        // Unique constraints still catch a concurrent registration
        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User registered successfully");

        self.issue_token(&user)
    }

    /// Login with username and password
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| {
                warn!(username = %request.username, "Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        info!(user_id = %user.id, "User logged in successfully");

        self.issue_token(&user)
    }

    /// The authenticated user's own profile
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: UserId) -> ServiceResult<CurrentUserResponse> {
        let user = self.find_user(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Public profile of any user
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<UserResponse> {
        let user = self.find_user(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    /// Delete the account and everything that references it
    ///
    /// Storage cascades remove the user's messages. The cleanup hook then runs
    /// in the same transaction and sweeps any notification or history row the
    /// cascade left behind.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: UserId) -> ServiceResult<CleanupReport> {
        let mut tx = self.ctx.store().begin().await?;

        if !tx.delete_user(user_id).await? {
            return Err(ServiceError::not_found("User", user_id.to_string()));
        }

        let report = hooks::cleanup_user_data(tx.as_mut(), user_id).await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            notifications_for_user = report.notifications_for_user,
            notifications_for_received = report.notifications_for_received,
            history_by_editor = report.history_by_editor,
            "Account deleted"
        );

        Ok(report)
    }

    // === Helpers ===

    async fn find_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    fn issue_token(&self, user: &User) -> ServiceResult<AuthResponse> {
        let jwt = self.ctx.jwt_service();
        let access_token = jwt.generate_access_token(user.id, &user.username)?;

        Ok(AuthResponse::new(
            access_token,
            jwt.access_token_expiry(),
            CurrentUserResponse::from(user),
        ))
    }
}
