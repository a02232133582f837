//! Identity service — registration, login, and deactivation.

use folio_core::error::{FolioError, FolioResult};
use folio_core::models::user::{CreateUser, User};
use folio_core::repository::UserRepository;
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Identity service.
///
/// Generic over the repository implementation so that this crate has
/// no dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    /// Register a new user with a hashed credential.
    ///
    /// Fails with Conflict when the email is already registered to an
    /// active user.
    pub async fn register(&self, input: RegisterInput) -> FolioResult<User> {
        if input.password.len() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort(self.config.min_password_length).into());
        }

        match self.user_repo.get_by_email(&input.email).await {
            Ok(_) => return Err(AuthError::EmailTaken.into()),
            Err(FolioError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let password_hash =
            password::hash_password(&input.password, self.config.pepper.as_deref())?;

        let user = self
            .user_repo
            .create(CreateUser {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, name = %user.full_name(), "Registered user");
        Ok(user)
    }

    /// Authenticate a user with email + password.
    ///
    /// On success the user's `last_login_at` is stamped and the user
    /// record is returned. Inactive users are invisible to the email
    /// lookup and fail the same way a bad password does.
    pub async fn login(&self, email: &str, password: &str) -> FolioResult<User> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        let valid = password::verify_password(
            password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.user_repo.touch_last_login(user.id).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Deactivate a user (soft delete). The record is retained but
    /// disappears from all default lookups.
    pub async fn deactivate(&self, user_id: Uuid) -> FolioResult<()> {
        // Surface NotFound for unknown or already-inactive users.
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.deactivate(user_id).await?;

        info!(user_id = %user_id, "User deactivated");
        Ok(())
    }
}
