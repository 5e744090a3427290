use tracing::{info, warn};

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::user::User,
    repositories::user_repository::UserRepository,
};

/// Password reset through a one-time recovery key
pub struct PasswordRecoveryUsecase<U: UserRepository> {
    user_repository: U,
}

impl<U: UserRepository> PasswordRecoveryUsecase<U> {
    pub fn new(user_repository: U) -> Self {
        Self { user_repository }
    }

    async fn find_user(&self, username: &str) -> Result<User, DomainError>
    where
        U: Send + Sync,
    {
        Ok(self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(RepositoryError::NotFound)?)
    }

    /// Issue a recovery key for the user and store it.
    ///
    /// The key is returned so it can be delivered out of band.
    pub async fn request_recovery(&self, username: &str) -> Result<String, DomainError>
    where
        U: Send + Sync,
    {
        let mut user = self.find_user(username).await?;
        let key = user.generate_password_recovery_key().to_string();
        self.user_repository.update(&mut user).await?;

        info!(id = %user.id().as_uuid(), "password recovery requested");
        Ok(key)
    }

    /// Set a new password if the recovery key matches. Saving the user
    /// rehashes the password and invalidates the key.
    pub async fn reset_password(
        &self,
        username: &str,
        recovery_key: &str,
        new_password: String,
    ) -> Result<User, DomainError>
    where
        U: Send + Sync,
    {
        let mut user = self.find_user(username).await?;
        if !user.is_password_recovery_key_valid(recovery_key) {
            warn!(username, "invalid password recovery key");
            return Err(DomainError::InvalidRecoveryKey);
        }

        user.set_plain_password(new_password);
        self.user_repository.update(&mut user).await?;

        info!(id = %user.id().as_uuid(), "password reset");
        Ok(user)
    }
}
