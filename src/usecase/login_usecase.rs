use std::sync::Arc;

use tracing::warn;

use crate::domain::{
    error::DomainError,
    models::{
        entity::{Entity, PasswordUser},
        user::User,
    },
    repositories::user_repository::UserRepository,
    services::password_service::EncoderFactory,
};

pub struct LoginUsecase<U: UserRepository> {
    user_repository: U,
    encoder_factory: Arc<dyn EncoderFactory>,
}

impl<U: UserRepository> LoginUsecase<U> {
    pub fn new(user_repository: U, encoder_factory: Arc<dyn EncoderFactory>) -> Self {
        Self {
            user_repository,
            encoder_factory,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, DomainError>
    where
        U: Send + Sync,
    {
        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(DomainError::AuthenticationFailed)?;

        let Some(password_hash) = user.password() else {
            warn!(username, "login attempt on user without password");
            return Err(DomainError::AuthenticationFailed);
        };

        let encoder = self.encoder_factory.get_encoder(&user.entity_type())?;
        if !encoder.is_password_valid(password_hash, password, user.salt())? {
            warn!(username, "invalid password");
            return Err(DomainError::AuthenticationFailed);
        }

        Ok(user)
    }
}
