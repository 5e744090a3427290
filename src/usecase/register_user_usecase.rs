use tracing::info;

use crate::domain::{
    error::DomainError, models::user::User, repositories::user_repository::UserRepository,
};

pub struct RegisterUserUsecase<R: UserRepository> {
    user_repository: R,
}

impl<R: UserRepository> RegisterUserUsecase<R> {
    pub fn new(user_repository: R) -> Self {
        Self { user_repository }
    }

    pub async fn create_user(&self, username: String, password: String) -> Result<User, DomainError>
    where
        R: Send + Sync,
    {
        let mut user = User::new(username)?;

        // hashed by the pre-insert hook
        user.set_plain_password(password);
        self.user_repository.insert(&mut user).await?;

        info!(id = %user.id().as_uuid(), username = user.username(), "user registered");
        Ok(user)
    }
}
