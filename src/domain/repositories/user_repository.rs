use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::user::User,
};

/// Storage of users; saving runs the lifecycle hooks on the given user
#[async_trait]
pub trait UserRepository {
    async fn insert(&self, user: &mut User) -> Result<(), DomainError>;
    async fn update(&self, user: &mut User) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}
