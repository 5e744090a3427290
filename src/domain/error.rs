use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::entity::EntityType;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Weak password (minimum {0} characters required)")]
    WeakPassword(usize),

    #[error("Invalid salt")]
    InvalidSalt,

    #[error("Empty username")]
    EmptyUsername,

    #[error("Invalid password recovery key")]
    InvalidRecoveryKey,

    #[error("Password encoding failed: {0}")]
    Encoding(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Failures raised by the unit of work or the metadata lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("No class metadata registered for {0}")]
    MissingMetadata(EntityType),

    #[error("Entity {0} is not managed by the unit of work")]
    EntityNotManaged(Uuid),
}
