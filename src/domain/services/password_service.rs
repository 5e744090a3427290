use std::sync::Arc;

use crate::domain::{
    error::DomainError,
    models::{credential::HashedPassword, entity::EntityType},
};

/// Service for encoding and verifying salted passwords
pub trait PasswordEncoder: Send + Sync {
    /// Encode a plain text password with the given salt
    fn encode_password(&self, raw: &str, salt: &str) -> Result<HashedPassword, DomainError>;

    /// Check a plain text password against an encoded one
    fn is_password_valid(
        &self,
        encoded: &HashedPassword,
        raw: &str,
        salt: &str,
    ) -> Result<bool, DomainError>;
}

/// Resolves the encoder to use for a given kind of entity
pub trait EncoderFactory: Send + Sync {
    fn get_encoder(&self, entity_type: &EntityType)
    -> Result<Arc<dyn PasswordEncoder>, DomainError>;
}
