use std::sync::Arc;

use crate::domain::{
    error::DomainError,
    models::entity::EntityType,
    services::password_service::{EncoderFactory, PasswordEncoder},
};

/// Hands out the same encoder whatever the entity type
#[derive(Clone)]
pub struct SharedEncoderFactory {
    encoder: Arc<dyn PasswordEncoder>,
}

impl SharedEncoderFactory {
    pub fn new(encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { encoder }
    }
}

impl EncoderFactory for SharedEncoderFactory {
    fn get_encoder(
        &self,
        _entity_type: &EntityType,
    ) -> Result<Arc<dyn PasswordEncoder>, DomainError> {
        Ok(Arc::clone(&self.encoder))
    }
}
