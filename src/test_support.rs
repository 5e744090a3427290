//! Doubles shared by the unit tests

use std::sync::Arc;

use crate::{
    domain::{
        error::DomainError, models::credential::HashedPassword,
        services::password_service::PasswordEncoder,
    },
    infrastructure::{
        encoder_factory::SharedEncoderFactory, lifecycle_dispatcher::LifecycleDispatcher,
        tracking_unit_of_work::MetadataRegistry,
    },
    listener::password_hash_listener::PasswordHashListener,
};

/// Encodes as `password#salt`
pub struct ConcatEncoder;

impl PasswordEncoder for ConcatEncoder {
    fn encode_password(&self, raw: &str, salt: &str) -> Result<HashedPassword, DomainError> {
        Ok(HashedPassword::new(format!("{}#{}", raw, salt)))
    }

    fn is_password_valid(
        &self,
        encoded: &HashedPassword,
        raw: &str,
        salt: &str,
    ) -> Result<bool, DomainError> {
        Ok(encoded.as_str() == format!("{}#{}", raw, salt))
    }
}

pub fn concat_encoder_factory() -> Arc<SharedEncoderFactory> {
    Arc::new(SharedEncoderFactory::new(Arc::new(ConcatEncoder)))
}

/// Dispatcher for users wired with the password hash listener
pub fn user_dispatcher() -> LifecycleDispatcher {
    let listener = PasswordHashListener::new(concat_encoder_factory());
    LifecycleDispatcher::new(
        MetadataRegistry::new().register(crate::domain::models::user::user_metadata()),
    )
    .with_subscriber(Arc::new(listener))
}
