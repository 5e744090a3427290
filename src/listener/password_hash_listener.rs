use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::debug;

use crate::domain::{
    error::DomainError,
    events::{EventSubscriber, LifecycleEvent, LifecycleEventArgs, PreUpdateEventArgs},
    models::entity::Entity,
    services::password_service::EncoderFactory,
};

const SUBSCRIBED_EVENTS: &[LifecycleEvent] =
    &[LifecycleEvent::PrePersist, LifecycleEvent::PreUpdate];

/// Hashes the staged plain password of users right before they are saved
pub struct PasswordHashListener {
    encoder_factory: Arc<dyn EncoderFactory>,
}

impl PasswordHashListener {
    pub fn new(encoder_factory: Arc<dyn EncoderFactory>) -> Self {
        Self { encoder_factory }
    }

    /// Replace the stored password with the encoded plain password, then
    /// erase transient secrets. Returns whether the entity was touched.
    fn rehash_password(&self, entity: &mut dyn Entity) -> Result<bool, DomainError> {
        let entity_type = entity.entity_type();
        let Some(user) = entity.as_password_user() else {
            return Ok(false);
        };
        let Some(plain_password) = user
            .plain_password()
            .filter(|p| !p.expose_secret().is_empty())
        else {
            debug!(%entity_type, "no new password provided");
            return Ok(false);
        };

        let encoder = self.encoder_factory.get_encoder(&entity_type)?;
        let password = encoder.encode_password(plain_password.expose_secret(), user.salt())?;
        user.set_password(password);
        user.erase_credentials();

        if let Some(recoverable) = entity.as_recoverable_user() {
            recoverable.erase_password_recovery_key();
        }

        debug!(%entity_type, id = %entity.identifier(), "password rehashed");
        Ok(true)
    }
}

impl EventSubscriber for PasswordHashListener {
    fn subscribed_events(&self) -> &'static [LifecycleEvent] {
        SUBSCRIBED_EVENTS
    }

    fn pre_persist(&self, args: &mut LifecycleEventArgs<'_>) -> Result<(), DomainError> {
        self.rehash_password(args.entity())?;
        Ok(())
    }

    fn pre_update(&self, args: &mut PreUpdateEventArgs<'_>) -> Result<(), DomainError> {
        let (entity, session) = args.parts();
        if !self.rehash_password(&mut *entity)? {
            return Ok(());
        }

        // the framework already diffed this entity, tell it about our changes
        let metadata = session.class_metadata(&entity.entity_type())?;
        session
            .unit_of_work()
            .recompute_single_entity_change_set(&metadata, &*entity)?;
        Ok(())
    }
}
