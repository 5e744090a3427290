use std::fmt;

use crate::domain::{
    error::DomainError,
    models::entity::Entity,
    repositories::unit_of_work::PersistenceSession,
};

/// Points of the save pipeline a subscriber can hook into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    PrePersist,
    PreUpdate,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::PrePersist => f.write_str("prePersist"),
            LifecycleEvent::PreUpdate => f.write_str("preUpdate"),
        }
    }
}

/// Arguments of a pre-insert callback
pub struct LifecycleEventArgs<'a> {
    entity: &'a mut dyn Entity,
}

impl<'a> LifecycleEventArgs<'a> {
    pub fn new(entity: &'a mut dyn Entity) -> Self {
        Self { entity }
    }

    pub fn entity(&mut self) -> &mut (dyn Entity + 'a) {
        &mut *self.entity
    }
}

/// Arguments of a pre-update callback
pub struct PreUpdateEventArgs<'a> {
    entity: &'a mut dyn Entity,
    session: &'a mut dyn PersistenceSession,
}

impl<'a> PreUpdateEventArgs<'a> {
    pub fn new(entity: &'a mut dyn Entity, session: &'a mut dyn PersistenceSession) -> Self {
        Self { entity, session }
    }

    pub fn entity(&mut self) -> &mut (dyn Entity + 'a) {
        &mut *self.entity
    }

    /// Entity and session borrowed together, for listeners that mutate the
    /// entity and then notify the unit of work
    pub fn parts(
        &mut self,
    ) -> (
        &mut (dyn Entity + 'a),
        &mut (dyn PersistenceSession + 'a),
    ) {
        (&mut *self.entity, &mut *self.session)
    }
}

/// Listener registered with the persistence layer.
///
/// Callbacks are only invoked for the events listed by
/// [`EventSubscriber::subscribed_events`].
pub trait EventSubscriber: Send + Sync {
    fn subscribed_events(&self) -> &'static [LifecycleEvent];

    fn pre_persist(&self, _args: &mut LifecycleEventArgs<'_>) -> Result<(), DomainError> {
        Ok(())
    }

    fn pre_update(&self, _args: &mut PreUpdateEventArgs<'_>) -> Result<(), DomainError> {
        Ok(())
    }
}
