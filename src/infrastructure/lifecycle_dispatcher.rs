use std::sync::Arc;

use crate::{
    domain::{
        error::DomainError,
        events::{EventSubscriber, LifecycleEvent, LifecycleEventArgs, PreUpdateEventArgs},
        models::entity::{Entity, EntitySnapshot},
        repositories::unit_of_work::ChangeSet,
    },
    infrastructure::tracking_unit_of_work::{MetadataRegistry, TrackingSession},
};

/// Runs the registered subscribers at the hook points of the save pipeline
#[derive(Clone)]
pub struct LifecycleDispatcher {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
    metadata: Arc<MetadataRegistry>,
}

impl LifecycleDispatcher {
    pub fn new(metadata: MetadataRegistry) -> Self {
        Self {
            subscribers: Vec::new(),
            metadata: Arc::new(metadata),
        }
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn EventSubscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn metadata(&self) -> &MetadataRegistry {
        &self.metadata
    }

    fn subscribed(&self, event: LifecycleEvent) -> impl Iterator<Item = &Arc<dyn EventSubscriber>> {
        self.subscribers
            .iter()
            .filter(move |subscriber| subscriber.subscribed_events().contains(&event))
    }

    /// Run the pre-insert hooks
    pub fn before_insert(&self, entity: &mut dyn Entity) -> Result<(), DomainError> {
        for subscriber in self.subscribed(LifecycleEvent::PrePersist) {
            subscriber.pre_persist(&mut LifecycleEventArgs::new(&mut *entity))?;
        }
        Ok(())
    }

    /// Diff the entity against its persisted state, run the pre-update
    /// hooks and return the change set left once they are done
    pub fn before_update(
        &self,
        entity: &mut dyn Entity,
        original: EntitySnapshot,
    ) -> Result<ChangeSet, DomainError> {
        let id = entity.identifier();
        let metadata = self.metadata.get(&entity.entity_type())?;

        let mut session = TrackingSession::new(Arc::clone(&self.metadata));
        session.tracking().register_managed(id, original);
        session.tracking().compute_change_set(metadata, &*entity)?;

        for subscriber in self.subscribed(LifecycleEvent::PreUpdate) {
            subscriber.pre_update(&mut PreUpdateEventArgs::new(&mut *entity, &mut session))?;
        }

        Ok(session.into_unit_of_work().take_change_set(&id))
    }
}
