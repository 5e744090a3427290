use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;

use crate::domain::{
    error::PersistenceError,
    models::entity::{Entity, EntitySnapshot, EntityType},
    repositories::unit_of_work::{
        ChangeSet, ClassMetadata, FieldChange, PersistenceSession, UnitOfWork,
    },
};

/// Class metadata of every persisted type, keyed by entity type
#[derive(Debug, Default, Clone)]
pub struct MetadataRegistry {
    metadata: HashMap<EntityType, ClassMetadata>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, metadata: ClassMetadata) -> Self {
        self.metadata.insert(metadata.entity_type, metadata);
        self
    }

    pub fn get(&self, entity_type: &EntityType) -> Result<&ClassMetadata, PersistenceError> {
        self.metadata
            .get(entity_type)
            .ok_or(PersistenceError::MissingMetadata(*entity_type))
    }
}

/// Unit of work diffing entities against the snapshot they were loaded with
#[derive(Debug, Default)]
pub struct TrackingUnitOfWork {
    originals: HashMap<Uuid, EntitySnapshot>,
    change_sets: HashMap<Uuid, ChangeSet>,
}

impl TrackingUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an entity from its last persisted state
    pub fn register_managed(&mut self, id: Uuid, original: EntitySnapshot) {
        self.originals.insert(id, original);
        self.change_sets.remove(&id);
    }

    pub fn compute_change_set(
        &mut self,
        metadata: &ClassMetadata,
        entity: &dyn Entity,
    ) -> Result<(), PersistenceError> {
        let id = entity.identifier();
        let original = self
            .originals
            .get(&id)
            .ok_or(PersistenceError::EntityNotManaged(id))?;
        let current = entity.snapshot();

        let change_set: ChangeSet = metadata
            .fields
            .iter()
            .filter_map(|field| {
                let old = original.get(field).cloned().flatten();
                let new = current.get(field).cloned().flatten();
                (old != new).then_some((*field, FieldChange { old, new }))
            })
            .collect();

        self.change_sets.insert(id, change_set);
        Ok(())
    }

    pub fn change_set(&self, id: &Uuid) -> Option<&ChangeSet> {
        self.change_sets.get(id)
    }

    pub fn take_change_set(&mut self, id: &Uuid) -> ChangeSet {
        self.change_sets.remove(id).unwrap_or_default()
    }
}

impl UnitOfWork for TrackingUnitOfWork {
    fn recompute_single_entity_change_set(
        &mut self,
        metadata: &ClassMetadata,
        entity: &dyn Entity,
    ) -> Result<(), PersistenceError> {
        self.compute_change_set(metadata, entity)
    }
}

/// Session of one save operation
#[derive(Debug)]
pub struct TrackingSession {
    unit_of_work: TrackingUnitOfWork,
    metadata: Arc<MetadataRegistry>,
}

impl TrackingSession {
    pub fn new(metadata: Arc<MetadataRegistry>) -> Self {
        Self {
            unit_of_work: TrackingUnitOfWork::new(),
            metadata,
        }
    }

    pub fn tracking(&mut self) -> &mut TrackingUnitOfWork {
        &mut self.unit_of_work
    }

    pub fn into_unit_of_work(self) -> TrackingUnitOfWork {
        self.unit_of_work
    }
}

impl PersistenceSession for TrackingSession {
    fn unit_of_work(&mut self) -> &mut dyn UnitOfWork {
        &mut self.unit_of_work
    }

    fn class_metadata(&self, entity_type: &EntityType) -> Result<ClassMetadata, PersistenceError> {
        self.metadata.get(entity_type).cloned()
    }
}
