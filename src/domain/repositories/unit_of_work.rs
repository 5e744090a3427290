use std::collections::BTreeMap;

use crate::domain::{
    error::PersistenceError,
    models::entity::{Entity, EntityType},
};

/// Mapping information for one persisted type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    pub entity_type: EntityType,
    pub table_name: &'static str,
    /// Persisted fields taken into account when diffing
    pub fields: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Fields of one entity that differ from their last persisted state
pub type ChangeSet = BTreeMap<&'static str, FieldChange>;

/// Change tracking of the entities handled by one save operation
pub trait UnitOfWork: Send {
    /// Diff the entity again after it was mutated outside of the normal
    /// change tracking pass, replacing its change set.
    fn recompute_single_entity_change_set(
        &mut self,
        metadata: &ClassMetadata,
        entity: &dyn Entity,
    ) -> Result<(), PersistenceError>;
}

/// Handle on the active persistence session handed to update listeners
pub trait PersistenceSession: Send {
    fn unit_of_work(&mut self) -> &mut dyn UnitOfWork;

    fn class_metadata(&self, entity_type: &EntityType) -> Result<ClassMetadata, PersistenceError>;
}
