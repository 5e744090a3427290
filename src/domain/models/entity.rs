use std::{collections::BTreeMap, fmt};

use secrecy::SecretString;
use uuid::Uuid;

use crate::domain::models::credential::HashedPassword;

/// Persisted field values of an entity, keyed by field name
pub type EntitySnapshot = BTreeMap<&'static str, Option<String>>;

/// Name of a persisted type, used to look up metadata and encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityType(&'static str);

impl EntityType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Any object tracked by the persistence layer.
///
/// Capabilities are opt-in: an entity that bears a password overrides
/// [`Entity::as_password_user`], one that also supports password recovery
/// overrides [`Entity::as_recoverable_user`].
pub trait Entity: Send {
    fn entity_type(&self) -> EntityType;

    fn identifier(&self) -> Uuid;

    /// Current values of the persisted fields
    fn snapshot(&self) -> EntitySnapshot;

    fn as_password_user(&mut self) -> Option<&mut dyn PasswordUser> {
        None
    }

    fn as_recoverable_user(&mut self) -> Option<&mut dyn RecoverableUser> {
        None
    }
}

/// Entity carrying a transient plain password next to its stored hash
pub trait PasswordUser {
    /// New password waiting to be hashed, if any
    fn plain_password(&self) -> Option<&SecretString>;

    fn salt(&self) -> &str;

    fn set_password(&mut self, password: HashedPassword);

    /// Drop transient secrets once they have been consumed
    fn erase_credentials(&mut self);
}

pub trait RecoverableUser: PasswordUser {
    fn erase_password_recovery_key(&mut self);
}
