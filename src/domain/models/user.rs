use argon2::password_hash::{SaltString, rand_core::OsRng};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    error::DomainError,
    models::{
        credential::HashedPassword,
        entity::{Entity, EntitySnapshot, EntityType, PasswordUser, RecoverableUser},
    },
    repositories::unit_of_work::ClassMetadata,
};

pub const USER_ENTITY: EntityType = EntityType::new("User");

/// Mapping of [`User`] onto the `users` table
pub fn user_metadata() -> ClassMetadata {
    ClassMetadata {
        entity_type: USER_ENTITY,
        table_name: "users",
        fields: vec!["username", "password", "salt", "password_recovery_key"],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId(Uuid);
impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// Account able to log in with a password and to recover it
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    username: String,
    password: Option<HashedPassword>,
    plain_password: Option<SecretString>,
    salt: String,
    password_recovery_key: Option<String>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh user with a random salt and no password yet
    pub fn new(username: String) -> Result<Self, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::EmptyUsername);
        }

        let salt = SaltString::generate(OsRng);
        Ok(Self {
            id: UserId::new(),
            username,
            password: None,
            plain_password: None,
            salt: salt.as_str().to_string(),
            password_recovery_key: None,
            updated_at: Utc::now(),
        })
    }

    pub fn reconstruct(
        id: Uuid,
        username: String,
        password: Option<HashedPassword>,
        salt: String,
        password_recovery_key: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::from_uuid(id),
            username,
            password,
            plain_password: None,
            salt,
            password_recovery_key,
            updated_at,
        }
    }

    /// Stage a new password; it gets hashed when the user is saved
    pub fn set_plain_password(&mut self, plain_password: impl Into<String>) {
        self.plain_password = Some(SecretString::from(plain_password.into()));
    }

    /// Issue a new one-time recovery key, replacing any previous one
    pub fn generate_password_recovery_key(&mut self) -> &str {
        let key = Uuid::new_v4().simple().to_string();
        self.password_recovery_key.insert(key).as_str()
    }

    pub fn is_password_recovery_key_valid(&self, key: &str) -> bool {
        !key.is_empty() && self.password_recovery_key.as_deref() == Some(key)
    }

    // getters
    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn password(&self) -> Option<&HashedPassword> {
        self.password.as_ref()
    }
    pub fn password_recovery_key(&self) -> Option<&str> {
        self.password_recovery_key.as_deref()
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for User {
    fn entity_type(&self) -> EntityType {
        USER_ENTITY
    }

    fn identifier(&self) -> Uuid {
        self.id.0
    }

    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot::from([
            ("username", Some(self.username.clone())),
            (
                "password",
                self.password.as_ref().map(|p| p.as_str().to_string()),
            ),
            ("salt", Some(self.salt.clone())),
            ("password_recovery_key", self.password_recovery_key.clone()),
        ])
    }

    fn as_password_user(&mut self) -> Option<&mut dyn PasswordUser> {
        Some(self)
    }

    fn as_recoverable_user(&mut self) -> Option<&mut dyn RecoverableUser> {
        Some(self)
    }
}

impl PasswordUser for User {
    fn plain_password(&self) -> Option<&SecretString> {
        self.plain_password
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty())
    }

    fn salt(&self) -> &str {
        &self.salt
    }

    fn set_password(&mut self, password: HashedPassword) {
        self.password = Some(password);
        self.updated_at = Utc::now();
    }

    fn erase_credentials(&mut self) {
        self.plain_password = None;
    }
}

impl RecoverableUser for User {
    fn erase_password_recovery_key(&mut self) {
        self.password_recovery_key = None;
    }
}
