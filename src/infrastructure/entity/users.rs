use sea_orm::entity::prelude::*;

use crate::domain::{
    error::RepositoryError,
    models::{
        credential::HashedPassword,
        entity::{EntitySnapshot, PasswordUser},
        user::User,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password: Option<String>,
    pub salt: String,
    pub password_recovery_key: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Persisted state of the row, in the shape produced by `User::snapshot`
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot::from([
            ("username", Some(self.username.clone())),
            ("password", self.password.clone()),
            ("salt", Some(self.salt.clone())),
            ("password_recovery_key", self.password_recovery_key.clone()),
        ])
    }

    /// Write a changed field back onto the row
    pub fn apply(&mut self, field: &str, value: Option<String>) -> Result<(), RepositoryError> {
        let required = |value: Option<String>| {
            value.ok_or_else(|| RepositoryError::DatabaseError(format!("`{field}` cannot be null")))
        };
        match field {
            "username" => self.username = required(value)?,
            "password" => self.password = value,
            "salt" => self.salt = required(value)?,
            "password_recovery_key" => self.password_recovery_key = value,
            _ => {
                return Err(RepositoryError::DatabaseError(format!(
                    "unknown column `{field}`"
                )));
            }
        }
        Ok(())
    }
}

/// Column backing a field of the user snapshot
pub fn column_for_field(field: &str) -> Option<Column> {
    match field {
        "username" => Some(Column::Username),
        "password" => Some(Column::Password),
        "salt" => Some(Column::Salt),
        "password_recovery_key" => Some(Column::PasswordRecoveryKey),
        _ => None,
    }
}

impl From<&User> for Model {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().to_string(),
            password: user.password().map(|p| p.as_str().to_string()),
            salt: user.salt().to_string(),
            password_recovery_key: user.password_recovery_key().map(str::to_string),
            updated_at: user.updated_at(),
        }
    }
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User::reconstruct(
            model.id,
            model.username,
            model.password.map(HashedPassword::new),
            model.salt,
            model.password_recovery_key,
            model.updated_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::entity::Entity;

    #[test]
    fn test_row_snapshot_matches_user_snapshot() {
        let mut user = User::new("alice".to_string()).unwrap();
        user.set_password(HashedPassword::new("hash".to_string()));
        user.generate_password_recovery_key();

        let model = Model::from(&user);

        assert_eq!(model.snapshot(), user.snapshot());
        assert_eq!(User::from(model.clone()).snapshot(), model.snapshot());
    }

    #[test]
    fn test_apply_writes_tracked_fields() {
        let user = User::new("alice".to_string()).unwrap();
        let mut model = Model::from(&user);

        model.apply("password", Some("hash".to_string())).unwrap();
        model.apply("username", Some("bob".to_string())).unwrap();
        model.apply("password_recovery_key", None).unwrap();

        assert_eq!(model.password.as_deref(), Some("hash"));
        assert_eq!(model.username, "bob");
        assert_eq!(model.password_recovery_key, None);
    }

    #[test]
    fn test_apply_null_to_required_column_negative() {
        let user = User::new("alice".to_string()).unwrap();
        let mut model = Model::from(&user);

        assert!(matches!(
            model.apply("salt", None),
            Err(RepositoryError::DatabaseError(_))
        ));
        assert!(matches!(
            model.apply("username", None),
            Err(RepositoryError::DatabaseError(_))
        ));
        assert_eq!(model.username, "alice");
        assert_eq!(model.salt, user.salt());
    }

    #[test]
    fn test_apply_unknown_field_negative() {
        let user = User::new("alice".to_string()).unwrap();
        let mut model = Model::from(&user);
        let before = model.clone();

        assert!(matches!(
            model.apply("email", Some("alice@example.com".to_string())),
            Err(RepositoryError::DatabaseError(_))
        ));
        assert_eq!(model, before);
    }

    #[test]
    fn test_every_tracked_field_has_a_column() {
        let metadata = crate::domain::models::user::user_metadata();
        assert!(
            metadata
                .fields
                .iter()
                .all(|field| column_for_field(field).is_some())
        );
    }
}
