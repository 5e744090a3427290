use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    sea_query::Expr,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    domain::{
        error::{DomainError, RepositoryError},
        models::{entity::PasswordUser, user::User},
        repositories::user_repository::UserRepository,
    },
    infrastructure::{
        entity::users::{self, column_for_field},
        lifecycle_dispatcher::LifecycleDispatcher,
    },
};

fn db_err(e: DbErr) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
    dispatcher: LifecycleDispatcher,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>, dispatcher: LifecycleDispatcher) -> Self {
        Self { db, dispatcher }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, user: &mut User) -> Result<(), DomainError> {
        self.dispatcher.before_insert(user)?;

        let user_model = users::ActiveModel {
            id: Set(*user.id().as_uuid()),
            username: Set(user.username().to_string()),
            password: Set(user.password().map(|p| p.as_str().to_string())),
            salt: Set(user.salt().to_string()),
            password_recovery_key: Set(user.password_recovery_key().map(str::to_string)),
            updated_at: Set(user.updated_at()),
        };

        users::Entity::insert(user_model)
            .exec_without_returning(&*self.db)
            .await
            .map_err(db_err)?;

        info!(id = %user.id().as_uuid(), "user inserted");
        Ok(())
    }

    async fn update(&self, user: &mut User) -> Result<(), DomainError> {
        let id = *user.id().as_uuid();
        let original = users::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        let change_set = self.dispatcher.before_update(user, original.snapshot())?;
        if change_set.is_empty() {
            debug!(%id, "user unchanged, skipping update");
            return Ok(());
        }

        // only write the columns that actually changed
        let mut query = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(user.updated_at()))
            .filter(users::Column::Id.eq(id));
        for (field, change) in &change_set {
            if let Some(column) = column_for_field(field) {
                query = query.col_expr(column, Expr::value(change.new.clone()));
            }
        }

        query.exec(&*self.db).await.map_err(db_err)?;

        info!(%id, fields = ?change_set.keys().collect::<Vec<_>>(), "user updated");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = users::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(user.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(db_err)?;

        Ok(user.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    use super::*;
    use crate::{domain::models::credential::HashedPassword, test_support::user_dispatcher};

    fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
        match Arc::try_unwrap(db) {
            Ok(db) => db.into_transaction_log(),
            Err(_) => panic!("connection still shared"),
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[fixture]
    fn stored() -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password: Some("old_pass#pepper_salt".to_string()),
            salt: "pepper_salt".to_string(),
            password_recovery_key: Some("recovery".to_string()),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_insert_writes_hashed_password() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([exec_ok()])
            .into_connection();
        let db = Arc::new(db);
        let repository = SeaOrmUserRepository::new(Arc::clone(&db), user_dispatcher());

        let mut user = User::new("alice".to_string()).unwrap();
        user.set_plain_password("custom_pass");
        repository.insert(&mut user).await.unwrap();
        drop(repository);

        let expected = format!("custom_pass#{}", user.salt());
        assert_eq!(user.password().map(HashedPassword::as_str), Some(expected.as_str()));

        let log = format!("{:?}", transaction_log(db));
        assert!(log.contains("INSERT INTO `users`"));
        assert!(log.contains(&expected));
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_writes_rehashed_password_and_cleared_key(stored: users::Model) {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![stored.clone()]])
            .append_exec_results([exec_ok()])
            .into_connection();
        let db = Arc::new(db);
        let repository = SeaOrmUserRepository::new(Arc::clone(&db), user_dispatcher());

        let mut user = User::from(stored);
        user.set_plain_password("custom_pass");
        repository.update(&mut user).await.unwrap();
        drop(repository);

        assert_eq!(
            user.password().map(HashedPassword::as_str),
            Some("custom_pass#pepper_salt")
        );
        assert!(user.password_recovery_key().is_none());

        let log = transaction_log(db);
        assert_eq!(log.len(), 2);
        let update = format!("{:?}", log[1]);
        assert!(update.contains("UPDATE `users`"));
        assert!(update.contains("`password` = ?"));
        assert!(update.contains("`password_recovery_key` = ?"));
        assert!(!update.contains("`username` = ?"));
        assert!(update.contains("custom_pass#pepper_salt"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_without_changes_sends_no_statement(stored: users::Model) {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let db = Arc::new(db);
        let repository = SeaOrmUserRepository::new(Arc::clone(&db), user_dispatcher());

        let mut user = User::from(stored);
        repository.update(&mut user).await.unwrap();
        drop(repository);

        assert_eq!(transaction_log(db).len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_unknown_user_negative(stored: users::Model) {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let repository = SeaOrmUserRepository::new(Arc::new(db), user_dispatcher());

        let mut user = User::from(stored);
        user.set_plain_password("custom_pass");
        let result = repository.update(&mut user).await;

        assert!(matches!(
            result,
            Err(DomainError::Repository(RepositoryError::NotFound))
        ));
        // nothing was hashed since the hooks never ran
        assert!(user.plain_password().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn test_find_by_username(stored: users::Model) {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let repository = SeaOrmUserRepository::new(Arc::new(db), user_dispatcher());

        let user = repository.find_by_username("alice").await.unwrap().unwrap();

        assert_eq!(user.id().as_uuid(), &stored.id);
        assert_eq!(user.salt(), "pepper_salt");
        assert_eq!(user.password_recovery_key(), Some("recovery"));
    }
}
