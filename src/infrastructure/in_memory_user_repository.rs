use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    domain::{
        error::{DomainError, RepositoryError},
        models::user::User,
        repositories::user_repository::UserRepository,
    },
    infrastructure::{entity::users, lifecycle_dispatcher::LifecycleDispatcher},
};

/// Process-local user storage running the same hooks as the database one
#[derive(Clone)]
pub struct InMemoryUserRepository {
    rows: Arc<Mutex<HashMap<Uuid, users::Model>>>,
    dispatcher: LifecycleDispatcher,
}

impl InMemoryUserRepository {
    pub fn new(dispatcher: LifecycleDispatcher) -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
            dispatcher,
        }
    }

    fn rows(&self) -> Result<MutexGuard<'_, HashMap<Uuid, users::Model>>, RepositoryError> {
        self.rows
            .lock()
            .map_err(|_| RepositoryError::DatabaseError("user storage poisoned".to_string()))
    }

    /// Stored row of a user, as it would sit in the database
    pub fn stored(&self, id: &Uuid) -> Result<Option<users::Model>, RepositoryError> {
        Ok(self.rows()?.get(id).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &mut User) -> Result<(), DomainError> {
        let id = *user.id().as_uuid();
        let mut rows = self.rows()?;
        // reject before the hooks consume the plain password
        if rows
            .values()
            .any(|existing| existing.id == id || existing.username == user.username())
        {
            return Err(RepositoryError::DatabaseError("User already exists".to_string()).into());
        }

        self.dispatcher.before_insert(user)?;
        rows.insert(id, users::Model::from(&*user));

        info!(%id, "user inserted");
        Ok(())
    }

    async fn update(&self, user: &mut User) -> Result<(), DomainError> {
        let id = *user.id().as_uuid();
        let mut rows = self.rows()?;
        let row = rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        let change_set = self.dispatcher.before_update(user, row.snapshot())?;
        if change_set.is_empty() {
            debug!(%id, "user unchanged, skipping update");
            return Ok(());
        }

        let mut updated = row.clone();
        for (field, change) in &change_set {
            updated.apply(field, change.new.clone())?;
        }
        updated.updated_at = user.updated_at();
        *row = updated;

        info!(%id, fields = ?change_set.keys().collect::<Vec<_>>(), "user updated");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.stored(&id)?.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = self
            .rows()?
            .values()
            .find(|row| row.username == username)
            .cloned();
        Ok(row.map(User::from))
    }
}
