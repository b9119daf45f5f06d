use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use libreria_core::{RepositoryError, UserId};
use libreria_users::{NewUser, User, UserPatch, UserRepository};

/// In-memory user store for dev/test.
///
/// Mirrors the Postgres implementation's semantics: duplicate emails are
/// rejected on insert, lookups by email are exact.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, User>>, RepositoryError> {
        self.rows
            .lock()
            .map_err(|_| RepositoryError::backend("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = self.lock()?;
        let mut users: Vec<User> = rows.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn find(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut rows = self.lock()?;
        if rows.values().any(|u| u.email == new.email) {
            return Err(RepositoryError::duplicate(new.email));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, RepositoryError> {
        let mut rows = self.lock()?;
        let Some(user) = rows.get_mut(&id) else {
            return Ok(None);
        };
        user.apply(patch, Utc::now());
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.remove(&id).is_some())
    }
}
