use async_trait::async_trait;

use libreria_core::{RepositoryError, UserId};

use crate::user::{NewUser, User, UserPatch};

/// Persistence port for user records.
///
/// Absent records are `Ok(None)` / `Ok(false)`; [`RepositoryError`] covers
/// constraint violations and backend failures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Exact-match lookup, used for the duplicate pre-check and login.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Persist a new record. Duplicate emails yield [`RepositoryError::Duplicate`].
    async fn insert(&self, new: NewUser) -> Result<User, RepositoryError>;

    /// Merge `patch` into the record, returning the updated row, or `None` if absent.
    async fn update(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, RepositoryError>;

    /// Remove the record. `Ok(true)` iff a row was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;
}
