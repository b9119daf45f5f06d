use std::sync::Arc;

use chrono::Utc;

use libreria_auth::{Hs256TokenSigner, TokenError};
use libreria_core::{RepositoryError, UserId};

use crate::repository::UserRepository;
use crate::user::{NewUser, User, UserPatch};

/// Business-logic layer for users: thin CRUD over the repository plus token
/// issuing. Duplicate-email pre-checks and password hashing stay at the
/// boundary; the repository's uniqueness constraint is the concurrent backstop.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    signer: Hs256TokenSigner,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, signer: Hs256TokenSigner) -> Self {
        Self { repo, signer }
    }

    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.repo.find(id).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.repo.find_by_email(email).await
    }

    pub async fn create(&self, new: NewUser) -> Result<User, RepositoryError> {
        let user = self.repo.insert(new).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn update(
        &self,
        id: UserId,
        patch: UserPatch,
    ) -> Result<Option<User>, RepositoryError> {
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!(user_id = %id, "user deleted");
        }
        Ok(deleted)
    }

    /// Issue a short-lived token embedding `email` as the `user` claim.
    pub fn issue_token(&self, email: &str) -> Result<String, TokenError> {
        self.signer.issue(email, Utc::now())
    }
}
