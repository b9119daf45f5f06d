use async_trait::async_trait;

use libreria_core::{BookId, RepositoryError, UserId};

use crate::book::{Book, BookPatch, NewBook};

/// Persistence port for book records.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError>;

    async fn find(&self, id: BookId) -> Result<Option<Book>, RepositoryError>;

    /// Case-insensitive exact match on the author field.
    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, RepositoryError>;

    async fn insert(&self, new: NewBook) -> Result<Book, RepositoryError>;

    async fn update(&self, id: BookId, patch: BookPatch) -> Result<Option<Book>, RepositoryError>;

    async fn delete(&self, id: BookId) -> Result<bool, RepositoryError>;

    /// Atomically transition an *available* book to sold with `buyer` set.
    ///
    /// Returns the updated record, or `None` when the book is absent or was
    /// already sold — including a concurrent sale that won the race. This is a
    /// compare-and-set, not a check-then-act.
    async fn mark_sold(&self, id: BookId, buyer: UserId)
    -> Result<Option<Book>, RepositoryError>;
}
