use std::sync::Arc;

use libreria_core::{BookId, RepositoryError, UserId};
use libreria_users::UserRepository;

use crate::book::{Book, BookPatch, NewBook};
use crate::repository::BookRepository;

/// Business-logic layer for books: CRUD, author lookup, and the purchase flow.
#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { books, users }
    }

    pub async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        self.books.list().await
    }

    pub async fn get(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        self.books.find(id).await
    }

    pub async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, RepositoryError> {
        self.books.find_by_author(author).await
    }

    pub async fn create(&self, new: NewBook) -> Result<Book, RepositoryError> {
        let book = self.books.insert(new).await?;
        tracing::info!(book_id = %book.id, "book created");
        Ok(book)
    }

    pub async fn update(
        &self,
        id: BookId,
        patch: BookPatch,
    ) -> Result<Option<Book>, RepositoryError> {
        self.books.update(id, patch).await
    }

    pub async fn delete(&self, id: BookId) -> Result<bool, RepositoryError> {
        self.books.delete(id).await
    }

    /// Purchase flow: lookup book → reject if absent/sold → lookup buyer →
    /// reject if absent → atomic transition → confirmation string.
    ///
    /// `Ok(None)` covers every expected rejection; the boundary maps it to a
    /// single 404. The final `mark_sold` is the race-safe step: even if two
    /// purchases pass the pre-checks, only one compare-and-set succeeds.
    pub async fn purchase(
        &self,
        buyer_id: UserId,
        book_id: BookId,
    ) -> Result<Option<String>, RepositoryError> {
        let Some(book) = self.books.find(book_id).await? else {
            return Ok(None);
        };
        if !book.is_available() {
            return Ok(None);
        }

        let Some(buyer) = self.users.find(buyer_id).await? else {
            return Ok(None);
        };

        match self.books.mark_sold(book_id, buyer.id).await? {
            Some(sold) => {
                tracing::info!(book_id = %sold.id, buyer_id = %buyer.id, "book sold");
                Ok(Some(format!(
                    "El libro {} ha sido comprado por el usuario con ID {}.",
                    sold.title, buyer.id
                )))
            }
            // Lost the race: someone else bought it between the check and the set.
            None => Ok(None),
        }
    }
}
