use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use libreria_books::{Book, BookPatch, BookRepository, NewBook};
use libreria_core::{BookId, RepositoryError, UserId};

/// In-memory book store for dev/test.
///
/// `mark_sold` checks and sets under one lock guard, matching the atomicity of
/// the Postgres conditional UPDATE.
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    rows: Mutex<HashMap<BookId, Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<BookId, Book>>, RepositoryError> {
        self.rows
            .lock()
            .map_err(|_| RepositoryError::backend("book store lock poisoned"))
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let rows = self.lock()?;
        let mut books: Vec<Book> = rows.values().cloned().collect();
        books.sort_by_key(|b| b.created_at);
        Ok(books)
    }

    async fn find(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, RepositoryError> {
        let wanted = author.to_lowercase();
        let rows = self.lock()?;
        let mut books: Vec<Book> = rows
            .values()
            .filter(|b| b.author.to_lowercase() == wanted)
            .cloned()
            .collect();
        books.sort_by_key(|b| b.created_at);
        Ok(books)
    }

    async fn insert(&self, new: NewBook) -> Result<Book, RepositoryError> {
        let now = Utc::now();
        let book = Book {
            id: BookId::new(),
            title: new.title,
            author: new.author,
            price: new.price,
            is_sold: false,
            buyer_id: None,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: BookId, patch: BookPatch) -> Result<Option<Book>, RepositoryError> {
        let mut rows = self.lock()?;
        let Some(book) = rows.get_mut(&id) else {
            return Ok(None);
        };
        book.apply(patch, Utc::now());
        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: BookId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.remove(&id).is_some())
    }

    async fn mark_sold(
        &self,
        id: BookId,
        buyer: UserId,
    ) -> Result<Option<Book>, RepositoryError> {
        let mut rows = self.lock()?;
        let Some(book) = rows.get_mut(&id) else {
            return Ok(None);
        };
        if book.mark_sold(buyer, Utc::now()).is_err() {
            return Ok(None);
        }
        Ok(Some(book.clone()))
    }
}
