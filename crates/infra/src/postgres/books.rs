use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use libreria_books::{Book, BookPatch, BookRepository, NewBook};
use libreria_core::{BookId, RepositoryError, UserId};

use super::map_sqlx_err;

const BOOK_COLUMNS: &str = "id, title, author, price, is_sold, buyer_id, created_at, updated_at";

/// Postgres-backed book store.
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_book(row: &PgRow) -> Book {
    Book {
        id: BookId::from_uuid(row.get::<Uuid, _>("id")),
        title: row.get("title"),
        author: row.get("author"),
        price: row.get("price"),
        is_sold: row.get("is_sold"),
        buyer_id: row.get::<Option<Uuid>, _>("buyer_id").map(UserId::from_uuid),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.iter().map(row_to_book).collect())
    }

    async fn find(&self, id: BookId) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(row.as_ref().map(row_to_book))
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOK_COLUMNS} FROM books
             WHERE LOWER(author) = LOWER($1)
             ORDER BY created_at"
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.iter().map(row_to_book).collect())
    }

    #[instrument(skip(self, new), err)]
    async fn insert(&self, new: NewBook) -> Result<Book, RepositoryError> {
        // is_sold/buyer_id are left to their defaults: new books are available.
        let row = sqlx::query(&format!(
            "INSERT INTO books (id, title, author, price)
             VALUES ($1, $2, $3, $4)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(BookId::new().as_uuid())
        .bind(&new.title)
        .bind(&new.author)
        .bind(new.price)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row_to_book(&row))
    }

    async fn update(&self, id: BookId, patch: BookPatch) -> Result<Option<Book>, RepositoryError> {
        // Sale state is deliberately not updatable here.
        let row = sqlx::query(&format!(
            "UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                price = COALESCE($4, price),
                updated_at = now()
             WHERE id = $1
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.as_ref().map(row_to_book))
    }

    async fn delete(&self, id: BookId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(book_id = %id, buyer_id = %buyer), err)]
    async fn mark_sold(
        &self,
        id: BookId,
        buyer: UserId,
    ) -> Result<Option<Book>, RepositoryError> {
        // Single conditional UPDATE: two concurrent purchases cannot both match
        // `is_sold = FALSE`, so exactly one wins.
        let row = sqlx::query(&format!(
            "UPDATE books SET
                is_sold = TRUE,
                buyer_id = $2,
                updated_at = now()
             WHERE id = $1 AND is_sold = FALSE
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(buyer.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.as_ref().map(row_to_book))
    }
}
