//! Startup schema creation.

use sqlx::PgPool;

/// Create the `users` and `books` tables if they do not exist.
///
/// Schema auto-creation keeps the practice setup zero-step; it is unsafe for
/// production use and is logged as such by the caller. `buyer_id` is
/// `ON DELETE SET NULL`: user deletion stays independent of the purchase flow,
/// so deleting a buyer leaves a sold book without one.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id UUID PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            is_sold BOOLEAN NOT NULL DEFAULT FALSE,
            buyer_id UUID REFERENCES users (id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Supports the case-insensitive author lookup.
    sqlx::query("CREATE INDEX IF NOT EXISTS books_author_lower_idx ON books (LOWER(author))")
        .execute(pool)
        .await?;

    Ok(())
}
