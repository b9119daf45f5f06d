//! Postgres-backed repositories (sqlx).
//!
//! ## Error mapping
//!
//! sqlx errors are mapped to `RepositoryError` as follows: unique-constraint
//! violations (code `23505`, e.g. duplicate email) become `Duplicate`;
//! everything else (connection, pool, decode) becomes `Backend`.

pub mod books;
pub mod schema;
pub mod users;

pub use books::PgBookRepository;
pub use schema::ensure_schema;
pub use users::PgUserRepository;

use libreria_core::RepositoryError;

pub(crate) fn map_sqlx_err(e: sqlx::Error) -> RepositoryError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return RepositoryError::duplicate(db.message().to_string());
        }
    }
    RepositoryError::backend(e.to_string())
}
