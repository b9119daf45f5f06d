//! Infrastructure layer: configuration and repository implementations.
//!
//! Two interchangeable backends implement the domain ports: `memory` (dev/test
//! default, mutex-guarded maps) and `postgres` (sqlx). Wiring picks one at
//! startup; nothing above this crate knows which is in play.

pub mod config;
pub mod memory;
pub mod postgres;

pub use config::DatabaseConfig;
pub use memory::{InMemoryBookRepository, InMemoryUserRepository};
pub use postgres::{PgBookRepository, PgUserRepository, ensure_schema};
