use std::sync::Arc;

use libreria_auth::Hs256TokenSigner;
use libreria_books::{BookRepository, BookService};
use libreria_infra::{
    DatabaseConfig, InMemoryBookRepository, InMemoryUserRepository, PgBookRepository,
    PgUserRepository, ensure_schema,
};
use libreria_users::{UserRepository, UserService};

/// Service wiring for the HTTP layer: both services behind one handle.
pub struct AppServices {
    pub users: UserService,
    pub books: BookService,
}

/// Build services from process environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (connection settings from
/// `DB_*` variables, schema auto-created); the default is in-memory
/// repositories for dev/test.
pub async fn build_services(jwt_secret: String) -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let (users_repo, books_repo): (Arc<dyn UserRepository>, Arc<dyn BookRepository>) =
        if use_persistent {
            let pool = DatabaseConfig::from_env()
                .connect()
                .await
                .expect("failed to connect to postgres");

            tracing::warn!("schema auto-creation enabled; suitable for local practice only");
            ensure_schema(&pool)
                .await
                .expect("failed to create database schema");

            (
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgBookRepository::new(pool)),
            )
        } else {
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryBookRepository::new()),
            )
        };

    let signer = Hs256TokenSigner::new(jwt_secret.as_bytes());

    AppServices {
        users: UserService::new(users_repo.clone(), signer),
        books: BookService::new(books_repo, users_repo),
    }
}
