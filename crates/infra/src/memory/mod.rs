//! In-memory repositories for dev/test.

pub mod books;
pub mod users;

pub use books::InMemoryBookRepository;
pub use users::InMemoryUserRepository;
