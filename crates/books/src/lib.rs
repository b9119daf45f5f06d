//! Books domain module.
//!
//! Book record, the one-way purchase transition and its invariant, the
//! repository port, and the service composing book and user lookups.

pub mod book;
pub mod repository;
pub mod service;

pub use book::{Book, BookPatch, NewBook};
pub use repository::BookRepository;
pub use service::BookService;
