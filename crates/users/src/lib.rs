//! Users domain module.
//!
//! This crate contains the user record, its merge/validation rules, the
//! repository port, and the service mediating between boundary and persistence.

pub mod repository;
pub mod service;
pub mod user;

pub use repository::UserRepository;
pub use service::UserService;
pub use user::{NewUser, User, UserPatch, validate_email};
