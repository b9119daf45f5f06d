//! `libreria-auth` — password hashing and token issuing.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! hash/verify passwords and how to sign/verify tokens, nothing else.

pub mod password;
pub mod token;

pub use password::{HASH_COST, PasswordError, hash_password, verify_password};
pub use token::{Hs256TokenSigner, TOKEN_TTL_MINUTES, TokenClaims, TokenError};
