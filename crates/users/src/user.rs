use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use libreria_core::{DomainError, DomainResult, UserId};

/// A persisted user record.
///
/// `password_hash` is a bcrypt hash; the plaintext never reaches this type.
/// Timestamps are set by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a user. The password arrives pre-hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// Partial update: `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl User {
    /// Merge a patch into this record, bumping `updated_at`.
    pub fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
        self.updated_at = now;
    }
}

/// Structural email validation performed at the boundary before any lookup.
///
/// Deliberately modest: one `@`, non-empty local part, domain with a dot and
/// no whitespace. Deliverability is not this layer's problem.
pub fn validate_email(email: &str) -> DomainResult<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::validation("email must contain '@'"));
    };

    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(DomainError::validation("malformed email address"));
    }

    Ok(())
}
