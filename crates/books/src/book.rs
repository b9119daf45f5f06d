use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use libreria_core::{BookId, DomainError, DomainResult, UserId};

/// A persisted book record.
///
/// Invariant: `is_sold` iff `buyer_id` is set. The only way to change sale
/// state is [`Book::mark_sold`]; [`BookPatch`] deliberately has no sale-state
/// fields, so the generic update path cannot break the invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub is_sold: bool,
    pub buyer_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a book. New books are always available:
/// there is no way to create one already sold.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price: f64,
}

/// Partial update covering title/author/price only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<f64>,
}

impl Book {
    /// Merge a patch into this record, bumping `updated_at`.
    pub fn apply(&mut self, patch: BookPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = now;
    }

    pub fn is_available(&self) -> bool {
        !self.is_sold
    }

    /// One-way transition available → sold.
    ///
    /// Sets both sides of the invariant in one step. A sold book cannot be
    /// sold again; there is no inverse transition.
    pub fn mark_sold(&mut self, buyer: UserId, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_sold {
            return Err(DomainError::conflict("book is already sold"));
        }

        self.is_sold = true;
        self.buyer_id = Some(buyer);
        self.updated_at = now;
        Ok(())
    }
}
