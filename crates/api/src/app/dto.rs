use serde::Deserialize;

use libreria_books::Book;
use libreria_users::User;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create payload. There is intentionally no `is_sold`/`buyer_id` field:
/// new books are always available, whatever the client sends.
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub price: f64,
}

/// Update payload. Sale state is not patchable through the generic update.
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<f64>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Full user body. The password hash is never serialized.
pub fn user_to_json(user: User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.to_string(),
        "email": user.email,
        "name": user.name,
        "created_at": user.created_at.to_rfc3339(),
        "updated_at": user.updated_at.to_rfc3339(),
    })
}

/// Signup response body: id and email only.
pub fn created_user_to_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.to_string(),
        "email": user.email,
    })
}

pub fn book_to_json(book: Book) -> serde_json::Value {
    serde_json::json!({
        "id": book.id.to_string(),
        "title": book.title,
        "author": book.author,
        "price": book.price,
        "is_sold": book.is_sold,
        "buyer_id": book.buyer_id.map(|id| id.to_string()),
        "created_at": book.created_at.to_rfc3339(),
        "updated_at": book.updated_at.to_rfc3339(),
    })
}
