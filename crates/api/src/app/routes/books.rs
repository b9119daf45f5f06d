use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use libreria_books::{BookPatch, NewBook};
use libreria_core::{BookId, UserId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_book).get(list_books))
        .route("/author/:author", get(books_by_author))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
        .route("/:id/buy/:user_id", post(buy_book))
}

fn book_not_found() -> axum::response::Response {
    errors::json_message(StatusCode::NOT_FOUND, "Book not found")
}

fn parse_book_id(raw: &str) -> Result<BookId, axum::response::Response> {
    raw.parse().map_err(|_| book_not_found())
}

pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateBookRequest>,
) -> axum::response::Response {
    let new = NewBook {
        title: body.title,
        author: body.author,
        price: body.price,
    };

    match services.books.create(new).await {
        Ok(book) => (StatusCode::CREATED, Json(dto::book_to_json(book))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "book creation failed");
            errors::json_message(StatusCode::INTERNAL_SERVER_ERROR, "Error creating book")
        }
    }
}

pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.books.list().await {
        Ok(books) => {
            let items = books.into_iter().map(dto::book_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "book listing failed");
            errors::json_message(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching books")
        }
    }
}

pub async fn get_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_book_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.books.get(id).await {
        Ok(Some(book)) => (StatusCode::OK, Json(dto::book_to_json(book))).into_response(),
        Ok(None) => book_not_found(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn books_by_author(
    Extension(services): Extension<Arc<AppServices>>,
    Path(author): Path<String>,
) -> axum::response::Response {
    match services.books.find_by_author(&author).await {
        Ok(books) => {
            let items = books.into_iter().map(dto::book_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, author, "author lookup failed");
            errors::json_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching books by author",
            )
        }
    }
}

pub async fn update_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateBookRequest>,
) -> axum::response::Response {
    let id = match parse_book_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let patch = BookPatch {
        title: body.title,
        author: body.author,
        price: body.price,
    };

    match services.books.update(id, patch).await {
        Ok(Some(book)) => (StatusCode::OK, Json(dto::book_to_json(book))).into_response(),
        Ok(None) => book_not_found(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_book_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.books.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => book_not_found(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn buy_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, user_id)): Path<(String, String)>,
) -> axum::response::Response {
    let rejected =
        || errors::json_message(StatusCode::NOT_FOUND, "Book not found or already sold");

    // Unparseable ids resolve nothing, so they fall under the same rejection.
    let Ok(book_id) = id.parse::<BookId>() else {
        return rejected();
    };
    let Ok(buyer_id) = user_id.parse::<UserId>() else {
        return rejected();
    };

    match services.books.purchase(buyer_id, book_id).await {
        Ok(Some(confirmation)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": confirmation })),
        )
            .into_response(),
        Ok(None) => rejected(),
        Err(e) => {
            tracing::error!(error = %e, "purchase failed");
            errors::json_message(StatusCode::INTERNAL_SERVER_ERROR, "Error buying book")
        }
    }
}
