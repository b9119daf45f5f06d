use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use libreria_auth::{hash_password, verify_password};
use libreria_core::{RepositoryError, UserId};
use libreria_users::{NewUser, UserPatch, validate_email};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/login", post(login))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Non-UUID path parameters resolve to "no such record" (404), like any other
/// id that matches nothing.
fn parse_user_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse().map_err(|_| user_not_found())
}

fn user_not_found() -> axum::response::Response {
    errors::json_message(StatusCode::NOT_FOUND, "User not found")
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if validate_email(&body.email).is_err() {
        return errors::json_message(StatusCode::BAD_REQUEST, "Invalid email format");
    }

    // Pre-check duplicate email; the repository constraint backstops the race.
    match services.users.get_by_email(&body.email).await {
        Ok(Some(_)) => {
            return errors::json_message(StatusCode::BAD_REQUEST, "User already exists");
        }
        Ok(None) => {}
        Err(e) => return errors::internal_error(e),
    }

    let password_hash = match hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => return errors::internal_error(e),
    };

    let new = NewUser {
        email: body.email,
        name: body.name,
        password_hash,
    };

    match services.users.create(new).await {
        Ok(user) => (StatusCode::CREATED, Json(dto::created_user_to_json(&user))).into_response(),
        Err(RepositoryError::Duplicate(_)) => {
            errors::json_message(StatusCode::BAD_REQUEST, "User already exists")
        }
        Err(e) => errors::internal_error(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.users.list().await {
        Ok(users) => {
            let items = users.into_iter().map(dto::user_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::internal_error(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.get(id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(dto::user_to_json(user))).into_response(),
        Ok(None) => user_not_found(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // A new password is rehashed at the boundary before it can reach storage.
    let password_hash = match body.password.as_deref().map(hash_password) {
        Some(Ok(hash)) => Some(hash),
        Some(Err(e)) => return errors::internal_error(e),
        None => None,
    };

    let patch = UserPatch {
        email: body.email,
        name: body.name,
        password_hash,
    };

    match services.users.update(id, patch).await {
        Ok(Some(user)) => (StatusCode::OK, Json(dto::user_to_json(user))).into_response(),
        Ok(None) => user_not_found(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => user_not_found(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services.users.get_by_email(&body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return user_not_found(),
        Err(e) => return errors::internal_error(e),
    };

    match verify_password(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_message(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
        Err(e) => return errors::internal_error(e),
    }

    match services.users.issue_token(&user.email) {
        Ok(token) => (StatusCode::OK, Json(serde_json::json!({ "token": token }))).into_response(),
        Err(e) => errors::internal_error(e),
    }
}
