use libreria_auth::{Hs256TokenSigner, TOKEN_TTL_MINUTES};
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = libreria_api::app::build_app(jwt_secret.to_string()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn signup(client: &reqwest::Client, base_url: &str, email: &str, password: &str) -> String {
    let res = client
        .post(format!("{}/users", base_url))
        .json(&json!({ "email": email, "name": "Ada", "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_book(client: &reqwest::Client, base_url: &str, title: &str, author: &str) -> String {
    let res = client
        .post(format!("{}/books", base_url))
        .json(&json!({ "title": title, "author": author, "price": 19.99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let srv = TestServer::spawn("test-secret").await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_returns_id_and_email_only() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/users", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "name": "Ada", "password": "hunter2" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], "ada@example.com");
    assert!(body["id"].as_str().is_some());

    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 2, "signup body must carry id and email only: {body}");
}

#[tokio::test]
async fn signup_rejects_duplicate_email() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;

    let res = client
        .post(format!("{}/users", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "name": "Other", "password": "hunter3" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn signup_rejects_malformed_email() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/users", srv.base_url))
        .json(&json!({ "email": "not-an-email", "name": "Ada", "password": "hunter2" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn missing_user_yields_resource_not_found() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    // A random UUID and a non-UUID string are both "no such record".
    for id in ["00000000-0000-7000-8000-000000000000", "does-not-exist"] {
        let res = client
            .get(format!("{}/users/{}", srv.base_url, id))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "User not found");
    }

    let res = client
        .put(format!("{}/users/00000000-0000-7000-8000-000000000000", srv.base_url))
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/users/00000000-0000-7000-8000-000000000000", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_listing_never_echoes_password_material() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let id = signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;

    for url in [
        format!("{}/users", srv.base_url),
        format!("{}/users/{}", srv.base_url, id),
    ] {
        let res = client.get(url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let text = res.text().await.unwrap();
        assert!(!text.contains("password"), "password material leaked: {text}");
        assert!(!text.contains("$2"), "bcrypt hash leaked: {text}");
    }
}

#[tokio::test]
async fn login_returns_short_lived_token_with_email_claim() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;

    let res = client
        .post(format!("{}/users/login", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    let claims = Hs256TokenSigner::new(b"test-secret").verify(token).unwrap();
    assert_eq!(claims.user, "ada@example.com");
    assert_eq!(claims.exp - claims.iat, TOKEN_TTL_MINUTES * 60);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;

    // Wrong password: 401.
    let res = client
        .post(format!("{}/users/login", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");

    // Unknown email: 404.
    let res = client
        .post(format!("{}/users/login", srv.base_url))
        .json(&json!({ "email": "nobody@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn user_update_rehashes_password() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let id = signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;

    let res = client
        .put(format!("{}/users/{}", srv.base_url, id))
        .json(&json!({ "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // New password logs in, the old one no longer does.
    let res = client
        .post(format!("{}/users/login", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "password": "correct horse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/users/login", srv.base_url))
        .json(&json!({ "email": "ada@example.com", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleting_a_user_twice_yields_204_then_404() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let id = signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;

    let res = client
        .delete(format!("{}/users/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.text().await.unwrap().is_empty());

    let res = client
        .delete(format!("{}/users/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn book_crud_lifecycle() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    // Create ignores any client attempt to pre-sell the book.
    let res = client
        .post(format!("{}/books", srv.base_url))
        .json(&json!({ "title": "El Hobbit", "author": "Tolkien", "price": 19.99, "is_sold": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["is_sold"], false);
    assert_eq!(created["buyer_id"], Value::Null);
    let id = created["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/books/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched["title"], "El Hobbit");
    assert_eq!(fetched["price"], 19.99);

    let res = client
        .put(format!("{}/books/{}", srv.base_url, id))
        .json(&json!({ "price": 24.99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["price"], 24.99);
    assert_eq!(updated["title"], "El Hobbit");

    let res = client.get(format!("{}/books", srv.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Value = res.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let res = client
        .delete(format!("{}/books/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .delete(format!("{}/books/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn generic_update_cannot_mark_a_book_sold() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let id = create_book(&client, &srv.base_url, "El Hobbit", "Tolkien").await;

    let res = client
        .put(format!("{}/books/{}", srv.base_url, id))
        .json(&json!({ "is_sold": true, "price": 9.99 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["price"], 9.99);
    assert_eq!(body["is_sold"], false, "sale state must not be patchable");
}

#[tokio::test]
async fn author_lookup_is_case_insensitive() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    create_book(&client, &srv.base_url, "El Hobbit", "Tolkien").await;
    create_book(&client, &srv.base_url, "Silmarillion", "TOLKIEN").await;
    create_book(&client, &srv.base_url, "Dune", "Herbert").await;

    let mut result_sets = Vec::new();
    for query in ["tolkien", "TOLKIEN"] {
        let res = client
            .get(format!("{}/books/author/{}", srv.base_url, query))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body.as_array().unwrap().len(), 2);
        result_sets.push(body);
    }
    assert_eq!(result_sets[0], result_sets[1]);

    // Unknown author: 200 with an empty array, not an error.
    let res = client
        .get(format!("{}/books/author/nobody", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn purchase_flow_confirms_then_blocks_resale() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let user_id = signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;
    let book_id = create_book(&client, &srv.base_url, "El Hobbit", "Tolkien").await;

    let res = client
        .post(format!("{}/books/{}/buy/{}", srv.base_url, book_id, user_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        format!("El libro El Hobbit ha sido comprado por el usuario con ID {user_id}.")
    );

    // The record now carries the sale.
    let res = client
        .get(format!("{}/books/{}", srv.base_url, book_id))
        .send()
        .await
        .unwrap();
    let book: Value = res.json().await.unwrap();
    assert_eq!(book["is_sold"], true);
    assert_eq!(book["buyer_id"], Value::String(user_id.clone()));

    // Same book again, even for another buyer: rejected.
    let other = signup(&client, &srv.base_url, "eva@example.com", "hunter2").await;
    let res = client
        .post(format!("{}/books/{}/buy/{}", srv.base_url, book_id, other))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Book not found or already sold");
}

#[tokio::test]
async fn purchase_rejects_missing_book_or_buyer() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let user_id = signup(&client, &srv.base_url, "ada@example.com", "hunter2").await;
    let book_id = create_book(&client, &srv.base_url, "El Hobbit", "Tolkien").await;

    // Nonexistent book.
    let res = client
        .post(format!(
            "{}/books/00000000-0000-7000-8000-000000000000/buy/{}",
            srv.base_url, user_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Book not found or already sold");

    // Nonexistent buyer leaves the book available.
    let res = client
        .post(format!(
            "{}/books/{}/buy/00000000-0000-7000-8000-000000000000",
            srv.base_url, book_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/books/{}", srv.base_url, book_id))
        .send()
        .await
        .unwrap();
    let book: Value = res.json().await.unwrap();
    assert_eq!(book["is_sold"], false);
}
