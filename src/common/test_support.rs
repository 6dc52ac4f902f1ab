// Shared fixtures for handler tests

use axum::body::Body;
use axum::extract::Request;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::common::migrations::run_migrations;
use crate::common::{generate_admin_id, AppState};
use crate::services::{MediaService, MemoryObjectStore};

/// Fresh in-memory database with the full schema, a recording object
/// store, and a fixed JWT secret.
pub async fn test_state() -> (Arc<RwLock<AppState>>, Arc<MemoryObjectStore>) {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();

    let store = Arc::new(MemoryObjectStore::default());
    let state = AppState {
        db: pool,
        jwt_secret: "test_secret".to_string(),
        media_service: Arc::new(MediaService::new(store.clone())),
    };

    (Arc::new(RwLock::new(state)), store)
}

/// Insert an admin row directly (low bcrypt cost keeps tests fast) and
/// return (id, bearer token).
pub async fn seed_admin(state_lock: &Arc<RwLock<AppState>>) -> (String, String) {
    let state = state_lock.read().await.clone();
    let id = generate_admin_id();
    let hash = bcrypt::hash("password123", 4).unwrap();

    sqlx::query(
        "INSERT INTO admins (id, slot, name, email, password_hash) VALUES (?, 0, ?, ?, ?)",
    )
    .bind(&id)
    .bind("Test Admin")
    .bind("admin@example.com")
    .bind(&hash)
    .execute(&state.db)
    .await
    .unwrap();

    let token = crate::auth::handlers::issue_token(&id, &state.jwt_secret).unwrap();
    (id, token)
}

/// Stand-in authenticated principal for direct handler calls
pub fn authed(id: &str) -> crate::auth::AuthedAdmin {
    crate::auth::AuthedAdmin {
        id: id.to_string(),
        email: "admin@example.com".to_string(),
    }
}

/// A JSON request body for handlers that take `Request`
pub fn json_request(value: serde_json::Value) -> Request {
    Request::builder()
        .header("content-type", "application/json")
        .body(Body::from(value.to_string()))
        .unwrap()
}

/// A multipart request with text fields and named file parts
pub fn multipart_request(fields: &[(&str, &str)], files: &[(&str, &str, Vec<u8>)]) -> Request {
    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for (name, filename, data) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Minimal valid PNG bytes that pass MIME sniffing and decoding
pub fn tiny_png() -> Vec<u8> {
    let img = image::DynamicImage::new_rgb8(4, 4);
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
