//! Tests for the auth module

use axum::extract::{Extension, Json};

use super::handlers;
use super::models::{Claims, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::auth::AuthedAdmin;
use crate::common::test_support::{seed_admin, test_state};
use crate::common::ApiError;

fn register_request(name: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        password: Some(password.to_string()),
    }
}

#[test]
fn test_jwt_round_trip() {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    let token = handlers::issue_token("U_TEST01", "test_secret").unwrap();
    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(b"test_secret"),
        &Validation::new(Algorithm::HS256),
    )
    .expect("token should validate");

    assert_eq!(decoded.claims.sub, "U_TEST01");
}

#[test]
fn test_jwt_rejects_wrong_secret() {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    let token = handlers::issue_token("U_TEST01", "test_secret").unwrap();
    let result = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(b"other_secret"),
        &Validation::new(Algorithm::HS256),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_extractor_resolves_bearer_token() {
    use axum::extract::FromRequestParts;

    let (state, _store) = test_state().await;
    let (admin_id, token) = seed_admin(&state).await;

    let request = axum::extract::Request::builder()
        .header("authorization", format!("Bearer {}", token))
        .extension(state.clone())
        .body(axum::body::Body::empty())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let authed = AuthedAdmin::from_request_parts(&mut parts, &())
        .await
        .unwrap();
    assert_eq!(authed.id, admin_id);
    assert_eq!(authed.email, "admin@example.com");
}

#[tokio::test]
async fn test_extractor_rejects_garbage_token() {
    use axum::extract::FromRequestParts;

    let (state, _store) = test_state().await;
    seed_admin(&state).await;

    let request = axum::extract::Request::builder()
        .header("authorization", "Bearer not.a.jwt")
        .extension(state.clone())
        .body(axum::body::Body::empty())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let err = AuthedAdmin::from_request_parts(&mut parts, &())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn test_register_then_login() {
    let (state, _store) = test_state().await;

    let (status, body) = handlers::register(
        Extension(state.clone()),
        Json(register_request("Ada", "ada@example.com", "hunter22")),
    )
    .await
    .unwrap();
    assert_eq!(status, axum::http::StatusCode::CREATED);
    let data = body.0.data.unwrap();
    assert_eq!(data.email, "ada@example.com");
    assert!(!data.token.is_empty());

    let login = handlers::login(
        Extension(state),
        Json(LoginRequest {
            email: Some("ada@example.com".to_string()),
            password: Some("hunter22".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(login.0.data.unwrap().name, "Ada");
}

#[tokio::test]
async fn test_second_registration_forbidden() {
    let (state, _store) = test_state().await;

    handlers::register(
        Extension(state.clone()),
        Json(register_request("Ada", "ada@example.com", "hunter22")),
    )
    .await
    .unwrap();

    // A second registration fails regardless of payload
    let err = handlers::register(
        Extension(state),
        Json(register_request("Eve", "eve@example.com", "different")),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn test_login_failure_messages_are_identical() {
    let (state, _store) = test_state().await;

    handlers::register(
        Extension(state.clone()),
        Json(register_request("Ada", "ada@example.com", "hunter22")),
    )
    .await
    .unwrap();

    let unknown_email = handlers::login(
        Extension(state.clone()),
        Json(LoginRequest {
            email: Some("nobody@example.com".to_string()),
            password: Some("hunter22".to_string()),
        }),
    )
    .await
    .unwrap_err();

    let wrong_password = handlers::login(
        Extension(state),
        Json(LoginRequest {
            email: Some("ada@example.com".to_string()),
            password: Some("wrong".to_string()),
        }),
    )
    .await
    .unwrap_err();

    let (ApiError::Unauthorized(a), ApiError::Unauthorized(b)) = (unknown_email, wrong_password)
    else {
        panic!("both failures must be Unauthorized");
    };
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_register_validation_lists_all_missing_fields() {
    let (state, _store) = test_state().await;

    let err = handlers::register(
        Extension(state),
        Json(RegisterRequest {
            name: None,
            email: Some("  ".to_string()),
            password: None,
        }),
    )
    .await
    .unwrap_err();

    let ApiError::ValidationError(msg) = err else {
        panic!("expected validation error");
    };
    assert!(msg.contains("name"));
    assert!(msg.contains("email"));
    assert!(msg.contains("password"));
}

#[tokio::test]
async fn test_update_profile_rehashes_password() {
    let (state, _store) = test_state().await;

    let (_, body) = handlers::register(
        Extension(state.clone()),
        Json(register_request("Ada", "ada@example.com", "hunter22")),
    )
    .await
    .unwrap();
    let admin_id = body.0.data.unwrap().id;

    handlers::update_profile(
        Extension(state.clone()),
        AuthedAdmin {
            id: admin_id.clone(),
            email: "ada@example.com".to_string(),
        },
        Json(UpdateProfileRequest {
            name: Some("Ada L".to_string()),
            email: None,
            password: Some("newpassword".to_string()),
        }),
    )
    .await
    .unwrap();

    // Old password no longer works, new one does
    let old = handlers::login(
        Extension(state.clone()),
        Json(LoginRequest {
            email: Some("ada@example.com".to_string()),
            password: Some("hunter22".to_string()),
        }),
    )
    .await;
    assert!(old.is_err());

    let new = handlers::login(
        Extension(state),
        Json(LoginRequest {
            email: Some("ada@example.com".to_string()),
            password: Some("newpassword".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(new.0.data.unwrap().name, "Ada L");
}
