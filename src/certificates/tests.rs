//! Tests for the certificates module

use axum::extract::{Extension, Path};

use super::handlers;
use crate::common::test_support::{authed, json_request, multipart_request, test_state, tiny_png};
use crate::common::ApiError;

#[tokio::test]
async fn test_create_and_fetch_round_trip() {
    let (state, store) = test_state().await;

    let request = multipart_request(
        &[
            ("title", "AWS Certified Developer"),
            ("issuer", "Amazon Web Services"),
            ("issueDate", "2024-03-01"),
            ("credentialId", "ABC-123"),
            ("credentialUrl", "https://aws.example.com/verify/ABC-123"),
        ],
        &[("image", "cert.png", tiny_png())],
    );
    let (status, body) =
        handlers::create_certificate(Extension(state.clone()), authed("U_TEST01"), request)
            .await
            .unwrap();
    assert_eq!(status, axum::http::StatusCode::CREATED);
    let created = body.0.data.unwrap();
    assert_eq!(created.issuer, "Amazon Web Services");
    assert_eq!(store.puts.lock().unwrap().len(), 1);

    let fetched = handlers::get_certificate(Extension(state), Path(created.id.clone()))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.credential_id.as_deref(), Some("ABC-123"));
}

#[tokio::test]
async fn test_missing_image_never_reaches_store() {
    let (state, store) = test_state().await;

    let request = json_request(serde_json::json!({
        "title": "AWS Certified Developer",
        "issuer": "Amazon Web Services"
    }));
    let err = handlers::create_certificate(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ValidationError(_)));
    assert!(store.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_credential_url_rejected() {
    let (state, _store) = test_state().await;

    let request = multipart_request(
        &[
            ("title", "Cert"),
            ("issuer", "Issuer"),
            ("credentialUrl", "ftp://not-a-web-url"),
        ],
        &[("image", "cert.png", tiny_png())],
    );
    let err = handlers::create_certificate(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_replacing_image_deletes_previous_upload() {
    let (state, store) = test_state().await;

    let request = multipart_request(
        &[("title", "Cert"), ("issuer", "Issuer")],
        &[("image", "cert.png", tiny_png())],
    );
    let (_, body) =
        handlers::create_certificate(Extension(state.clone()), authed("U_TEST01"), request)
            .await
            .unwrap();
    let created = body.0.data.unwrap();
    let first_media_id = created.image.media_id.clone();

    let update = multipart_request(&[], &[("image", "cert2.png", tiny_png())]);
    let updated = handlers::update_certificate(
        Extension(state),
        authed("U_TEST01"),
        Path(created.id),
        update,
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();

    assert_ne!(updated.image.media_id, first_media_id);
    // Untouched fields survive the partial update
    assert_eq!(updated.title, "Cert");
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &[first_media_id]);
}

#[tokio::test]
async fn test_delete_removes_row_and_media() {
    let (state, store) = test_state().await;

    let request = multipart_request(
        &[("title", "Cert"), ("issuer", "Issuer")],
        &[("image", "cert.png", tiny_png())],
    );
    let (_, body) =
        handlers::create_certificate(Extension(state.clone()), authed("U_TEST01"), request)
            .await
            .unwrap();
    let created = body.0.data.unwrap();
    let media_id = created.image.media_id.clone();

    handlers::delete_certificate(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(created.id.clone()),
    )
    .await
    .unwrap();

    let err = handlers::get_certificate(Extension(state), Path(created.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &[media_id]);
}
