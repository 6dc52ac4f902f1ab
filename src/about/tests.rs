//! Tests for the about module

use axum::extract::Extension;
use axum::http::StatusCode;

use super::handlers;
use crate::common::test_support::{authed, json_request, multipart_request, test_state, tiny_png};
use crate::common::ApiError;

#[tokio::test]
async fn test_get_before_first_save_is_not_found() {
    let (state, _store) = test_state().await;

    let err = handlers::get_about(Extension(state)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_first_save_requires_identity_fields() {
    let (state, _store) = test_state().await;

    let request = json_request(serde_json::json!({ "phone": "+1 555 0100" }));
    let err = handlers::save_about(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();

    match err {
        ApiError::ValidationError(message) => {
            assert!(message.contains("Name is required"));
            assert!(message.contains("Title is required"));
            assert!(message.contains("Bio is required"));
            assert!(message.contains("Email is required"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_saving_twice_keeps_one_row_with_latest_values() {
    let (state, _store) = test_state().await;

    let first = json_request(serde_json::json!({
        "name": "Ada",
        "title": "Engineer",
        "bio": "I build things.",
        "email": "ada@example.com"
    }));
    let (status, body) = handlers::save_about(Extension(state.clone()), authed("U_TEST01"), first)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let created = body.0.data.unwrap();
    // Stats fall back to the shipped defaults
    assert_eq!(created.stats.years_experience, 2);
    assert_eq!(created.stats.projects_completed, 10);

    let second = json_request(serde_json::json!({
        "title": "Staff Engineer",
        "stats": {"yearsExperience": 7}
    }));
    let (status, body) = handlers::save_about(Extension(state.clone()), authed("U_TEST01"), second)
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    let updated = body.0.data.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Staff Engineer");
    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.stats.years_experience, 7);
    // Unpatched counters survive
    assert_eq!(updated.stats.projects_completed, 10);
}

#[tokio::test]
async fn test_negative_stats_rejected() {
    let (state, _store) = test_state().await;

    let request = json_request(serde_json::json!({
        "name": "Ada",
        "title": "Engineer",
        "bio": "Bio",
        "email": "ada@example.com",
        "stats": {"happyClients": -1}
    }));
    let err = handlers::save_about(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_malformed_stats_field_rejected() {
    let (state, _store) = test_state().await;

    let request = multipart_request(
        &[
            ("name", "Ada"),
            ("title", "Engineer"),
            ("bio", "Bio"),
            ("email", "ada@example.com"),
            ("stats", "{not json"),
        ],
        &[],
    );
    let err = handlers::save_about(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_removal_flag_wins_over_simultaneous_upload() {
    let (state, store) = test_state().await;

    let first = multipart_request(
        &[
            ("name", "Ada"),
            ("title", "Engineer"),
            ("bio", "Bio"),
            ("email", "ada@example.com"),
        ],
        &[("profileImage", "ada.png", tiny_png())],
    );
    let (_, body) = handlers::save_about(Extension(state.clone()), authed("U_TEST01"), first)
        .await
        .unwrap();
    let created = body.0.data.unwrap();
    let first_media_id = created.profile_image.unwrap().media_id;
    assert_eq!(store.puts.lock().unwrap().len(), 1);

    let second = multipart_request(
        &[("removeProfileImage", "true")],
        &[("profileImage", "new.png", tiny_png())],
    );
    let (_, body) = handlers::save_about(Extension(state), authed("U_TEST01"), second)
        .await
        .unwrap();
    let updated = body.0.data.unwrap();

    assert!(updated.profile_image.is_none());
    // The flagged slot never uploads the accompanying file
    assert_eq!(store.puts.lock().unwrap().len(), 1);
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &[first_media_id]);
}

#[tokio::test]
async fn test_replacing_profile_image_deletes_previous() {
    let (state, store) = test_state().await;

    let first = multipart_request(
        &[
            ("name", "Ada"),
            ("title", "Engineer"),
            ("bio", "Bio"),
            ("email", "ada@example.com"),
        ],
        &[("profileImage", "ada.png", tiny_png())],
    );
    let (_, body) = handlers::save_about(Extension(state.clone()), authed("U_TEST01"), first)
        .await
        .unwrap();
    let first_media_id = body.0.data.unwrap().profile_image.unwrap().media_id;

    let second = multipart_request(&[], &[("profileImage", "ada2.png", tiny_png())]);
    let (_, body) = handlers::save_about(Extension(state), authed("U_TEST01"), second)
        .await
        .unwrap();
    let updated = body.0.data.unwrap();

    assert_ne!(updated.profile_image.unwrap().media_id, first_media_id);
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &[first_media_id]);
}

#[tokio::test]
async fn test_delete_resume_endpoint() {
    let (state, store) = test_state().await;

    let save = multipart_request(
        &[
            ("name", "Ada"),
            ("title", "Engineer"),
            ("bio", "Bio"),
            ("email", "ada@example.com"),
        ],
        &[("resume", "resume.pdf", b"%PDF-1.4 minimal".to_vec())],
    );
    let (_, body) = handlers::save_about(Extension(state.clone()), authed("U_TEST01"), save)
        .await
        .unwrap();
    let media_id = body.0.data.unwrap().resume.unwrap().media_id;

    let cleared = handlers::delete_resume(Extension(state.clone()), authed("U_TEST01"))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert!(cleared.resume.is_none());
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &[media_id]);

    // A second removal finds nothing to clear
    let err = handlers::delete_resume(Extension(state), authed("U_TEST01"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
