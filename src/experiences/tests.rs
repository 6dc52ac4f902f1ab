//! Tests for the experiences module

use axum::extract::{Extension, Path};

use super::handlers;
use crate::common::test_support::{authed, json_request, multipart_request, test_state, tiny_png};
use crate::common::ApiError;

async fn create_position(
    state: &std::sync::Arc<tokio::sync::RwLock<crate::common::AppState>>,
    title: &str,
    start_date: &str,
    current: bool,
) -> super::models::Experience {
    let request = json_request(serde_json::json!({
        "title": title,
        "company": "Acme",
        "startDate": start_date,
        "endDate": "2024-01-01",
        "current": current,
        "responsibilities": ["shipping"],
        "technologies": ["rust"]
    }));
    let (_, body) =
        handlers::create_experience(Extension(state.clone()), authed("U_TEST01"), request)
            .await
            .unwrap();
    body.0.data.unwrap()
}

#[tokio::test]
async fn test_current_position_drops_end_date() {
    let (state, _store) = test_state().await;

    let experience = create_position(&state, "Engineer", "2023-05-01", true).await;

    assert!(experience.current);
    assert!(experience.end_date.is_none());
    assert_eq!(experience.responsibilities, vec!["shipping"]);
}

#[tokio::test]
async fn test_listing_orders_most_recent_first() {
    let (state, _store) = test_state().await;
    create_position(&state, "Junior", "2019-03-01", false).await;
    create_position(&state, "Senior", "2023-05-01", true).await;
    create_position(&state, "Mid", "2021-07-01", false).await;

    let listed = handlers::get_experiences(Extension(state))
        .await
        .unwrap()
        .0
        .data
        .unwrap();

    let titles: Vec<&str> = listed.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Senior", "Mid", "Junior"]);
}

#[tokio::test]
async fn test_missing_required_fields_lists_every_violation() {
    let (state, _store) = test_state().await;

    let request = json_request(serde_json::json!({ "location": "Remote" }));
    let err = handlers::create_experience(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();

    match err {
        ApiError::ValidationError(message) => {
            assert!(message.contains("Title is required"));
            assert!(message.contains("Company is required"));
            assert!(message.contains("Start date is required"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_marking_current_clears_stored_end_date() {
    let (state, _store) = test_state().await;
    let experience = create_position(&state, "Engineer", "2022-01-01", false).await;
    assert_eq!(experience.end_date.as_deref(), Some("2024-01-01"));

    let update = json_request(serde_json::json!({ "current": true }));
    let updated = handlers::update_experience(
        Extension(state),
        authed("U_TEST01"),
        Path(experience.id),
        update,
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();

    assert!(updated.current);
    assert!(updated.end_date.is_none());
    // Untouched fields survive the partial update
    assert_eq!(updated.company, "Acme");
}

#[tokio::test]
async fn test_replacing_logo_deletes_previous_upload() {
    let (state, store) = test_state().await;

    let request = multipart_request(
        &[
            ("title", "Engineer"),
            ("company", "Acme"),
            ("startDate", "2023-05-01"),
        ],
        &[("companyLogo", "acme.png", tiny_png())],
    );
    let (_, body) =
        handlers::create_experience(Extension(state.clone()), authed("U_TEST01"), request)
            .await
            .unwrap();
    let experience = body.0.data.unwrap();
    let first_media_id = experience.company_logo.unwrap().media_id;

    let update = multipart_request(&[], &[("companyLogo", "acme2.png", tiny_png())]);
    let updated = handlers::update_experience(
        Extension(state),
        authed("U_TEST01"),
        Path(experience.id),
        update,
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();

    assert_ne!(updated.company_logo.unwrap().media_id, first_media_id);
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &[first_media_id]);
}

#[tokio::test]
async fn test_delete_removes_row_and_media() {
    let (state, store) = test_state().await;

    let request = multipart_request(
        &[
            ("title", "Engineer"),
            ("company", "Acme"),
            ("startDate", "2023-05-01"),
        ],
        &[("companyLogo", "acme.png", tiny_png())],
    );
    let (_, body) =
        handlers::create_experience(Extension(state.clone()), authed("U_TEST01"), request)
            .await
            .unwrap();
    let experience = body.0.data.unwrap();
    let media_id = experience.company_logo.unwrap().media_id;

    handlers::delete_experience(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(experience.id.clone()),
    )
    .await
    .unwrap();

    let err = handlers::get_experience(Extension(state), Path(experience.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &[media_id]);
}
