//! Tests for the contacts module

use axum::extract::{Extension, Path};

use super::handlers;
use super::models::ContactStats;
use crate::common::test_support::{authed, json_request, test_state};
use crate::common::ApiError;

async fn submit(
    state: &std::sync::Arc<tokio::sync::RwLock<crate::common::AppState>>,
    name: &str,
) -> super::models::Contact {
    let request = json_request(serde_json::json!({
        "name": name,
        "email": "visitor@example.com",
        "message": "Hello, I would like to work with you."
    }));
    let (_, body) = handlers::create_contact(Extension(state.clone()), request)
        .await
        .unwrap();
    body.0.data.unwrap()
}

#[tokio::test]
async fn test_public_submission_starts_unread() {
    let (state, _store) = test_state().await;

    let contact = submit(&state, "Alice").await;
    assert!(!contact.is_read);
    assert!(!contact.replied);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let (state, _store) = test_state().await;

    let request = json_request(serde_json::json!({
        "name": "Alice",
        "email": "not-an-email",
        "message": "Hi"
    }));
    let err = handlers::create_contact(Extension(state), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_replied_implies_read_and_is_idempotent() {
    let (state, _store) = test_state().await;
    let contact = submit(&state, "Alice").await;

    let replied = handlers::mark_replied(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(contact.id.clone()),
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();
    assert!(replied.replied);
    assert!(replied.is_read);

    // A second call changes nothing
    let again = handlers::mark_replied(Extension(state), authed("U_TEST01"), Path(contact.id))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert!(again.replied);
    assert!(again.is_read);
}

#[tokio::test]
async fn test_stats_track_read_and_replied_transitions() {
    let (state, _store) = test_state().await;
    let first = submit(&state, "Alice").await;
    let second = submit(&state, "Bob").await;
    submit(&state, "Carol").await;

    handlers::mark_read(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(first.id),
    )
    .await
    .unwrap();
    handlers::mark_replied(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(second.id),
    )
    .await
    .unwrap();

    let stats = handlers::get_contact_stats(Extension(state), authed("U_TEST01"))
        .await
        .unwrap()
        .0
        .data
        .unwrap();

    assert_eq!(
        stats,
        ContactStats {
            total: 3,
            unread: 1,
            read: 2,
            replied: 1,
        }
    );
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let (state, _store) = test_state().await;
    submit(&state, "Alice").await;
    submit(&state, "Bob").await;

    let listed = handlers::get_contacts(Extension(state), authed("U_TEST01"))
        .await
        .unwrap()
        .0
        .data
        .unwrap();

    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
}

#[tokio::test]
async fn test_delete_then_fetch_is_not_found() {
    let (state, _store) = test_state().await;
    let contact = submit(&state, "Alice").await;

    handlers::delete_contact(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(contact.id.clone()),
    )
    .await
    .unwrap();

    let err = handlers::get_contact(Extension(state), authed("U_TEST01"), Path(contact.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
