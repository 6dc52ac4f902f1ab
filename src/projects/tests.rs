//! Tests for the projects module

use axum::extract::{Extension, Path, Query};

use super::handlers::{self, ProjectListQuery};
use crate::common::test_support::{
    authed, json_request, multipart_request, test_state, tiny_png,
};
use crate::common::ApiError;

async fn create_sample(
    state: &std::sync::Arc<tokio::sync::RwLock<crate::common::AppState>>,
    title: &str,
    featured: bool,
) -> super::models::Project {
    let request = multipart_request(
        &[
            ("title", title),
            ("description", "A longer description"),
            ("shortDescription", "Short"),
            ("category", "web"),
            ("technologies", r#"["rust", "axum"]"#),
            ("githubLink", "https://github.com/x/y"),
            ("featured", if featured { "true" } else { "false" }),
        ],
        &[("image", "shot.png", tiny_png())],
    );

    let (status, body) = handlers::create_project(Extension(state.clone()), authed("U_TEST01"), request)
        .await
        .unwrap();
    assert_eq!(status, axum::http::StatusCode::CREATED);
    body.0.data.unwrap()
}

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let (state, store) = test_state().await;

    let created = create_sample(&state, "Portfolio Site", true).await;
    assert_eq!(created.category, "web");
    assert_eq!(created.technologies, vec!["rust", "axum"]);
    assert!(created.featured);
    assert_eq!(store.puts.lock().unwrap().len(), 1);

    let fetched = handlers::get_project(Extension(state), Path(created.id.clone()))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.image, created.image);
}

#[tokio::test]
async fn test_create_without_image_never_reaches_store() {
    let (state, store) = test_state().await;

    let request = json_request(serde_json::json!({
        "title": "No Image",
        "description": "Missing the required file"
    }));

    let err = handlers::create_project(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();

    let ApiError::ValidationError(msg) = err else {
        panic!("expected validation error");
    };
    assert!(msg.contains("image"));
    assert!(store.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_update_preserves_unspecified_fields() {
    let (state, _store) = test_state().await;
    let created = create_sample(&state, "Original Title", false).await;

    let request = json_request(serde_json::json!({ "title": "Renamed" }));
    let updated = handlers::update_project(
        Extension(state),
        authed("U_TEST01"),
        Path(created.id.clone()),
        request,
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.technologies, created.technologies);
    assert_eq!(updated.image, created.image);
}

#[tokio::test]
async fn test_replacing_image_deletes_old_media_once() {
    let (state, store) = test_state().await;
    let created = create_sample(&state, "With Image", false).await;

    let request = multipart_request(&[], &[("image", "new.png", tiny_png())]);
    let updated = handlers::update_project(
        Extension(state),
        authed("U_TEST01"),
        Path(created.id.clone()),
        request,
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();

    assert_ne!(updated.image.media_id, created.image.media_id);
    assert_eq!(
        store.deletes.lock().unwrap().as_slice(),
        &[created.image.media_id]
    );
}

#[tokio::test]
async fn test_delete_removes_document_and_media() {
    let (state, store) = test_state().await;
    let created = create_sample(&state, "Doomed", false).await;

    handlers::delete_project(Extension(state.clone()), authed("U_TEST01"), Path(created.id.clone()))
        .await
        .unwrap();

    let err = handlers::get_project(Extension(state), Path(created.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(
        store.deletes.lock().unwrap().as_slice(),
        &[created.image.media_id]
    );
}

#[tokio::test]
async fn test_featured_filter() {
    let (state, _store) = test_state().await;
    create_sample(&state, "Featured", true).await;
    create_sample(&state, "Plain", false).await;

    let all = handlers::get_projects(Extension(state.clone()), Query(ProjectListQuery { featured: None }))
        .await
        .unwrap();
    assert_eq!(all.0.count, Some(2));

    let featured = handlers::get_projects(
        Extension(state),
        Query(ProjectListQuery {
            featured: Some(true),
        }),
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].title, "Featured");
}

#[tokio::test]
async fn test_invalid_category_rejected() {
    let (state, _store) = test_state().await;

    let request = multipart_request(
        &[
            ("title", "Bad Category"),
            ("description", "desc"),
            ("category", "desktop"),
        ],
        &[("image", "shot.png", tiny_png())],
    );

    let err = handlers::create_project(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}
