//! Tests for the socials module

use axum::extract::{Extension, Path, Query};

use super::handlers;
use super::models::SocialListQuery;
use crate::common::test_support::{authed, json_request, test_state};
use crate::common::ApiError;

async fn create_link(
    state: &std::sync::Arc<tokio::sync::RwLock<crate::common::AppState>>,
    platform: &str,
    visible: bool,
) -> super::models::Social {
    let request = json_request(serde_json::json!({
        "platform": platform,
        "url": format!("https://{platform}.com/me"),
        "visible": visible
    }));
    let (_, body) = handlers::create_social(Extension(state.clone()), authed("U_TEST01"), request)
        .await
        .unwrap();
    body.0.data.unwrap()
}

#[tokio::test]
async fn test_new_link_is_visible_by_default() {
    let (state, _store) = test_state().await;

    let request = json_request(serde_json::json!({
        "platform": "github",
        "url": "https://github.com/me"
    }));
    let (_, body) = handlers::create_social(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap();

    assert!(body.0.data.unwrap().visible);
}

#[tokio::test]
async fn test_unknown_platform_rejected() {
    let (state, _store) = test_state().await;

    let request = json_request(serde_json::json!({
        "platform": "myspace",
        "url": "https://myspace.com/me"
    }));
    let err = handlers::create_social(Extension(state), authed("U_TEST01"), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_visible_filter_hides_hidden_links() {
    let (state, _store) = test_state().await;
    create_link(&state, "github", true).await;
    create_link(&state, "twitter", false).await;

    let all = handlers::get_socials(
        Extension(state.clone()),
        Query(SocialListQuery { visible: None }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(all.count, Some(2));

    let public = handlers::get_socials(
        Extension(state),
        Query(SocialListQuery {
            visible: Some(true),
        }),
    )
    .await
    .unwrap()
    .0;
    let links = public.data.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].platform, "github");
}

#[tokio::test]
async fn test_toggle_flips_visibility_both_ways() {
    let (state, _store) = test_state().await;
    let link = create_link(&state, "linkedin", true).await;

    let toggled = handlers::toggle_visibility(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(link.id.clone()),
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();
    assert!(!toggled.visible);

    let toggled_back =
        handlers::toggle_visibility(Extension(state), authed("U_TEST01"), Path(link.id))
            .await
            .unwrap()
            .0
            .data
            .unwrap();
    assert!(toggled_back.visible);
}

#[tokio::test]
async fn test_delete_then_fetch_is_not_found() {
    let (state, _store) = test_state().await;
    let link = create_link(&state, "github", true).await;

    handlers::delete_social(
        Extension(state.clone()),
        authed("U_TEST01"),
        Path(link.id.clone()),
    )
    .await
    .unwrap();

    let err = handlers::get_social(Extension(state), Path(link.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
