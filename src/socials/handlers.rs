// src/socials/handlers.rs

use axum::{
    extract::{Extension, Path, Query, Request},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{Social, SocialForm, SocialListQuery};
use super::validators::{CreateSocialValidator, UpdateSocialValidator};
use crate::auth::AuthedAdmin;
use crate::common::{generate_social_id, ApiError, ApiResponse, AppState, FormPayload, Validator};

/// GET /api/socials - Optional `?visible=true` filter for the public site.
pub async fn get_socials(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<SocialListQuery>,
) -> Result<Json<ApiResponse<Vec<Social>>>, ApiError> {
    let state = state_lock.read().await.clone();

    let socials: Vec<Social> = match query.visible {
        Some(visible) => {
            sqlx::query_as::<_, Social>("SELECT * FROM socials WHERE visible = ? ORDER BY platform")
                .bind(visible)
                .fetch_all(&state.db)
                .await
        }
        None => {
            sqlx::query_as::<_, Social>("SELECT * FROM socials ORDER BY platform")
                .fetch_all(&state.db)
                .await
        }
    }
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::list(socials)))
}

/// GET /api/socials/:id
pub async fn get_social(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Social>>, ApiError> {
    let state = state_lock.read().await.clone();
    let social = fetch_social(&state, &id).await?;
    Ok(Json(ApiResponse::data(social)))
}

/// POST /api/socials - New links are visible unless stated otherwise.
pub async fn create_social(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<Social>>), ApiError> {
    let state = state_lock.read().await.clone();

    let payload = FormPayload::from_request(request, SocialForm::FILE_SLOTS).await?;
    let form = SocialForm::from_payload(payload)?;

    let validation = CreateSocialValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, errors = ?validation.errors, "Social link creation validation failed");
        return Err(ApiError::from(validation));
    }

    let social_id = generate_social_id();

    sqlx::query(
        r#"
        INSERT INTO socials (id, platform, url, username, visible)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&social_id)
    .bind(form.platform.as_deref().unwrap())
    .bind(form.url.as_deref().unwrap())
    .bind(form.username.as_deref())
    .bind(form.visible.unwrap_or(true))
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let social = fetch_social(&state, &social_id).await?;

    info!(admin_id = %authed.id, social_id = %social_id, "Social link created");

    Ok((StatusCode::CREATED, Json(ApiResponse::data(social))))
}

/// PUT /api/socials/:id - Partial update.
pub async fn update_social(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<ApiResponse<Social>>, ApiError> {
    let state = state_lock.read().await.clone();

    fetch_social(&state, &id).await?;

    let payload = FormPayload::from_request(request, SocialForm::FILE_SLOTS).await?;
    let form = SocialForm::from_payload(payload)?;

    let validation = UpdateSocialValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, social_id = %id, errors = ?validation.errors, "Social link update validation failed");
        return Err(ApiError::from(validation));
    }

    sqlx::query(
        r#"
        UPDATE socials
        SET platform = COALESCE(?, platform),
            url = COALESCE(?, url),
            username = COALESCE(?, username),
            visible = COALESCE(?, visible),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(form.platform.as_deref())
    .bind(form.url.as_deref())
    .bind(form.username.as_deref())
    .bind(form.visible)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let social = fetch_social(&state, &id).await?;

    info!(admin_id = %authed.id, social_id = %id, "Social link updated");

    Ok(Json(ApiResponse::data(social)))
}

/// PATCH /api/socials/:id/toggle-visibility
pub async fn toggle_visibility(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Social>>, ApiError> {
    let state = state_lock.read().await.clone();

    fetch_social(&state, &id).await?;

    sqlx::query(
        "UPDATE socials SET visible = NOT visible, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let social = fetch_social(&state, &id).await?;

    info!(admin_id = %authed.id, social_id = %id, visible = social.visible, "Social link visibility toggled");

    Ok(Json(ApiResponse::data(social)))
}

/// DELETE /api/socials/:id
pub async fn delete_social(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let state = state_lock.read().await.clone();

    fetch_social(&state, &id).await?;

    sqlx::query("DELETE FROM socials WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(admin_id = %authed.id, social_id = %id, "Social link deleted");

    Ok(Json(ApiResponse::message("Social link deleted successfully")))
}

async fn fetch_social(state: &AppState, id: &str) -> Result<Social, ApiError> {
    sqlx::query_as::<_, Social>("SELECT * FROM socials WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Social link not found".to_string()))
}
