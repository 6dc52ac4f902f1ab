// src/experiences/handlers.rs

use axum::{
    extract::{Extension, Path, Request},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{Experience, ExperienceForm, ExperienceRow};
use super::validators::{CreateExperienceValidator, UpdateExperienceValidator};
use crate::auth::AuthedAdmin;
use crate::common::{
    generate_experience_id, ApiError, ApiResponse, AppState, FormPayload, Validator,
};

/// GET /api/experiences - Most recent position first.
pub async fn get_experiences(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<ApiResponse<Vec<Experience>>>, ApiError> {
    let state = state_lock.read().await.clone();

    let rows: Vec<ExperienceRow> =
        sqlx::query_as::<_, ExperienceRow>("SELECT * FROM experiences ORDER BY start_date DESC")
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::list(
        rows.into_iter().map(Experience::from).collect(),
    )))
}

/// GET /api/experiences/:id
pub async fn get_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Experience>>, ApiError> {
    let state = state_lock.read().await.clone();
    let row = fetch_experience(&state, &id).await?;
    Ok(Json(ApiResponse::data(Experience::from(row))))
}

/// POST /api/experiences
pub async fn create_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<Experience>>), ApiError> {
    let state = state_lock.read().await.clone();

    let payload = FormPayload::from_request(request, ExperienceForm::FILE_SLOTS).await?;
    let form = ExperienceForm::from_payload(payload)?;

    let validation = CreateExperienceValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, errors = ?validation.errors, "Experience creation validation failed");
        return Err(ApiError::from(validation));
    }

    let logo = match &form.company_logo {
        Some(file) => Some(state.media_service.upload(file).await?),
        None => None,
    };

    let current = form.current.unwrap_or(false);
    // An ongoing position never carries an end date, even if one was sent
    let end_date = if current { None } else { form.end_date.clone() };

    let experience_id = generate_experience_id();

    let insert = sqlx::query(
        r#"
        INSERT INTO experiences (
            id, title, company, location, start_date, end_date, current,
            description, responsibilities, technologies,
            company_logo_url, company_logo_media_id
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&experience_id)
    .bind(form.title.as_deref().unwrap())
    .bind(form.company.as_deref().unwrap())
    .bind(form.location.as_deref())
    .bind(form.start_date.as_deref().unwrap())
    .bind(end_date.as_deref())
    .bind(current)
    .bind(form.description.as_deref())
    .bind(serde_json::to_string(&form.responsibilities.clone().unwrap_or_default()).unwrap_or_else(|_| "[]".to_string()))
    .bind(serde_json::to_string(&form.technologies.clone().unwrap_or_default()).unwrap_or_else(|_| "[]".to_string()))
    .bind(logo.as_ref().map(|m| m.url.as_str()))
    .bind(logo.as_ref().map(|m| m.media_id.as_str()))
    .execute(&state.db)
    .await;

    if let Err(e) = insert {
        if let Some(media) = &logo {
            warn!(media_id = %media.media_id, "Experience insert failed, uploaded logo is orphaned");
        }
        return Err(ApiError::DatabaseError(e));
    }

    let row = fetch_experience(&state, &experience_id).await?;

    info!(admin_id = %authed.id, experience_id = %experience_id, "Experience created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(Experience::from(row))),
    ))
}

/// PUT /api/experiences/:id - Partial update. Setting `current` to true
/// clears any stored end date.
pub async fn update_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<ApiResponse<Experience>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_experience(&state, &id).await?;

    let payload = FormPayload::from_request(request, ExperienceForm::FILE_SLOTS).await?;
    let form = ExperienceForm::from_payload(payload)?;

    let validation = UpdateExperienceValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, experience_id = %id, errors = ?validation.errors, "Experience update validation failed");
        return Err(ApiError::from(validation));
    }

    let new_logo = match &form.company_logo {
        Some(file) => Some(state.media_service.upload(file).await?),
        None => None,
    };

    let current = form.current.unwrap_or(existing.current);
    let end_date = if current {
        None
    } else {
        form.end_date.clone().or_else(|| existing.end_date.clone())
    };

    sqlx::query(
        r#"
        UPDATE experiences
        SET title = COALESCE(?, title),
            company = COALESCE(?, company),
            location = COALESCE(?, location),
            start_date = COALESCE(?, start_date),
            end_date = ?,
            current = ?,
            description = COALESCE(?, description),
            responsibilities = COALESCE(?, responsibilities),
            technologies = COALESCE(?, technologies),
            company_logo_url = COALESCE(?, company_logo_url),
            company_logo_media_id = COALESCE(?, company_logo_media_id),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(form.title.as_deref())
    .bind(form.company.as_deref())
    .bind(form.location.as_deref())
    .bind(form.start_date.as_deref())
    .bind(end_date.as_deref())
    .bind(current)
    .bind(form.description.as_deref())
    .bind(
        form.responsibilities
            .as_ref()
            .map(|v| serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())),
    )
    .bind(
        form.technologies
            .as_ref()
            .map(|v| serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())),
    )
    .bind(new_logo.as_ref().map(|m| m.url.as_str()))
    .bind(new_logo.as_ref().map(|m| m.media_id.as_str()))
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    // The replaced logo is deleted only after the row points at the new one
    if new_logo.is_some() {
        if let Some(old_media_id) = existing.company_logo_media_id.as_deref() {
            state.media_service.delete(old_media_id).await;
        }
    }

    let row = fetch_experience(&state, &id).await?;

    info!(admin_id = %authed.id, experience_id = %id, "Experience updated");

    Ok(Json(ApiResponse::data(Experience::from(row))))
}

/// DELETE /api/experiences/:id
pub async fn delete_experience(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_experience(&state, &id).await?;

    sqlx::query("DELETE FROM experiences WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if let Some(media_id) = existing.company_logo_media_id.as_deref() {
        state.media_service.delete(media_id).await;
    }

    info!(admin_id = %authed.id, experience_id = %id, "Experience deleted");

    Ok(Json(ApiResponse::message("Experience deleted successfully")))
}

async fn fetch_experience(state: &AppState, id: &str) -> Result<ExperienceRow, ApiError> {
    sqlx::query_as::<_, ExperienceRow>("SELECT * FROM experiences WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Experience not found".to_string()))
}
