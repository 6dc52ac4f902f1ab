// src/projects/handlers.rs

use axum::{
    extract::{Extension, Path, Query, Request},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{Project, ProjectForm, ProjectRow};
use super::validators::{CreateProjectValidator, UpdateProjectValidator};
use crate::auth::AuthedAdmin;
use crate::common::{generate_project_id, ApiError, ApiResponse, AppState, FormPayload, Validator};

#[derive(Deserialize, Debug)]
pub struct ProjectListQuery {
    pub featured: Option<bool>,
}

/// GET /api/projects - Public listing, optional featured filter
pub async fn get_projects(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let state = state_lock.read().await.clone();

    let rows: Vec<ProjectRow> = match query.featured {
        Some(featured) => {
            sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE featured = ?")
                .bind(featured)
                .fetch_all(&state.db)
                .await
        }
        None => {
            sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects")
                .fetch_all(&state.db)
                .await
        }
    }
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::list(
        rows.into_iter().map(Project::from).collect(),
    )))
}

/// GET /api/projects/:id
pub async fn get_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let state = state_lock.read().await.clone();
    let row = fetch_project(&state, &id).await?;
    Ok(Json(ApiResponse::data(Project::from(row))))
}

/// POST /api/projects - Create with a required image upload
pub async fn create_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), ApiError> {
    let state = state_lock.read().await.clone();

    let payload = FormPayload::from_request(request, ProjectForm::FILE_SLOTS).await?;
    let form = ProjectForm::from_payload(payload)?;

    let validation = CreateProjectValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, errors = ?validation.errors, "Project creation validation failed");
        return Err(ApiError::from(validation));
    }

    // Required by the validator above; upload happens only after validation
    // and before the row insert, so a failed upload never leaves a document
    // pointing at a nonexistent object.
    let image_file = form.image.as_ref().unwrap();
    let image = state.media_service.upload(image_file).await?;

    let project_id = generate_project_id();
    let technologies =
        serde_json::to_string(&form.technologies.unwrap_or_default()).unwrap_or_default();

    let insert = sqlx::query(
        r#"
        INSERT INTO projects
            (id, title, description, short_description, category, technologies,
             github_link, live_link, image_url, image_media_id, featured)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&project_id)
    .bind(form.title.as_deref().unwrap())
    .bind(form.description.as_deref().unwrap())
    .bind(form.short_description.as_deref())
    .bind(form.category.as_deref().unwrap_or("other"))
    .bind(&technologies)
    .bind(form.github_link.as_deref())
    .bind(form.live_link.as_deref())
    .bind(&image.url)
    .bind(&image.media_id)
    .bind(form.featured.unwrap_or(false))
    .execute(&state.db)
    .await;

    if let Err(e) = insert {
        // The uploaded object is orphaned here; accepted and logged
        warn!(error = %e, media_id = %image.media_id, "Project insert failed after upload");
        return Err(ApiError::DatabaseError(e));
    }

    let row = fetch_project(&state, &project_id).await?;

    info!(admin_id = %authed.id, project_id = %project_id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(Project::from(row))),
    ))
}

/// PUT /api/projects/:id - Partial update; a replacement image is uploaded
/// before the row write and the old object deleted only afterwards.
pub async fn update_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_project(&state, &id).await?;

    let payload = FormPayload::from_request(request, ProjectForm::FILE_SLOTS).await?;
    let form = ProjectForm::from_payload(payload)?;

    let validation = UpdateProjectValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, project_id = %id, errors = ?validation.errors, "Project update validation failed");
        return Err(ApiError::from(validation));
    }

    let new_image = match form.image.as_ref() {
        Some(file) => Some(state.media_service.upload(file).await?),
        None => None,
    };

    let technologies = form
        .technologies
        .map(|t| serde_json::to_string(&t).unwrap_or_default());

    sqlx::query(
        r#"
        UPDATE projects
        SET title = COALESCE(?, title),
            description = COALESCE(?, description),
            short_description = COALESCE(?, short_description),
            category = COALESCE(?, category),
            technologies = COALESCE(?, technologies),
            github_link = COALESCE(?, github_link),
            live_link = COALESCE(?, live_link),
            image_url = COALESCE(?, image_url),
            image_media_id = COALESCE(?, image_media_id),
            featured = COALESCE(?, featured),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(form.title.as_deref())
    .bind(form.description.as_deref())
    .bind(form.short_description.as_deref())
    .bind(form.category.as_deref())
    .bind(technologies.as_deref())
    .bind(form.github_link.as_deref())
    .bind(form.live_link.as_deref())
    .bind(new_image.as_ref().map(|m| m.url.as_str()))
    .bind(new_image.as_ref().map(|m| m.media_id.as_str()))
    .bind(form.featured)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    // Old object removed only after the new one is stored and referenced
    if new_image.is_some() {
        state.media_service.delete(&existing.image_media_id).await;
    }

    let row = fetch_project(&state, &id).await?;

    info!(admin_id = %authed.id, project_id = %id, "Project updated");

    Ok(Json(ApiResponse::data(Project::from(row))))
}

/// DELETE /api/projects/:id - Remove the document, then best-effort delete
/// its media.
pub async fn delete_project(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_project(&state, &id).await?;

    sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    state.media_service.delete(&existing.image_media_id).await;

    info!(admin_id = %authed.id, project_id = %id, "Project deleted");

    Ok(Json(ApiResponse::message("Project deleted successfully")))
}

async fn fetch_project(state: &AppState, id: &str) -> Result<ProjectRow, ApiError> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}
