// src/skills/handlers.rs

use axum::{
    extract::{Extension, Path, Request},
    http::StatusCode,
    Json,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{Skill, SkillForm, SkillGroup, SkillRow};
use super::validators::{CreateSkillValidator, UpdateSkillValidator};
use crate::auth::AuthedAdmin;
use crate::common::{generate_skill_id, ApiError, ApiResponse, AppState, FormPayload, Validator};

/// GET /api/skills
pub async fn get_skills(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<ApiResponse<Vec<Skill>>>, ApiError> {
    let state = state_lock.read().await.clone();

    let rows: Vec<SkillRow> = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::list(
        rows.into_iter().map(Skill::from).collect(),
    )))
}

/// GET /api/skills/grouped - Skills bucketed by category, groups sorted by
/// category name.
pub async fn get_skills_grouped(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<ApiResponse<Vec<SkillGroup>>>, ApiError> {
    let state = state_lock.read().await.clone();

    let rows: Vec<SkillRow> = sqlx::query_as::<_, SkillRow>("SELECT * FROM skills")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let mut buckets: BTreeMap<String, Vec<Skill>> = BTreeMap::new();
    for row in rows {
        buckets
            .entry(row.category.clone())
            .or_default()
            .push(Skill::from(row));
    }

    let groups = buckets
        .into_iter()
        .map(|(category, skills)| SkillGroup { category, skills })
        .collect();

    Ok(Json(ApiResponse::list(groups)))
}

/// GET /api/skills/:id
pub async fn get_skill(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Skill>>, ApiError> {
    let state = state_lock.read().await.clone();
    let row = fetch_skill(&state, &id).await?;
    Ok(Json(ApiResponse::data(Skill::from(row))))
}

/// POST /api/skills - Either `iconName` (built-in set) or an uploaded icon
pub async fn create_skill(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<Skill>>), ApiError> {
    let state = state_lock.read().await.clone();

    let payload = FormPayload::from_request(request, SkillForm::FILE_SLOTS).await?;
    let form = SkillForm::from_payload(payload)?;

    let validation = CreateSkillValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, errors = ?validation.errors, "Skill creation validation failed");
        return Err(ApiError::from(validation));
    }

    // A built-in icon name wins over a simultaneously uploaded file, so the
    // upload is skipped entirely in that case.
    let icon = match (&form.icon_name, &form.icon) {
        (None, Some(file)) => Some(state.media_service.upload(file).await?),
        _ => None,
    };

    let skill_id = generate_skill_id();

    sqlx::query(
        r#"
        INSERT INTO skills (id, name, category, proficiency, icon_name, icon_url, icon_media_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&skill_id)
    .bind(form.name.as_deref().unwrap())
    .bind(form.category.as_deref().unwrap())
    .bind(form.proficiency.unwrap())
    .bind(form.icon_name.as_deref())
    .bind(icon.as_ref().map(|m| m.url.as_str()))
    .bind(icon.as_ref().map(|m| m.media_id.as_str()))
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let row = fetch_skill(&state, &skill_id).await?;

    info!(admin_id = %authed.id, skill_id = %skill_id, "Skill created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(Skill::from(row))),
    ))
}

/// PUT /api/skills/:id - Partial update. Switching between a built-in icon
/// and an uploaded one clears the other side; a replaced upload is deleted
/// remotely after the new object is stored.
pub async fn update_skill(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<ApiResponse<Skill>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_skill(&state, &id).await?;

    let payload = FormPayload::from_request(request, SkillForm::FILE_SLOTS).await?;
    let form = SkillForm::from_payload(payload)?;

    let validation = UpdateSkillValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, skill_id = %id, errors = ?validation.errors, "Skill update validation failed");
        return Err(ApiError::from(validation));
    }

    let new_icon = match (&form.icon_name, &form.icon) {
        (None, Some(file)) => Some(state.media_service.upload(file).await?),
        _ => None,
    };

    if let Some(icon) = &new_icon {
        sqlx::query(
            r#"
            UPDATE skills
            SET name = COALESCE(?, name),
                category = COALESCE(?, category),
                proficiency = COALESCE(?, proficiency),
                icon_name = NULL,
                icon_url = ?,
                icon_media_id = ?,
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(form.name.as_deref())
        .bind(form.category.as_deref())
        .bind(form.proficiency)
        .bind(&icon.url)
        .bind(&icon.media_id)
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;
    } else if form.icon_name.is_some() {
        sqlx::query(
            r#"
            UPDATE skills
            SET name = COALESCE(?, name),
                category = COALESCE(?, category),
                proficiency = COALESCE(?, proficiency),
                icon_name = ?,
                icon_url = NULL,
                icon_media_id = NULL,
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(form.name.as_deref())
        .bind(form.category.as_deref())
        .bind(form.proficiency)
        .bind(form.icon_name.as_deref())
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;
    } else {
        sqlx::query(
            r#"
            UPDATE skills
            SET name = COALESCE(?, name),
                category = COALESCE(?, category),
                proficiency = COALESCE(?, proficiency),
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(form.name.as_deref())
        .bind(form.category.as_deref())
        .bind(form.proficiency)
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;
    }

    // The previous uploaded icon is unreferenced whenever a new upload or a
    // built-in icon replaced it
    if new_icon.is_some() || form.icon_name.is_some() {
        if let Some(old_media_id) = existing.icon_media_id.as_deref() {
            state.media_service.delete(old_media_id).await;
        }
    }

    let row = fetch_skill(&state, &id).await?;

    info!(admin_id = %authed.id, skill_id = %id, "Skill updated");

    Ok(Json(ApiResponse::data(Skill::from(row))))
}

/// DELETE /api/skills/:id
pub async fn delete_skill(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_skill(&state, &id).await?;

    sqlx::query("DELETE FROM skills WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if let Some(media_id) = existing.icon_media_id.as_deref() {
        state.media_service.delete(media_id).await;
    }

    info!(admin_id = %authed.id, skill_id = %id, "Skill deleted");

    Ok(Json(ApiResponse::message("Skill deleted successfully")))
}

async fn fetch_skill(state: &AppState, id: &str) -> Result<SkillRow, ApiError> {
    sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Skill not found".to_string()))
}
