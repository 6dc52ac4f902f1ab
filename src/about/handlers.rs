// src/about/handlers.rs

use axum::{
    extract::{Extension, Request},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{About, AboutForm, AboutRow, AboutStats};
use super::validators::{CreateAboutValidator, UpdateAboutValidator};
use crate::auth::AuthedAdmin;
use crate::common::{
    generate_about_id, ApiError, ApiResponse, AppState, FormPayload, UploadedFile, Validator,
};
use crate::services::{MediaObject, MediaService};

/// GET /api/about - Public singleton; 404 until the owner saves a profile.
pub async fn get_about(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<ApiResponse<About>>, ApiError> {
    let state = state_lock.read().await.clone();

    let row = fetch_about(&state).await?;
    row.map(|r| Json(ApiResponse::data(About::from(r))))
        .ok_or_else(|| ApiError::NotFound("About information not found".to_string()))
}

/// POST /api/about - Create-if-absent, otherwise update-in-place. The first
/// save must carry name, title, bio and email; later saves are partial.
pub async fn save_about(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<About>>), ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_about(&state).await?;

    let payload = FormPayload::from_request(request, AboutForm::FILE_SLOTS).await?;
    let form = AboutForm::from_payload(payload)?;

    let validation = match &existing {
        None => CreateAboutValidator.validate(&form),
        Some(_) => UpdateAboutValidator.validate(&form),
    };
    if !validation.is_valid {
        warn!(admin_id = %authed.id, errors = ?validation.errors, "About save validation failed");
        return Err(ApiError::from(validation));
    }

    // Resolve each media slot before touching the database. A removal flag
    // wins over a simultaneously uploaded file for the same slot.
    let existing_profile_image = existing.as_ref().and_then(|r| {
        media_pair(
            r.profile_image_url.as_deref(),
            r.profile_image_media_id.as_deref(),
        )
    });
    let existing_resume = existing
        .as_ref()
        .and_then(|r| media_pair(r.resume_url.as_deref(), r.resume_media_id.as_deref()));

    let (profile_image, stale_profile_image) = resolve_slot(
        &state.media_service,
        existing_profile_image,
        form.profile_image.as_ref(),
        form.remove_profile_image,
    )
    .await?;
    let (resume, stale_resume) = resolve_slot(
        &state.media_service,
        existing_resume,
        form.resume.as_ref(),
        form.remove_resume,
    )
    .await?;

    let base_stats = existing
        .as_ref()
        .map(|r| AboutStats {
            years_experience: r.years_experience,
            projects_completed: r.projects_completed,
            certificates_earned: r.certificates_earned,
            happy_clients: r.happy_clients,
        })
        .unwrap_or_default();
    let stats = form
        .stats
        .as_ref()
        .map(|patch| patch.apply_to(base_stats.clone()))
        .unwrap_or(base_stats);

    let (status, about_id) = match &existing {
        None => {
            let about_id = generate_about_id();
            sqlx::query(
                r#"
                INSERT INTO about (
                    id, name, title, bio, email, phone, location,
                    profile_image_url, profile_image_media_id, resume_url, resume_media_id,
                    years_experience, projects_completed, certificates_earned, happy_clients
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&about_id)
            .bind(form.name.as_deref().unwrap())
            .bind(form.title.as_deref().unwrap())
            .bind(form.bio.as_deref().unwrap())
            .bind(form.email.as_deref().unwrap())
            .bind(form.phone.as_deref())
            .bind(form.location.as_deref())
            .bind(profile_image.as_ref().map(|m| m.url.as_str()))
            .bind(profile_image.as_ref().map(|m| m.media_id.as_str()))
            .bind(resume.as_ref().map(|m| m.url.as_str()))
            .bind(resume.as_ref().map(|m| m.media_id.as_str()))
            .bind(stats.years_experience)
            .bind(stats.projects_completed)
            .bind(stats.certificates_earned)
            .bind(stats.happy_clients)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            info!(admin_id = %authed.id, about_id = %about_id, "About profile created");
            (StatusCode::CREATED, about_id)
        }
        Some(row) => {
            sqlx::query(
                r#"
                UPDATE about
                SET name = COALESCE(?, name),
                    title = COALESCE(?, title),
                    bio = COALESCE(?, bio),
                    email = COALESCE(?, email),
                    phone = COALESCE(?, phone),
                    location = COALESCE(?, location),
                    profile_image_url = ?,
                    profile_image_media_id = ?,
                    resume_url = ?,
                    resume_media_id = ?,
                    years_experience = ?,
                    projects_completed = ?,
                    certificates_earned = ?,
                    happy_clients = ?,
                    updated_at = datetime('now')
                WHERE id = ?
                "#,
            )
            .bind(form.name.as_deref())
            .bind(form.title.as_deref())
            .bind(form.bio.as_deref())
            .bind(form.email.as_deref())
            .bind(form.phone.as_deref())
            .bind(form.location.as_deref())
            .bind(profile_image.as_ref().map(|m| m.url.as_str()))
            .bind(profile_image.as_ref().map(|m| m.media_id.as_str()))
            .bind(resume.as_ref().map(|m| m.url.as_str()))
            .bind(resume.as_ref().map(|m| m.media_id.as_str()))
            .bind(stats.years_experience)
            .bind(stats.projects_completed)
            .bind(stats.certificates_earned)
            .bind(stats.happy_clients)
            .bind(&row.id)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            info!(admin_id = %authed.id, about_id = %row.id, "About profile updated");
            (StatusCode::OK, row.id.clone())
        }
    };

    // Replaced or removed objects are deleted only after the row no longer
    // references them
    for stale in [stale_profile_image, stale_resume].into_iter().flatten() {
        state.media_service.delete(&stale).await;
    }

    let row = fetch_about(&state)
        .await?
        .ok_or_else(|| ApiError::InternalServer(format!("About {} vanished", about_id)))?;

    Ok((status, Json(ApiResponse::data(About::from(row)))))
}

/// DELETE /api/about/profile-image
pub async fn delete_profile_image(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
) -> Result<Json<ApiResponse<About>>, ApiError> {
    let state = state_lock.read().await.clone();

    let row = fetch_about(&state)
        .await?
        .ok_or_else(|| ApiError::NotFound("About information not found".to_string()))?;

    let media_id = row
        .profile_image_media_id
        .clone()
        .ok_or_else(|| ApiError::NotFound("No profile image to remove".to_string()))?;

    sqlx::query(
        r#"
        UPDATE about
        SET profile_image_url = NULL,
            profile_image_media_id = NULL,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&row.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    state.media_service.delete(&media_id).await;

    info!(admin_id = %authed.id, "Profile image removed");

    let row = fetch_about(&state)
        .await?
        .ok_or_else(|| ApiError::NotFound("About information not found".to_string()))?;

    Ok(Json(ApiResponse::data(About::from(row))))
}

/// DELETE /api/about/resume
pub async fn delete_resume(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
) -> Result<Json<ApiResponse<About>>, ApiError> {
    let state = state_lock.read().await.clone();

    let row = fetch_about(&state)
        .await?
        .ok_or_else(|| ApiError::NotFound("About information not found".to_string()))?;

    let media_id = row
        .resume_media_id
        .clone()
        .ok_or_else(|| ApiError::NotFound("No resume to remove".to_string()))?;

    sqlx::query(
        r#"
        UPDATE about
        SET resume_url = NULL,
            resume_media_id = NULL,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&row.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    state.media_service.delete(&media_id).await;

    info!(admin_id = %authed.id, "Resume removed");

    let row = fetch_about(&state)
        .await?
        .ok_or_else(|| ApiError::NotFound("About information not found".to_string()))?;

    Ok(Json(ApiResponse::data(About::from(row))))
}

/// Resolve one media slot to its new value plus the media id (if any) that
/// the database will stop referencing.
async fn resolve_slot(
    media_service: &MediaService,
    existing: Option<MediaObject>,
    upload: Option<&UploadedFile>,
    remove: bool,
) -> Result<(Option<MediaObject>, Option<String>), ApiError> {
    if remove {
        return Ok((None, existing.map(|m| m.media_id)));
    }
    match upload {
        Some(file) => {
            let new = media_service.upload(file).await?;
            Ok((Some(new), existing.map(|m| m.media_id)))
        }
        None => Ok((existing, None)),
    }
}

fn media_pair(url: Option<&str>, media_id: Option<&str>) -> Option<MediaObject> {
    match (url, media_id) {
        (Some(url), Some(media_id)) => Some(MediaObject {
            url: url.to_string(),
            media_id: media_id.to_string(),
        }),
        _ => None,
    }
}

async fn fetch_about(state: &AppState) -> Result<Option<AboutRow>, ApiError> {
    sqlx::query_as::<_, AboutRow>("SELECT * FROM about WHERE slot = 0")
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)
}
