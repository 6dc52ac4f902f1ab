// src/certificates/handlers.rs

use axum::{
    extract::{Extension, Path, Request},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{Certificate, CertificateForm, CertificateRow};
use super::validators::{CreateCertificateValidator, UpdateCertificateValidator};
use crate::auth::AuthedAdmin;
use crate::common::{
    generate_certificate_id, ApiError, ApiResponse, AppState, FormPayload, Validator,
};

/// GET /api/certificates
pub async fn get_certificates(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<ApiResponse<Vec<Certificate>>>, ApiError> {
    let state = state_lock.read().await.clone();

    let rows: Vec<CertificateRow> =
        sqlx::query_as::<_, CertificateRow>("SELECT * FROM certificates ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::list(
        rows.into_iter().map(Certificate::from).collect(),
    )))
}

/// GET /api/certificates/:id
pub async fn get_certificate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Certificate>>, ApiError> {
    let state = state_lock.read().await.clone();
    let row = fetch_certificate(&state, &id).await?;
    Ok(Json(ApiResponse::data(Certificate::from(row))))
}

/// POST /api/certificates - The certificate image is mandatory.
pub async fn create_certificate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<Certificate>>), ApiError> {
    let state = state_lock.read().await.clone();

    let payload = FormPayload::from_request(request, CertificateForm::FILE_SLOTS).await?;
    let form = CertificateForm::from_payload(payload)?;

    let validation = CreateCertificateValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, errors = ?validation.errors, "Certificate creation validation failed");
        return Err(ApiError::from(validation));
    }

    let image = state
        .media_service
        .upload(form.image.as_ref().unwrap())
        .await?;

    let certificate_id = generate_certificate_id();

    let insert = sqlx::query(
        r#"
        INSERT INTO certificates (
            id, title, issuer, issue_date, expiry_date,
            credential_id, credential_url, description, image_url, image_media_id
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&certificate_id)
    .bind(form.title.as_deref().unwrap())
    .bind(form.issuer.as_deref().unwrap())
    .bind(form.issue_date.as_deref())
    .bind(form.expiry_date.as_deref())
    .bind(form.credential_id.as_deref())
    .bind(form.credential_url.as_deref())
    .bind(form.description.as_deref())
    .bind(&image.url)
    .bind(&image.media_id)
    .execute(&state.db)
    .await;

    if let Err(e) = insert {
        warn!(media_id = %image.media_id, "Certificate insert failed, uploaded image is orphaned");
        return Err(ApiError::DatabaseError(e));
    }

    let row = fetch_certificate(&state, &certificate_id).await?;

    info!(admin_id = %authed.id, certificate_id = %certificate_id, "Certificate created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(Certificate::from(row))),
    ))
}

/// PUT /api/certificates/:id - Partial update; a new image replaces and
/// deletes the stored one.
pub async fn update_certificate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<ApiResponse<Certificate>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_certificate(&state, &id).await?;

    let payload = FormPayload::from_request(request, CertificateForm::FILE_SLOTS).await?;
    let form = CertificateForm::from_payload(payload)?;

    let validation = UpdateCertificateValidator.validate(&form);
    if !validation.is_valid {
        warn!(admin_id = %authed.id, certificate_id = %id, errors = ?validation.errors, "Certificate update validation failed");
        return Err(ApiError::from(validation));
    }

    let new_image = match &form.image {
        Some(file) => Some(state.media_service.upload(file).await?),
        None => None,
    };

    sqlx::query(
        r#"
        UPDATE certificates
        SET title = COALESCE(?, title),
            issuer = COALESCE(?, issuer),
            issue_date = COALESCE(?, issue_date),
            expiry_date = COALESCE(?, expiry_date),
            credential_id = COALESCE(?, credential_id),
            credential_url = COALESCE(?, credential_url),
            description = COALESCE(?, description),
            image_url = COALESCE(?, image_url),
            image_media_id = COALESCE(?, image_media_id),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(form.title.as_deref())
    .bind(form.issuer.as_deref())
    .bind(form.issue_date.as_deref())
    .bind(form.expiry_date.as_deref())
    .bind(form.credential_id.as_deref())
    .bind(form.credential_url.as_deref())
    .bind(form.description.as_deref())
    .bind(new_image.as_ref().map(|m| m.url.as_str()))
    .bind(new_image.as_ref().map(|m| m.media_id.as_str()))
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if new_image.is_some() {
        state.media_service.delete(&existing.image_media_id).await;
    }

    let row = fetch_certificate(&state, &id).await?;

    info!(admin_id = %authed.id, certificate_id = %id, "Certificate updated");

    Ok(Json(ApiResponse::data(Certificate::from(row))))
}

/// DELETE /api/certificates/:id
pub async fn delete_certificate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let state = state_lock.read().await.clone();

    let existing = fetch_certificate(&state, &id).await?;

    sqlx::query("DELETE FROM certificates WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    state.media_service.delete(&existing.image_media_id).await;

    info!(admin_id = %authed.id, certificate_id = %id, "Certificate deleted");

    Ok(Json(ApiResponse::message("Certificate deleted successfully")))
}

async fn fetch_certificate(state: &AppState, id: &str) -> Result<CertificateRow, ApiError> {
    sqlx::query_as::<_, CertificateRow>("SELECT * FROM certificates WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Certificate not found".to_string()))
}
