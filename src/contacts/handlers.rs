// src/contacts/handlers.rs

use axum::{
    extract::{Extension, Path, Request},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{Contact, ContactForm, ContactStats};
use super::validators::CreateContactValidator;
use crate::auth::AuthedAdmin;
use crate::common::{generate_contact_id, ApiError, ApiResponse, AppState, FormPayload, Validator};

/// POST /api/contacts - The one unauthenticated write in the API: visitors
/// submit messages through the public contact form.
pub async fn create_contact(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<Contact>>), ApiError> {
    let state = state_lock.read().await.clone();

    let payload = FormPayload::from_request(request, ContactForm::FILE_SLOTS).await?;
    let form = ContactForm::from_payload(payload)?;

    let validation = CreateContactValidator.validate(&form);
    if !validation.is_valid {
        warn!(errors = ?validation.errors, "Contact submission validation failed");
        return Err(ApiError::from(validation));
    }

    let contact_id = generate_contact_id();

    sqlx::query(
        r#"
        INSERT INTO contacts (id, name, email, phone, subject, message)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&contact_id)
    .bind(form.name.as_deref().unwrap())
    .bind(form.email.as_deref().unwrap())
    .bind(form.phone.as_deref())
    .bind(form.subject.as_deref())
    .bind(form.message.as_deref().unwrap())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let contact = fetch_contact(&state, &contact_id).await?;

    info!(contact_id = %contact_id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data_with_message(
            contact,
            "Message sent successfully",
        )),
    ))
}

/// GET /api/contacts - Newest first.
pub async fn get_contacts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedAdmin,
) -> Result<Json<ApiResponse<Vec<Contact>>>, ApiError> {
    let state = state_lock.read().await.clone();

    // rowid breaks ties between messages arriving within the same second
    let contacts: Vec<Contact> =
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts ORDER BY created_at DESC, rowid DESC")
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::list(contacts)))
}

/// GET /api/contacts/stats
pub async fn get_contact_stats(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedAdmin,
) -> Result<Json<ApiResponse<ContactStats>>, ApiError> {
    let state = state_lock.read().await.clone();

    let stats = sqlx::query_as::<_, ContactStats>(
        r#"
        SELECT COUNT(*) AS total,
               COALESCE(SUM(is_read = 0), 0) AS unread,
               COALESCE(SUM(is_read = 1), 0) AS read,
               COALESCE(SUM(replied = 1), 0) AS replied
        FROM contacts
        "#,
    )
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::data(stats)))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, ApiError> {
    let state = state_lock.read().await.clone();
    let contact = fetch_contact(&state, &id).await?;
    Ok(Json(ApiResponse::data(contact)))
}

/// PATCH /api/contacts/:id/read - Idempotent.
pub async fn mark_read(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, ApiError> {
    let state = state_lock.read().await.clone();

    fetch_contact(&state, &id).await?;

    sqlx::query("UPDATE contacts SET is_read = 1, updated_at = datetime('now') WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let contact = fetch_contact(&state, &id).await?;

    info!(admin_id = %authed.id, contact_id = %id, "Contact marked read");

    Ok(Json(ApiResponse::data(contact)))
}

/// PATCH /api/contacts/:id/replied - Idempotent; a replied message is by
/// definition also read.
pub async fn mark_replied(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Contact>>, ApiError> {
    let state = state_lock.read().await.clone();

    fetch_contact(&state, &id).await?;

    sqlx::query(
        "UPDATE contacts SET replied = 1, is_read = 1, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let contact = fetch_contact(&state, &id).await?;

    info!(admin_id = %authed.id, contact_id = %id, "Contact marked replied");

    Ok(Json(ApiResponse::data(contact)))
}

/// DELETE /api/contacts/:id
pub async fn delete_contact(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let state = state_lock.read().await.clone();

    fetch_contact(&state, &id).await?;

    sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(admin_id = %authed.id, contact_id = %id, "Contact deleted");

    Ok(Json(ApiResponse::message("Contact deleted successfully")))
}

async fn fetch_contact(state: &AppState, id: &str) -> Result<Contact, ApiError> {
    sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))
}
