//! Authentication handlers: single-admin registration, login, profile

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::AuthedAdmin;
use super::models::{Admin, AuthData, Claims, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::common::{generate_admin_id, ApiError, ApiResponse, AppState, ValidationResult};

/// Token lifetime: 30 days
const TOKEN_TTL_DAYS: i64 = 30;

/// Login failures use one message for unknown email and wrong password so
/// responses do not leak whether the account exists.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Issue an HS256 JWT for the given admin id
pub fn issue_token(admin_id: &str, secret: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: admin_id.to_string(),
        exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "Failed to issue token");
        ApiError::InternalServer("Failed to issue token".to_string())
    })
}

fn is_unique_violation(e: &sqlx::Error, column: &str) -> bool {
    if let sqlx::Error::Database(db) = e {
        db.message().contains("UNIQUE") && db.message().contains(column)
    } else {
        false
    }
}

/// POST /api/auth/register - First-time admin setup; exactly one admin may
/// ever exist, enforced by the schema-level singleton slot.
pub async fn register(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), ApiError> {
    let state = state_lock.read().await.clone();

    let mut validation = ValidationResult::new();
    if request.name.as_deref().map(str::trim).unwrap_or("").is_empty() {
        validation.add_error("name", "Name is required");
    }
    if request.email.as_deref().map(str::trim).unwrap_or("").is_empty() {
        validation.add_error("email", "Email is required");
    }
    if request.password.as_deref().unwrap_or("").is_empty() {
        validation.add_error("password", "Password is required");
    }
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let name = request.name.unwrap().trim().to_string();
    let email = request.email.unwrap().trim().to_lowercase();
    let password = request.password.unwrap();

    let admin_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;
    if admin_count.0 > 0 {
        warn!("Registration rejected: admin already exists");
        return Err(ApiError::Forbidden(
            "Admin already registered. Only one admin allowed.".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::InternalServer(format!("Password hashing failed: {}", e)))?;

    let admin_id = generate_admin_id();

    // The slot column closes the race between the count check and insert:
    // a concurrent second registration fails the unique constraint.
    let insert = sqlx::query(
        r#"
        INSERT INTO admins (id, slot, name, email, password_hash)
        VALUES (?, 0, ?, ?, ?)
        "#,
    )
    .bind(&admin_id)
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .execute(&state.db)
    .await;

    if let Err(e) = insert {
        if is_unique_violation(&e, "email") {
            return Err(ApiError::Conflict("Admin email already in use".to_string()));
        }
        if is_unique_violation(&e, "slot") {
            return Err(ApiError::Forbidden(
                "Admin already registered. Only one admin allowed.".to_string(),
            ));
        }
        return Err(ApiError::DatabaseError(e));
    }

    let token = issue_token(&admin_id, &state.jwt_secret)?;

    info!(admin_id = %admin_id, "Admin registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(AuthData {
            id: admin_id,
            name,
            email,
            token,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let state = state_lock.read().await.clone();

    let email = match request.email.as_deref().map(str::trim) {
        Some(e) if !e.is_empty() => e.to_lowercase(),
        _ => {
            return Err(ApiError::ValidationError(
                "Please provide email and password".to_string(),
            ))
        }
    };
    let password = match request.password.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => {
            return Err(ApiError::ValidationError(
                "Please provide email and password".to_string(),
            ))
        }
    };

    let admin: Option<Admin> = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let admin = match admin {
        Some(a) => a,
        None => {
            warn!("Login failed: unknown email");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let matches = bcrypt::verify(password, &admin.password_hash)
        .map_err(|e| ApiError::InternalServer(format!("Password verification failed: {}", e)))?;
    if !matches {
        warn!(admin_id = %admin.id, "Login failed: password mismatch");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_token(&admin.id, &state.jwt_secret)?;

    info!(admin_id = %admin.id, "Admin logged in");

    Ok(Json(ApiResponse::data(AuthData {
        id: admin.id,
        name: admin.name,
        email: admin.email,
        token,
    })))
}

/// GET /api/auth/me
pub async fn me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
) -> Result<Json<ApiResponse<Admin>>, ApiError> {
    let state = state_lock.read().await.clone();

    let admin: Admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(ApiResponse::data(admin)))
}

/// PUT /api/auth/profile - Partial update of name/email/password. A new
/// token is issued so the client never holds a stale credential.
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedAdmin,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let state = state_lock.read().await.clone();

    let password_hash = match request.password.as_deref() {
        Some(p) if !p.is_empty() => Some(
            bcrypt::hash(p, bcrypt::DEFAULT_COST)
                .map_err(|e| ApiError::InternalServer(format!("Password hashing failed: {}", e)))?,
        ),
        _ => None,
    };

    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase);
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let result = sqlx::query(
        r#"
        UPDATE admins
        SET name = COALESCE(?, name),
            email = COALESCE(?, email),
            password_hash = COALESCE(?, password_hash),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(name.as_deref())
    .bind(email.as_deref())
    .bind(password_hash.as_deref())
    .bind(&authed.id)
    .execute(&state.db)
    .await;

    if let Err(e) = result {
        if is_unique_violation(&e, "email") {
            return Err(ApiError::Conflict("Admin email already in use".to_string()));
        }
        return Err(ApiError::DatabaseError(e));
    }

    let admin: Admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let token = issue_token(&admin.id, &state.jwt_secret)?;

    info!(admin_id = %admin.id, "Admin profile updated");

    Ok(Json(ApiResponse::data(AuthData {
        id: admin.id,
        name: admin.name,
        email: admin.email,
        token,
    })))
}
