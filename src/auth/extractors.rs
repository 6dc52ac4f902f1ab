//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::{Admin, Claims};
use crate::common::{ApiError, AppState};

/// Authenticated admin principal.
///
/// Validates the bearer JWT and resolves it to the single admin record.
/// Validity is fully determined by signature and expiry; there is no
/// session store, so tokens cannot be revoked before they expire.
#[derive(Debug)]
pub struct AuthedAdmin {
    pub id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let token = match token {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("Not authorized, no token".into()));
            }
        };

        // Accept "Bearer <token>" or a raw token
        let bare_token = if let Some(rest) = token.strip_prefix("Bearer ") {
            rest.to_string()
        } else {
            token
        };

        let decoded = match decode::<Claims>(
            &bare_token,
            &DecodingKey::from_secret(app_state.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "JWT token validation failed");
                return Err(ApiError::Unauthorized("Not authorized, invalid token".into()));
            }
        };

        let admin_id = decoded.claims.sub;

        let admin: Option<Admin> = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = ?")
            .bind(&admin_id)
            .fetch_optional(&app_state.db)
            .await
            .map_err(|e| {
                error!(error = %e, admin_id = %admin_id, "Database error during admin lookup");
                ApiError::DatabaseError(e)
            })?;

        match admin {
            Some(a) => {
                debug!(admin_id = %a.id, "Admin authentication successful");
                Ok(AuthedAdmin {
                    id: a.id,
                    email: a.email,
                })
            }
            None => {
                warn!(admin_id = %admin_id, "Authentication failed: admin not found");
                Err(ApiError::Unauthorized("Not authorized, admin not found".into()))
            }
        }
    }
}
