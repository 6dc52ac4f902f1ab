// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::MediaService;

/// Application state containing the database pool, media service, and
/// configuration. Constructed once in `main` and injected through an
/// `Extension` layer — no global or lazily-cached handles.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub media_service: Arc<MediaService>,
}
