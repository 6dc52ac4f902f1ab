// src/about/routes.rs

use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers;

pub fn about_routes() -> Router {
    Router::new()
        .route(
            "/api/about",
            get(handlers::get_about).post(handlers::save_about),
        )
        .route(
            "/api/about/profile-image",
            delete(handlers::delete_profile_image),
        )
        .route("/api/about/resume", delete(handlers::delete_resume))
}
