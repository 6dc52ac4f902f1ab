// src/socials/routes.rs

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

pub fn socials_routes() -> Router {
    Router::new()
        .route(
            "/api/socials",
            get(handlers::get_socials).post(handlers::create_social),
        )
        .route(
            "/api/socials/:id",
            get(handlers::get_social)
                .put(handlers::update_social)
                .delete(handlers::delete_social),
        )
        .route(
            "/api/socials/:id/toggle-visibility",
            patch(handlers::toggle_visibility),
        )
}
