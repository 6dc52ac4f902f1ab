// src/experiences/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn experiences_routes() -> Router {
    Router::new()
        .route(
            "/api/experiences",
            get(handlers::get_experiences).post(handlers::create_experience),
        )
        .route(
            "/api/experiences/:id",
            get(handlers::get_experience)
                .put(handlers::update_experience)
                .delete(handlers::delete_experience),
        )
}
