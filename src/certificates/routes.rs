// src/certificates/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn certificates_routes() -> Router {
    Router::new()
        .route(
            "/api/certificates",
            get(handlers::get_certificates).post(handlers::create_certificate),
        )
        .route(
            "/api/certificates/:id",
            get(handlers::get_certificate)
                .put(handlers::update_certificate)
                .delete(handlers::delete_certificate),
        )
}
