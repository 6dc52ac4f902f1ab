// src/contacts/routes.rs

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

pub fn contacts_routes() -> Router {
    Router::new()
        .route(
            "/api/contacts",
            get(handlers::get_contacts).post(handlers::create_contact),
        )
        .route("/api/contacts/stats", get(handlers::get_contact_stats))
        .route(
            "/api/contacts/:id",
            get(handlers::get_contact).delete(handlers::delete_contact),
        )
        .route("/api/contacts/:id/read", patch(handlers::mark_read))
        .route("/api/contacts/:id/replied", patch(handlers::mark_replied))
}
