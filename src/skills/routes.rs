// src/skills/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn skills_routes() -> Router {
    Router::new()
        .route(
            "/api/skills",
            get(handlers::get_skills).post(handlers::create_skill),
        )
        .route("/api/skills/grouped", get(handlers::get_skills_grouped))
        .route(
            "/api/skills/:id",
            get(handlers::get_skill)
                .put(handlers::update_skill)
                .delete(handlers::delete_skill),
        )
}
