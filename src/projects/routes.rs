// src/projects/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn projects_routes() -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::get_projects).post(handlers::create_project),
        )
        .route(
            "/api/projects/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
}
