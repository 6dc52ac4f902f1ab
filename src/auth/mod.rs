// Auth module - single-admin authentication

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;

#[cfg(test)]
mod tests;

pub use extractors::AuthedAdmin;
pub use routes::auth_routes;
