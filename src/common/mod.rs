// Common module - shared types and utilities across all modules

pub mod error;
pub mod id_generator;
pub mod migrations;
pub mod multipart;
pub mod response;
pub mod state;
#[cfg(test)]
pub mod test_support;
pub mod validation;

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use id_generator::*;
pub use multipart::{FormPayload, UploadedFile};
pub use response::ApiResponse;
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
