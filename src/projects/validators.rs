//! Validation for project create/update forms

use super::models::{ProjectForm, CATEGORIES};
use crate::common::{ValidationResult, Validator};

pub struct CreateProjectValidator;

impl Validator<ProjectForm> for CreateProjectValidator {
    fn validate(&self, form: &ProjectForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if form.title.is_none() {
            result.add_error("title", "Title is required");
        }
        if form.description.is_none() {
            result.add_error("description", "Description is required");
        }
        if form.image.is_none() {
            result.add_error("image", "Project image is required");
        }
        result.merge(validate_common(form));

        result
    }
}

pub struct UpdateProjectValidator;

impl Validator<ProjectForm> for UpdateProjectValidator {
    fn validate(&self, form: &ProjectForm) -> ValidationResult {
        validate_common(form)
    }
}

fn validate_common(form: &ProjectForm) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(category) = form.category.as_deref() {
        if !CATEGORIES.contains(&category) {
            result.add_error(
                "category",
                &format!("Category must be one of: {}", CATEGORIES.join(", ")),
            );
        }
    }

    result
}
