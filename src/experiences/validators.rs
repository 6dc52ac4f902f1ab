// src/experiences/validators.rs

use super::models::ExperienceForm;
use crate::common::{ValidationResult, Validator};

pub struct CreateExperienceValidator;

impl Validator<ExperienceForm> for CreateExperienceValidator {
    fn validate(&self, form: &ExperienceForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if form.title.is_none() {
            result.add_error("title", "Title is required");
        }
        if form.company.is_none() {
            result.add_error("company", "Company is required");
        }
        if form.start_date.is_none() {
            result.add_error("startDate", "Start date is required");
        }

        result.merge(validate_common(form));
        result
    }
}

pub struct UpdateExperienceValidator;

impl Validator<ExperienceForm> for UpdateExperienceValidator {
    fn validate(&self, form: &ExperienceForm) -> ValidationResult {
        validate_common(form)
    }
}

fn validate_common(form: &ExperienceForm) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(title) = &form.title {
        if title.len() > 200 {
            result.add_error("title", "Title must be at most 200 characters");
        }
    }
    if let Some(company) = &form.company {
        if company.len() > 200 {
            result.add_error("company", "Company must be at most 200 characters");
        }
    }

    result
}
