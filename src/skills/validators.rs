//! Validation for skill create/update forms

use super::models::{SkillForm, CATEGORIES};
use crate::common::{ValidationResult, Validator};

pub struct CreateSkillValidator;

impl Validator<SkillForm> for CreateSkillValidator {
    fn validate(&self, form: &SkillForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if form.name.is_none() {
            result.add_error("name", "Name is required");
        }
        if form.category.is_none() {
            result.add_error("category", "Category is required");
        }
        if form.proficiency.is_none() {
            result.add_error("proficiency", "Proficiency is required");
        }
        result.merge(validate_common(form));

        result
    }
}

pub struct UpdateSkillValidator;

impl Validator<SkillForm> for UpdateSkillValidator {
    fn validate(&self, form: &SkillForm) -> ValidationResult {
        validate_common(form)
    }
}

fn validate_common(form: &SkillForm) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(category) = form.category.as_deref() {
        if !CATEGORIES.contains(&category) {
            result.add_error(
                "category",
                &format!("Category must be one of: {}", CATEGORIES.join(", ")),
            );
        }
    }
    if let Some(proficiency) = form.proficiency {
        if !(0..=100).contains(&proficiency) {
            result.add_error("proficiency", "Proficiency must be between 0 and 100");
        }
    }

    result
}
