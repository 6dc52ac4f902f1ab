// src/about/validators.rs

use super::models::AboutForm;
use crate::common::{ValidationResult, Validator};

/// Applied when no profile exists yet: the first save must carry the
/// complete identity block.
pub struct CreateAboutValidator;

impl Validator<AboutForm> for CreateAboutValidator {
    fn validate(&self, form: &AboutForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if form.name.is_none() {
            result.add_error("name", "Name is required");
        }
        if form.title.is_none() {
            result.add_error("title", "Title is required");
        }
        if form.bio.is_none() {
            result.add_error("bio", "Bio is required");
        }
        if form.email.is_none() {
            result.add_error("email", "Email is required");
        }

        result.merge(validate_common(form));
        result
    }
}

pub struct UpdateAboutValidator;

impl Validator<AboutForm> for UpdateAboutValidator {
    fn validate(&self, form: &AboutForm) -> ValidationResult {
        validate_common(form)
    }
}

fn validate_common(form: &AboutForm) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(email) = &form.email {
        if !email.contains('@') || !email.contains('.') {
            result.add_error("email", "Email must be a valid email address");
        }
    }
    if let Some(stats) = &form.stats {
        let counters = [
            ("yearsExperience", stats.years_experience),
            ("projectsCompleted", stats.projects_completed),
            ("certificatesEarned", stats.certificates_earned),
            ("happyClients", stats.happy_clients),
        ];
        for (field, value) in counters {
            if matches!(value, Some(v) if v < 0) {
                result.add_error(field, "Stats counters must be non-negative");
            }
        }
    }

    result
}
