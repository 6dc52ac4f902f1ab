// src/socials/validators.rs

use super::models::{SocialForm, PLATFORMS};
use crate::common::{ValidationResult, Validator};

pub struct CreateSocialValidator;

impl Validator<SocialForm> for CreateSocialValidator {
    fn validate(&self, form: &SocialForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if form.platform.is_none() {
            result.add_error("platform", "Platform is required");
        }
        if form.url.is_none() {
            result.add_error("url", "URL is required");
        }

        result.merge(validate_common(form));
        result
    }
}

pub struct UpdateSocialValidator;

impl Validator<SocialForm> for UpdateSocialValidator {
    fn validate(&self, form: &SocialForm) -> ValidationResult {
        validate_common(form)
    }
}

fn validate_common(form: &SocialForm) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(platform) = &form.platform {
        if !PLATFORMS.contains(&platform.as_str()) {
            result.add_error(
                "platform",
                &format!("Platform must be one of: {}", PLATFORMS.join(", ")),
            );
        }
    }
    if let Some(url) = &form.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            result.add_error("url", "URL must start with http:// or https://");
        }
    }

    result
}
