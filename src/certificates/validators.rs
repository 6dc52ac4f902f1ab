// src/certificates/validators.rs

use super::models::CertificateForm;
use crate::common::{ValidationResult, Validator};

pub struct CreateCertificateValidator;

impl Validator<CertificateForm> for CreateCertificateValidator {
    fn validate(&self, form: &CertificateForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if form.title.is_none() {
            result.add_error("title", "Title is required");
        }
        if form.issuer.is_none() {
            result.add_error("issuer", "Issuer is required");
        }
        if form.image.is_none() {
            result.add_error("image", "Certificate image is required");
        }

        result.merge(validate_common(form));
        result
    }
}

pub struct UpdateCertificateValidator;

impl Validator<CertificateForm> for UpdateCertificateValidator {
    fn validate(&self, form: &CertificateForm) -> ValidationResult {
        validate_common(form)
    }
}

fn validate_common(form: &CertificateForm) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(url) = &form.credential_url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            result.add_error("credentialUrl", "Credential URL must start with http:// or https://");
        }
    }

    result
}
