// src/contacts/validators.rs

use super::models::ContactForm;
use crate::common::{ValidationResult, Validator};

pub struct CreateContactValidator;

impl Validator<ContactForm> for CreateContactValidator {
    fn validate(&self, form: &ContactForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if form.name.is_none() {
            result.add_error("name", "Name is required");
        }
        match &form.email {
            None => result.add_error("email", "Email is required"),
            Some(email) if !email.contains('@') || !email.contains('.') => {
                result.add_error("email", "Email must be a valid email address");
            }
            _ => {}
        }
        match &form.message {
            None => result.add_error("message", "Message is required"),
            Some(message) if message.len() > 5000 => {
                result.add_error("message", "Message must be at most 5000 characters");
            }
            _ => {}
        }

        result
    }
}
