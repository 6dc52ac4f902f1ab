//! Contact message data models

use serde::Serialize;
use sqlx::FromRow;

use crate::common::{ApiError, FormPayload};

#[derive(FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub replied: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Inbox counters shown on the admin dashboard.
#[derive(FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct ContactStats {
    pub total: i64,
    pub unread: i64,
    pub read: i64,
    pub replied: i64,
}

#[derive(Debug, Default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    pub const FILE_SLOTS: &'static [&'static str] = &[];

    pub fn from_payload(payload: FormPayload) -> Result<Self, ApiError> {
        Ok(ContactForm {
            name: payload.text("name").map(str::to_string),
            email: payload.text("email").map(str::to_string),
            phone: payload.text("phone").map(str::to_string),
            subject: payload.text("subject").map(str::to_string),
            message: payload.text("message").map(str::to_string),
        })
    }
}
