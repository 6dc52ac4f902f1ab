//! Certificate data models

use serde::Serialize;
use sqlx::FromRow;

use crate::common::{ApiError, FormPayload, UploadedFile};
use crate::services::MediaObject;

#[derive(FromRow, Debug, Clone)]
pub struct CertificateRow {
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub description: Option<String>,
    pub image_url: String,
    pub image_media_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub description: Option<String>,
    pub image: MediaObject,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CertificateRow> for Certificate {
    fn from(row: CertificateRow) -> Self {
        Certificate {
            id: row.id,
            title: row.title,
            issuer: row.issuer,
            issue_date: row.issue_date,
            expiry_date: row.expiry_date,
            credential_id: row.credential_id,
            credential_url: row.credential_url,
            description: row.description,
            image: MediaObject {
                url: row.image_url,
                media_id: row.image_media_id,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Default)]
pub struct CertificateForm {
    pub title: Option<String>,
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub description: Option<String>,
    pub image: Option<UploadedFile>,
}

impl CertificateForm {
    pub const FILE_SLOTS: &'static [&'static str] = &["image"];

    pub fn from_payload(payload: FormPayload) -> Result<Self, ApiError> {
        Ok(CertificateForm {
            title: payload.text("title").map(str::to_string),
            issuer: payload.text("issuer").map(str::to_string),
            issue_date: payload.text("issueDate").map(str::to_string),
            expiry_date: payload.text("expiryDate").map(str::to_string),
            credential_id: payload.text("credentialId").map(str::to_string),
            credential_url: payload.text("credentialUrl").map(str::to_string),
            description: payload.text("description").map(str::to_string),
            image: payload.file("image").cloned(),
        })
    }
}
