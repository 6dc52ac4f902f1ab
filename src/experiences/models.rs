//! Experience data models

use serde::Serialize;
use sqlx::FromRow;

use crate::common::{ApiError, FormPayload, UploadedFile};
use crate::services::MediaObject;

#[derive(FromRow, Debug, Clone)]
pub struct ExperienceRow {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
    pub responsibilities: String,
    pub technologies: String,
    pub company_logo_url: Option<String>,
    pub company_logo_media_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Wire representation. `end_date` is absent while `current` is true.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
    pub responsibilities: Vec<String>,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<MediaObject>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ExperienceRow> for Experience {
    fn from(row: ExperienceRow) -> Self {
        let company_logo = match (row.company_logo_url, row.company_logo_media_id) {
            (Some(url), Some(media_id)) => Some(MediaObject { url, media_id }),
            _ => None,
        };
        Experience {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            start_date: row.start_date,
            end_date: row.end_date,
            current: row.current,
            description: row.description,
            responsibilities: serde_json::from_str(&row.responsibilities).unwrap_or_default(),
            technologies: serde_json::from_str(&row.technologies).unwrap_or_default(),
            company_logo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Default)]
pub struct ExperienceForm {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    pub company_logo: Option<UploadedFile>,
}

impl ExperienceForm {
    pub const FILE_SLOTS: &'static [&'static str] = &["companyLogo"];

    pub fn from_payload(payload: FormPayload) -> Result<Self, ApiError> {
        Ok(ExperienceForm {
            title: payload.text("title").map(str::to_string),
            company: payload.text("company").map(str::to_string),
            location: payload.text("location").map(str::to_string),
            start_date: payload.text("startDate").map(str::to_string),
            end_date: payload.text("endDate").map(str::to_string),
            current: payload.opt_flag("current"),
            description: payload.text("description").map(str::to_string),
            responsibilities: payload.json_string_list("responsibilities")?,
            technologies: payload.json_string_list("technologies")?,
            company_logo: payload.file("companyLogo").cloned(),
        })
    }
}
