//! About (site owner profile) data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::{ApiError, FormPayload, UploadedFile};
use crate::services::MediaObject;

#[derive(FromRow, Debug, Clone)]
pub struct AboutRow {
    pub id: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub profile_image_url: Option<String>,
    pub profile_image_media_id: Option<String>,
    pub resume_url: Option<String>,
    pub resume_media_id: Option<String>,
    pub years_experience: i64,
    pub projects_completed: i64,
    pub certificates_earned: i64,
    pub happy_clients: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Homepage counters. Defaults match the values the public site ships with
/// before the owner fills in real numbers.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AboutStats {
    pub years_experience: i64,
    pub projects_completed: i64,
    pub certificates_earned: i64,
    pub happy_clients: i64,
}

impl Default for AboutStats {
    fn default() -> Self {
        AboutStats {
            years_experience: 2,
            projects_completed: 10,
            certificates_earned: 5,
            happy_clients: 10,
        }
    }
}

/// Partial stats payload sent as a JSON-encoded `stats` form field.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsPatch {
    pub years_experience: Option<i64>,
    pub projects_completed: Option<i64>,
    pub certificates_earned: Option<i64>,
    pub happy_clients: Option<i64>,
}

impl StatsPatch {
    pub fn apply_to(&self, base: AboutStats) -> AboutStats {
        AboutStats {
            years_experience: self.years_experience.unwrap_or(base.years_experience),
            projects_completed: self.projects_completed.unwrap_or(base.projects_completed),
            certificates_earned: self.certificates_earned.unwrap_or(base.certificates_earned),
            happy_clients: self.happy_clients.unwrap_or(base.happy_clients),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub id: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<MediaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<MediaObject>,
    pub stats: AboutStats,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AboutRow> for About {
    fn from(row: AboutRow) -> Self {
        let profile_image = match (row.profile_image_url, row.profile_image_media_id) {
            (Some(url), Some(media_id)) => Some(MediaObject { url, media_id }),
            _ => None,
        };
        let resume = match (row.resume_url, row.resume_media_id) {
            (Some(url), Some(media_id)) => Some(MediaObject { url, media_id }),
            _ => None,
        };
        About {
            id: row.id,
            name: row.name,
            title: row.title,
            bio: row.bio,
            email: row.email,
            phone: row.phone,
            location: row.location,
            profile_image,
            resume,
            stats: AboutStats {
                years_experience: row.years_experience,
                projects_completed: row.projects_completed,
                certificates_earned: row.certificates_earned,
                happy_clients: row.happy_clients,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Default)]
pub struct AboutForm {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub stats: Option<StatsPatch>,
    pub profile_image: Option<UploadedFile>,
    pub resume: Option<UploadedFile>,
    pub remove_profile_image: bool,
    pub remove_resume: bool,
}

impl AboutForm {
    pub const FILE_SLOTS: &'static [&'static str] = &["profileImage", "resume"];

    pub fn from_payload(payload: FormPayload) -> Result<Self, ApiError> {
        Ok(AboutForm {
            name: payload.text("name").map(str::to_string),
            title: payload.text("title").map(str::to_string),
            bio: payload.text("bio").map(str::to_string),
            email: payload.text("email").map(str::to_string),
            phone: payload.text("phone").map(str::to_string),
            location: payload.text("location").map(str::to_string),
            stats: payload.json_object("stats")?,
            profile_image: payload.file("profileImage").cloned(),
            resume: payload.file("resume").cloned(),
            remove_profile_image: payload.flag("removeProfileImage"),
            remove_resume: payload.flag("removeResume"),
        })
    }
}
