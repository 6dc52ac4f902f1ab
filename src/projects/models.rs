//! Project data models

use serde::Serialize;
use sqlx::FromRow;

use crate::common::{ApiError, FormPayload, UploadedFile};
use crate::services::MediaObject;

pub const CATEGORIES: &[&str] = &["web", "mobile", "fullstack", "other"];

/// Database row; list columns hold JSON-encoded text
#[derive(FromRow, Debug, Clone)]
pub struct ProjectRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category: String,
    pub technologies: String,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub image_url: String,
    pub image_media_id: String,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Wire representation
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category: String,
    pub technologies: Vec<String>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub image: MediaObject,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            description: row.description,
            short_description: row.short_description,
            category: row.category,
            technologies: serde_json::from_str(&row.technologies).unwrap_or_default(),
            github_link: row.github_link,
            live_link: row.live_link,
            image: MediaObject {
                url: row.image_url,
                media_id: row.image_media_id,
            },
            featured: row.featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Typed form fields for create/update, parsed in one step
#[derive(Debug, Default)]
pub struct ProjectForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub github_link: Option<String>,
    pub live_link: Option<String>,
    pub featured: Option<bool>,
    pub image: Option<UploadedFile>,
}

impl ProjectForm {
    pub const FILE_SLOTS: &'static [&'static str] = &["image"];

    pub fn from_payload(payload: FormPayload) -> Result<Self, ApiError> {
        Ok(ProjectForm {
            title: payload.text("title").map(str::to_string),
            description: payload.text("description").map(str::to_string),
            short_description: payload.text("shortDescription").map(str::to_string),
            category: payload.text("category").map(str::to_string),
            technologies: payload.json_string_list("technologies")?,
            github_link: payload.text("githubLink").map(str::to_string),
            live_link: payload.text("liveLink").map(str::to_string),
            featured: payload.opt_flag("featured"),
            image: payload.file("image").cloned(),
        })
    }
}
