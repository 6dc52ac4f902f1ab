//! Skill data models

use serde::Serialize;
use sqlx::FromRow;

use crate::common::{ApiError, FormPayload, UploadedFile};
use crate::services::MediaObject;

pub const CATEGORIES: &[&str] = &[
    "frontend",
    "backend",
    "database",
    "tools",
    "languages",
    "other",
];

#[derive(FromRow, Debug, Clone)]
pub struct SkillRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    pub icon_name: Option<String>,
    pub icon_url: Option<String>,
    pub icon_media_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Wire representation. A skill renders either `icon_name` (built-in icon
/// set reference) or an uploaded `icon`, never both.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: String,
    pub proficiency: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<MediaObject>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SkillRow> for Skill {
    fn from(row: SkillRow) -> Self {
        let icon = match (row.icon_url, row.icon_media_id) {
            (Some(url), Some(media_id)) => Some(MediaObject { url, media_id }),
            _ => None,
        };
        Skill {
            id: row.id,
            name: row.name,
            category: row.category,
            proficiency: row.proficiency,
            icon_name: row.icon_name,
            icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Skills grouped by category for the public grouped listing
#[derive(Serialize, Debug)]
pub struct SkillGroup {
    pub category: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Default)]
pub struct SkillForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub proficiency: Option<i64>,
    pub icon_name: Option<String>,
    pub icon: Option<UploadedFile>,
}

impl SkillForm {
    pub const FILE_SLOTS: &'static [&'static str] = &["image"];

    pub fn from_payload(payload: FormPayload) -> Result<Self, ApiError> {
        Ok(SkillForm {
            name: payload.text("name").map(str::to_string),
            category: payload.text("category").map(str::to_string),
            proficiency: payload.int("proficiency")?,
            icon_name: payload.text("iconName").map(str::to_string),
            icon: payload.file("image").cloned(),
        })
    }
}
