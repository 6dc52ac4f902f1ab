//! Social link data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::{ApiError, FormPayload};

/// Platforms with first-class rendering on the public site; everything else
/// goes under `other`.
pub const PLATFORMS: &[&str] = &[
    "github",
    "linkedin",
    "twitter",
    "instagram",
    "facebook",
    "youtube",
    "dribbble",
    "behance",
    "medium",
    "stackoverflow",
    "other",
];

#[derive(FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Social {
    pub id: String,
    pub platform: String,
    pub url: String,
    pub username: Option<String>,
    pub visible: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SocialListQuery {
    pub visible: Option<bool>,
}

#[derive(Debug, Default)]
pub struct SocialForm {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub visible: Option<bool>,
}

impl SocialForm {
    pub const FILE_SLOTS: &'static [&'static str] = &[];

    pub fn from_payload(payload: FormPayload) -> Result<Self, ApiError> {
        Ok(SocialForm {
            platform: payload.text("platform").map(str::to_string),
            url: payload.text("url").map(str::to_string),
            username: payload.text("username").map(str::to_string),
            visible: payload.opt_flag("visible"),
        })
    }
}
