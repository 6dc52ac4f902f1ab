// src/common/multipart.rs
//! Single-pass multipart form intake.
//!
//! Reads every part of a multipart request once, splitting it into text
//! fields and file slots, so handlers work against a typed payload instead
//! of re-parsing the stream. Nested JSON-encoded fields (stats, string
//! lists) are decoded here and rejected up front when malformed.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use bytes::Bytes;
use std::collections::HashMap;

use super::error::ApiError;

/// A file received in a named upload slot
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub data: Bytes,
}

/// Parsed multipart payload: text fields plus named file slots
#[derive(Debug, Default)]
pub struct FormPayload {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormPayload {
    /// Accept either encoding a client may send: multipart form data when a
    /// file is attached, a JSON object body otherwise. Both funnel into the
    /// same typed payload so every endpoint has a single parsing step.
    pub async fn from_request(req: Request, file_slots: &[&str]) -> Result<Self, ApiError> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, &()).await.map_err(|e| {
                ApiError::ValidationError(format!("Malformed multipart request: {}", e))
            })?;
            Self::read(multipart, file_slots).await
        } else {
            let Json(value): Json<serde_json::Value> = Json::from_request(req, &())
                .await
                .map_err(|_| ApiError::ValidationError("Invalid JSON body".to_string()))?;
            Self::from_json(value)
        }
    }

    /// Flatten a JSON object into form fields. Nested arrays/objects keep
    /// their JSON encoding so `json_string_list`/`json_object` read them the
    /// same way as their multipart counterparts.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ApiError> {
        let obj = match value {
            serde_json::Value::Object(o) => o,
            _ => {
                return Err(ApiError::ValidationError(
                    "Expected a JSON object body".to_string(),
                ))
            }
        };

        let mut payload = FormPayload::default();
        for (key, val) in obj {
            let text = match val {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            payload.fields.insert(key, text);
        }
        Ok(payload)
    }

    /// Drain a multipart stream. Parts whose name appears in `file_slots`
    /// are read as files; everything else is treated as a UTF-8 text field.
    pub async fn read(mut multipart: Multipart, file_slots: &[&str]) -> Result<Self, ApiError> {
        let mut payload = FormPayload::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::ValidationError(format!("Malformed multipart request: {}", e))
        })? {
            let name = match field.name() {
                Some(n) => n.to_string(),
                None => continue,
            };

            if file_slots.contains(&name.as_str()) {
                let original_name = field
                    .file_name()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| name.clone());
                let data = field.bytes().await.map_err(|_| {
                    ApiError::ValidationError(format!("Failed to read file field '{}'", name))
                })?;
                // An empty file part means the form slot was left blank
                if !data.is_empty() {
                    payload.files.insert(
                        name,
                        UploadedFile {
                            original_name,
                            data,
                        },
                    );
                }
            } else {
                let value = field.text().await.map_err(|_| {
                    ApiError::ValidationError(format!("Field '{}' is not valid UTF-8", name))
                })?;
                payload.fields.insert(name, value);
            }
        }

        Ok(payload)
    }

    /// Trimmed text field; empty strings count as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn file(&self, slot: &str) -> Option<&UploadedFile> {
        self.files.get(slot)
    }

    /// Boolean form field ("true"/"1" → true)
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.text(name), Some("true") | Some("1"))
    }

    /// Presence-aware boolean: None when the field was not sent at all
    pub fn opt_flag(&self, name: &str) -> Option<bool> {
        self.text(name).map(|v| matches!(v, "true" | "1"))
    }

    /// JSON-encoded list of strings inside a form field (e.g. technologies)
    pub fn json_string_list(&self, name: &str) -> Result<Option<Vec<String>>, ApiError> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)
                .map(Some)
                .map_err(|_| {
                    ApiError::ValidationError(format!(
                        "{}: expected a JSON array of strings",
                        name
                    ))
                }),
        }
    }

    /// JSON-encoded object inside a form field (e.g. stats)
    pub fn json_object<T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<Option<T>, ApiError> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => serde_json::from_str::<T>(raw).map(Some).map_err(|_| {
                ApiError::ValidationError(format!("Invalid {} format", name))
            }),
        }
    }

    /// Integer form field
    pub fn int(&self, name: &str) -> Result<Option<i64>, ApiError> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
                ApiError::ValidationError(format!("{}: expected an integer", name))
            }),
        }
    }

    #[cfg(test)]
    pub fn from_parts(
        fields: Vec<(&str, &str)>,
        files: Vec<(&str, UploadedFile)>,
    ) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with(fields: Vec<(&str, &str)>) -> FormPayload {
        FormPayload::from_parts(fields, vec![])
    }

    #[test]
    fn test_text_trims_and_drops_empty() {
        let p = payload_with(vec![("name", "  Ada  "), ("title", "   ")]);
        assert_eq!(p.text("name"), Some("Ada"));
        assert_eq!(p.text("title"), None);
        assert_eq!(p.text("missing"), None);
    }

    #[test]
    fn test_json_string_list() {
        let p = payload_with(vec![
            ("technologies", r#"["rust", "axum"]"#),
            ("broken", "{not json"),
        ]);
        assert_eq!(
            p.json_string_list("technologies").unwrap(),
            Some(vec!["rust".to_string(), "axum".to_string()])
        );
        assert!(p.json_string_list("broken").is_err());
        assert_eq!(p.json_string_list("missing").unwrap(), None);
    }

    #[test]
    fn test_flags() {
        let p = payload_with(vec![("featured", "true"), ("current", "false")]);
        assert!(p.flag("featured"));
        assert!(!p.flag("current"));
        assert_eq!(p.opt_flag("current"), Some(false));
        assert_eq!(p.opt_flag("missing"), None);
    }

    #[test]
    fn test_from_json_flattens_nested_values() {
        let p = FormPayload::from_json(serde_json::json!({
            "title": "Site",
            "featured": true,
            "technologies": ["rust", "axum"],
            "stats": {"yearsExperience": 3},
            "skipped": null
        }))
        .unwrap();

        assert_eq!(p.text("title"), Some("Site"));
        assert!(p.flag("featured"));
        assert_eq!(
            p.json_string_list("technologies").unwrap(),
            Some(vec!["rust".to_string(), "axum".to_string()])
        );
        assert_eq!(p.text("skipped"), None);
        assert!(FormPayload::from_json(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_int() {
        let p = payload_with(vec![("proficiency", "85"), ("bad", "lots")]);
        assert_eq!(p.int("proficiency").unwrap(), Some(85));
        assert!(p.int("bad").is_err());
    }
}
