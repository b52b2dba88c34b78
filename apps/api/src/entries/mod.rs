// Entry CRUD, search and category overview.

pub mod handlers;
pub mod relations;
pub mod validation;

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::entry::EntryType;

/// Parses an `{id}` path segment.
pub fn parse_entry_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation(format!("Invalid entry ID '{raw}'")))
}

/// Parses an optional `type` query filter; blank means no filter.
pub fn parse_type_filter(raw: Option<&str>) -> Result<Option<EntryType>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse().map(Some).map_err(AppError::Validation),
        None => Ok(None),
    }
}

/// Body of the AI endpoints: `{"entryId": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryIdRequest {
    #[serde(default)]
    pub entry_id: Option<String>,
}

impl EntryIdRequest {
    pub fn entry_id(&self) -> Result<Uuid, AppError> {
        let raw = self
            .entry_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Entry ID is required".to_string()))?;

        parse_entry_id(raw)
    }
}
