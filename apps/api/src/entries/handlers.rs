use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::entries::relations::{prune_dangling, resolve_related};
use crate::entries::validation::ensure_valid;
use crate::entries::{parse_entry_id, parse_type_filter};
use crate::errors::AppError;
use crate::models::entry::{Entry, NewEntry};
use crate::state::AppState;
use crate::store::{CategoryCount, EntryOrder, EntryQuery};

const SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// An entry with its `relatedTo` references resolved.
#[derive(Debug, Serialize)]
pub struct EntryDetail {
    #[serde(flatten)]
    pub entry: Entry,
    pub related: Vec<Entry>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decodes a create/replace body so malformed payloads surface as 400s in
/// the API's error shape.
fn parse_new_entry(body: Value) -> Result<NewEntry, AppError> {
    let entry: NewEntry = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid entry: {e}")))?;
    ensure_valid(&entry)?;
    Ok(entry)
}

async fn load_entry(state: &AppState, id: Uuid) -> Result<Entry, AppError> {
    state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entry {id} not found")))
}

/// GET /api/v1/entries
pub async fn handle_list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let query = EntryQuery {
        entry_type: parse_type_filter(params.entry_type.as_deref())?,
        category: non_blank(params.category),
        tag: non_blank(params.tag),
        order: EntryOrder::DateDesc,
        ..Default::default()
    };

    let mut entries = state.store.find_many(&query).await?;
    prune_dangling(state.store.as_ref(), &mut entries).await?;
    Ok(Json(entries))
}

/// GET /api/v1/entries/:id
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EntryDetail>, AppError> {
    let id = parse_entry_id(&id)?;
    let mut entry = load_entry(&state, id).await?;
    let related = resolve_related(state.store.as_ref(), &mut entry).await?;
    Ok(Json(EntryDetail { entry, related }))
}

/// POST /api/v1/entries
pub async fn handle_create_entry(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    let new_entry = parse_new_entry(body)?;
    let now = Utc::now();
    let entry = new_entry.into_entry(Uuid::new_v4(), now, now);

    state.store.insert(&entry).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/v1/entries/:id
///
/// Full-document replace. The entry's type is fixed at creation.
pub async fn handle_replace_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Entry>, AppError> {
    let id = parse_entry_id(&id)?;
    let new_entry = parse_new_entry(body)?;
    let existing = load_entry(&state, id).await?;

    if existing.entry_type() != new_entry.kind.entry_type() {
        return Err(AppError::Validation(format!(
            "Cannot change entry type from '{}' to '{}'",
            existing.entry_type().as_str(),
            new_entry.kind.entry_type().as_str()
        )));
    }

    let entry = new_entry.into_entry(id, existing.created_at, Utc::now());
    // Lost a race with a concurrent delete.
    if !state.store.replace(&entry).await? {
        return Err(AppError::NotFound(format!("Entry {id} not found")));
    }

    Ok(Json(entry))
}

/// DELETE /api/v1/entries/:id
pub async fn handle_delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_entry_id(&id)?;
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound(format!("Entry {id} not found")));
    }
    Ok(Json(json!({ "message": "Entry deleted successfully" })))
}

/// GET /api/v1/search?q=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(Json(vec![]));
    };
    let entries = state.store.search(q, SEARCH_LIMIT).await?;
    Ok(Json(entries))
}

/// GET /api/v1/categories
pub async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    Ok(Json(state.store.categories().await?))
}
