//! Axum route handlers for related-entry suggestions.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::entries::EntryIdRequest;
use crate::errors::AppError;
use crate::models::entry::Entry;
use crate::related::resolver::find_related;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FindRelatedResponse {
    pub related: Vec<Entry>,
}

/// POST /api/v1/ai/find-related
///
/// Never fails because of the AI service: failures fall back to keyword matching.
pub async fn handle_find_related(
    State(state): State<AppState>,
    Json(request): Json<EntryIdRequest>,
) -> Result<Json<FindRelatedResponse>, AppError> {
    let entry_id = request.entry_id()?;

    let related = find_related(
        state.store.as_ref(),
        state.llm(),
        entry_id,
        state.config.llm_timeout,
    )
    .await?;

    info!(
        "Resolved {} related entries for {entry_id} via {:?}",
        related.entries.len(),
        related.ranked_by
    );

    Ok(Json(FindRelatedResponse {
        related: related.entries,
    }))
}
