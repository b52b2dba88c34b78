use axum::{extract::State, Json};
use serde::Serialize;

use crate::entries::EntryIdRequest;
use crate::errors::AppError;
use crate::models::entry::{Entry, EntryType};
use crate::resume::enhance::{enhance_entry, EnhancedContent};
use crate::state::AppState;
use crate::store::{EntryOrder, EntryQuery};

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub jobs: Vec<Entry>,
    pub education: Vec<Entry>,
}

/// Most recent start date first.
fn sort_by_start_date(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.start_date().cmp(&a.start_date()));
}

/// GET /api/v1/resume
pub async fn handle_resume(State(state): State<AppState>) -> Result<Json<ResumeResponse>, AppError> {
    let query_for = |entry_type| EntryQuery {
        entry_type: Some(entry_type),
        order: EntryOrder::DateDesc,
        ..Default::default()
    };
    let (jobs_query, education_query) = (query_for(EntryType::Job), query_for(EntryType::Education));

    let (jobs, education) = tokio::join!(
        state.store.find_many(&jobs_query),
        state.store.find_many(&education_query)
    );
    let (mut jobs, mut education) = (jobs?, education?);

    sort_by_start_date(&mut jobs);
    sort_by_start_date(&mut education);

    Ok(Json(ResumeResponse { jobs, education }))
}

/// POST /api/v1/ai/enhance-resume
pub async fn handle_enhance_resume(
    State(state): State<AppState>,
    Json(request): Json<EntryIdRequest>,
) -> Result<Json<EnhancedContent>, AppError> {
    // Credentials are checked before the body's entry id.
    let llm = state
        .llm()
        .ok_or_else(|| AppError::Configuration("Claude API key not configured".to_string()))?;
    let entry_id = request.entry_id()?;

    let enhanced = enhance_entry(
        state.store.as_ref(),
        Some(llm),
        entry_id,
        state.config.llm_timeout,
    )
    .await?;

    Ok(Json(enhanced))
}
