//! Related-entries resolver: AI ranking with a keyword fallback.
//!
//! Flow: load entry and candidates concurrently, AI rank, and on any AI failure
//! keyword rank over the same in-memory data. Indices map back to entries.
//!
//! Only `NotFound` (and store failures, for which there is no data to rank)
//! reach the caller. AI failures are logged and absorbed.

use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::CompletionProvider;
use crate::models::entry::Entry;
use crate::related::ai_ranker::rank_with_ai;
use crate::related::scoring::rank_by_keywords;
use crate::related::MAX_CANDIDATES;
use crate::store::{EntryQuery, EntryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankedBy {
    /// No candidates existed; nothing was ranked.
    NoCandidates,
    Ai,
    Keyword,
}

#[derive(Debug, Clone)]
pub struct RelatedEntries {
    pub entries: Vec<Entry>,
    pub ranked_by: RankedBy,
}

pub async fn find_related(
    store: &dyn EntryStore,
    llm: Option<&dyn CompletionProvider>,
    entry_id: Uuid,
    timeout: Duration,
) -> Result<RelatedEntries, AppError> {
    let candidate_query = EntryQuery {
        exclude_id: Some(entry_id),
        limit: Some(MAX_CANDIDATES as i64),
        ..Default::default()
    };

    let (source, candidates) = tokio::join!(
        store.find_by_id(entry_id),
        store.find_many(&candidate_query)
    );

    let source =
        source?.ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;
    let mut candidates = candidates?;
    candidates.truncate(MAX_CANDIDATES);

    if candidates.is_empty() {
        return Ok(RelatedEntries {
            entries: vec![],
            ranked_by: RankedBy::NoCandidates,
        });
    }

    let (indices, ranked_by) = match rank_with_ai(llm, &source, &candidates, timeout).await {
        Ok(indices) => (indices, RankedBy::Ai),
        Err(e) => {
            warn!("AI ranking failed for entry {entry_id}, using keyword fallback: {e}");
            let indices = rank_by_keywords(&source, &candidates)
                .into_iter()
                .map(|c| c.index)
                .collect();
            (indices, RankedBy::Keyword)
        }
    };

    let entries: Vec<Entry> = indices
        .into_iter()
        .filter_map(|i| candidates.get(i).cloned())
        .collect();

    Ok(RelatedEntries { entries, ranked_by })
}
