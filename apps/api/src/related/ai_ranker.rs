//! AI relevance client: asks the completion service to pick related candidates by index.
//!
//! Only metadata of candidates goes into the prompt (no content) and the
//! candidate list is capped at `MAX_CANDIDATES` to bound the payload.

use std::collections::HashSet;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::llm_client::{
    complete_within, fill_template, strip_json_fences, CompletionProvider, LlmError,
};
use crate::models::entry::Entry;
use crate::related::prompts::RELATED_PROMPT_TEMPLATE;
use crate::related::{MAX_CANDIDATES, MAX_RELATED};

const MAX_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("AI ranking is not configured")]
    NotConfigured,

    #[error("AI service failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("unusable AI response: {0}")]
    Parse(String),
}

fn tags_or_none(tags: &[String]) -> String {
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}

pub fn build_prompt(source: &Entry, candidates: &[Entry]) -> String {
    let current_entry = format!(
        "Title: {}\nContent: {}\nCategory: {}\nTags: {}\nType: {}",
        source.title,
        source.content,
        source.category,
        tags_or_none(&source.tags),
        source.entry_type().as_str()
    );

    let candidate_entries = candidates
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            format!(
                "[{idx}] Title: {} | Category: {} | Type: {} | Tags: {}",
                e.title,
                e.category,
                e.entry_type().as_str(),
                tags_or_none(&e.tags)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        RELATED_PROMPT_TEMPLATE,
        &[
            ("{current_entry}", &current_entry),
            ("{candidate_entries}", &candidate_entries),
        ],
    )
}

/// Parses the model's JSON array into valid, distinct candidate indices.
///
/// Out-of-range, negative and non-integer elements are dropped; at most
/// `MAX_RELATED` indices are kept, in the model's order.
pub fn parse_indices(text: &str, candidate_count: usize) -> Result<Vec<usize>, RankingError> {
    let values: Vec<Value> = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| RankingError::Parse(format!("expected a JSON array of indices: {e}")))?;

    let mut seen = HashSet::new();
    Ok(values
        .iter()
        .filter_map(Value::as_u64)
        .filter_map(|i| usize::try_from(i).ok())
        .filter(|&i| i < candidate_count)
        .filter(|&i| seen.insert(i))
        .take(MAX_RELATED)
        .collect())
}

/// Ranks `candidates` against `source` with one completion call.
///
/// Returns indices into `candidates`. Every failure is definitive for this
/// attempt: missing credentials, transport/API errors, timeouts, and responses
/// that yield no usable index.
pub async fn rank_with_ai(
    llm: Option<&dyn CompletionProvider>,
    source: &Entry,
    candidates: &[Entry],
    timeout: Duration,
) -> Result<Vec<usize>, RankingError> {
    let llm = llm.ok_or(RankingError::NotConfigured)?;
    let candidates = &candidates[..candidates.len().min(MAX_CANDIDATES)];

    let prompt = build_prompt(source, candidates);
    let response = complete_within(llm, &prompt, MAX_TOKENS, timeout).await?;

    let text = response
        .text()
        .ok_or_else(|| RankingError::Parse("response contained no text block".to_string()))?;

    let indices = parse_indices(text, candidates.len())?;
    if indices.is_empty() {
        return Err(RankingError::Parse(format!(
            "no valid candidate index in {text:?}"
        )));
    }

    Ok(indices)
}
