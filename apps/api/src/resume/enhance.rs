//! Resume enhancement: rewrites a job or education entry as a short,
//! achievement-focused resume description.
//!
//! The result is returned to the caller only; nothing is persisted.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{complete_within, fill_template, CompletionProvider};
use crate::models::entry::{Entry, EntryKind};
use crate::resume::prompts::ENHANCE_PROMPT_TEMPLATE;
use crate::store::EntryStore;

const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedContent {
    pub enhanced_content: String,
    pub original_content: String,
}

/// Builds the labelled context block sent to the model.
/// Returns `None` for entries that cannot be enhanced.
pub fn build_resume_context(entry: &Entry) -> Option<String> {
    let mut lines = Vec::new();
    match &entry.kind {
        EntryKind::Job(job) => {
            lines.push(format!("Job Title: {}", job.job_title));
            lines.push(format!("Company: {}", job.company_name));
            lines.push(format!("Content: {}", entry.content));
            if !job.skills_developed.is_empty() {
                lines.push(format!("Skills: {}", job.skills_developed.join(", ")));
            }
            if !job.key_achievements.is_empty() {
                lines.push(format!("Achievements: {}", job.key_achievements.join("; ")));
            }
        }
        EntryKind::Education(edu) => {
            lines.push(format!("Qualification: {}", edu.qualification));
            lines.push(format!("Institution: {}", edu.institution));
            lines.push(format!("Content: {}", entry.content));
            if !edu.achievements.is_empty() {
                lines.push(format!("Achievements: {}", edu.achievements.join("; ")));
            }
            if !edu.notable_projects.is_empty() {
                lines.push(format!("Projects: {}", edu.notable_projects.join("; ")));
            }
        }
        EntryKind::Idea(_) | EntryKind::Work(_) | EntryKind::Outcome(_) => return None,
    }
    Some(lines.join("\n"))
}

pub fn build_prompt(entry: &Entry, context: &str) -> String {
    fill_template(
        ENHANCE_PROMPT_TEMPLATE,
        &[
            ("{entry_type}", entry.entry_type().as_str()),
            ("{context}", context),
        ],
    )
}

/// Generates an enhanced description for a job or education entry.
///
/// Checks run in a fixed order: credentials (before any store access),
/// existence, then entry type. AI failures propagate; only a reply without
/// usable text falls back to the original content.
pub async fn enhance_entry(
    store: &dyn EntryStore,
    llm: Option<&dyn CompletionProvider>,
    entry_id: Uuid,
    timeout: Duration,
) -> Result<EnhancedContent, AppError> {
    let llm = llm.ok_or_else(|| AppError::Configuration("Claude API key not configured".to_string()))?;

    let entry = store
        .find_by_id(entry_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;

    let context = build_resume_context(&entry).ok_or_else(|| {
        AppError::Validation("Only job and education entries can be enhanced".to_string())
    })?;

    let response = complete_within(llm, &build_prompt(&entry, &context), MAX_TOKENS, timeout).await?;

    let enhanced_content = match response.text().map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => text.to_string(),
        None => {
            warn!("Enhancement for entry {entry_id} returned no text; keeping original content");
            entry.content.clone()
        }
    };

    info!(
        "Enhanced {} entry {entry_id} ({} chars)",
        entry.entry_type().as_str(),
        enhanced_content.len()
    );

    Ok(EnhancedContent {
        enhanced_content,
        original_content: entry.content,
    })
}
