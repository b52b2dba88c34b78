// Related entries: AI ranking with a deterministic keyword fallback.
// All LLM calls go through llm_client.

pub mod ai_ranker;
pub mod handlers;
pub mod prompts;
pub mod resolver;
pub mod scoring;

/// Upper bound on related entries returned by either ranking path.
pub const MAX_RELATED: usize = 5;
/// Candidates considered per request; later entries are not ranked.
pub const MAX_CANDIDATES: usize = 100;
