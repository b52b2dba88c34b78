// Resume view over job/education entries and AI-assisted description rewriting.
// All LLM calls go through llm_client::CompletionProvider.

pub mod enhance;
pub mod handlers;
pub mod prompts;
