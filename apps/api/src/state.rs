use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::llm_client::CompletionProvider;
use crate::store::EntryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
    /// `None` when no Anthropic API key is configured.
    pub llm: Option<Arc<dyn CompletionProvider>>,
    /// Object storage for uploaded images.
    pub s3: S3Client,
    pub config: Config,
}

impl AppState {
    pub fn llm(&self) -> Option<&dyn CompletionProvider> {
        self.llm.as_deref()
    }
}
