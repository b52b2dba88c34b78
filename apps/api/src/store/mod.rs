//! Entry Store: persistence boundary for knowledge-base entries.
//!
//! Handlers and services only see `Arc<dyn EntryStore>`. The Postgres backend
//! is used in production; the in-memory backend backs the test suite.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::entry::{Entry, EntryType};

/// Result ordering for `find_many`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryOrder {
    /// Store-default order (creation order). Callers must not read meaning into it.
    #[default]
    Inserted,
    /// Newest `date` first.
    DateDesc,
}

/// Filter for `find_many`. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    pub entry_type: Option<EntryType>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub exclude_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub order: EntryOrder,
}

impl EntryQuery {
    /// In-memory equivalent of the SQL filter.
    #[cfg(test)]
    pub fn matches(&self, entry: &Entry) -> bool {
        self.entry_type.map_or(true, |t| entry.entry_type() == t)
            && self
                .category
                .as_deref()
                .map_or(true, |c| entry.category == c)
            && self
                .tag
                .as_deref()
                .map_or(true, |tag| entry.tags.iter().any(|t| t == tag))
            && self.exclude_id.map_or(true, |id| entry.id != id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Entry>>;

    /// Returns the entries that exist among `ids`; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Entry>>;

    async fn find_many(&self, query: &EntryQuery) -> Result<Vec<Entry>>;

    /// Case-insensitive literal substring search, newest first.
    async fn search(&self, text: &str, limit: i64) -> Result<Vec<Entry>>;

    /// Distinct categories with entry counts, sorted by category.
    async fn categories(&self) -> Result<Vec<CategoryCount>>;

    async fn insert(&self, entry: &Entry) -> Result<()>;

    /// Full-document replace. Returns `false` if the entry does not exist.
    async fn replace(&self, entry: &Entry) -> Result<bool>;

    /// Returns `false` if the entry does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
