//! In-memory [`EntryStore`] for tests. Keeps insertion order as the store-default order.

use std::collections::BTreeMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::entry::Entry;
use crate::store::{CategoryCount, EntryOrder, EntryQuery, EntryStore};

#[derive(Default)]
pub struct InMemoryEntryStore {
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.read().unwrap().clone()
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Entry>> {
        Ok(self.snapshot().into_iter().find(|e| e.id == id))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Entry>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|e| ids.contains(&e.id))
            .collect())
    }

    async fn find_many(&self, query: &EntryQuery) -> Result<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .snapshot()
            .into_iter()
            .filter(|e| query.matches(e))
            .collect();
        if query.order == EntryOrder::DateDesc {
            entries.sort_by(|a, b| b.date.cmp(&a.date));
        }
        if let Some(limit) = query.limit {
            entries.truncate(limit.max(0) as usize);
        }
        Ok(entries)
    }

    async fn search(&self, text: &str, limit: i64) -> Result<Vec<Entry>> {
        let needle = text.to_lowercase();
        let mut entries: Vec<Entry> = self
            .snapshot()
            .into_iter()
            .filter(|e| {
                e.searchable_fields()
                    .iter()
                    .any(|f| f.to_lowercase().contains(&needle))
            })
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn categories(&self) -> Result<Vec<CategoryCount>> {
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for entry in self.snapshot() {
            *counts.entry(entry.category).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }

    async fn insert(&self, entry: &Entry) -> Result<()> {
        self.entries.write().unwrap().push(entry.clone());
        Ok(())
    }

    async fn replace(&self, entry: &Entry) -> Result<bool> {
        let mut entries = self.entries.write().unwrap();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                *existing = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() < before)
    }
}
