//! Weak-reference resolution for `relatedTo`.
//!
//! References are never enforced on write. On read, ids that no longer point
//! at an entry are dropped silently.

use std::collections::HashSet;

use anyhow::Result;
use uuid::Uuid;

use crate::models::entry::Entry;
use crate::store::EntryStore;

/// Loads the entries `entry.related_to` points at, in reference order, and
/// drops dangling ids from `entry.related_to`.
pub async fn resolve_related(store: &dyn EntryStore, entry: &mut Entry) -> Result<Vec<Entry>> {
    if entry.related_to.is_empty() {
        return Ok(vec![]);
    }

    let found = store.find_by_ids(&entry.related_to).await?;
    let resolved: Vec<Entry> = entry
        .related_to
        .iter()
        .filter_map(|id| found.iter().find(|e| e.id == *id).cloned())
        .collect();

    entry
        .related_to
        .retain(|id| found.iter().any(|e| e.id == *id));

    Ok(resolved)
}

/// Drops dangling `related_to` ids across a batch with a single lookup.
pub async fn prune_dangling(store: &dyn EntryStore, entries: &mut [Entry]) -> Result<()> {
    let referenced: Vec<Uuid> = entries
        .iter()
        .flat_map(|e| e.related_to.iter().copied())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if referenced.is_empty() {
        return Ok(());
    }

    let existing: HashSet<Uuid> = store
        .find_by_ids(&referenced)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();

    for entry in entries.iter_mut() {
        entry.related_to.retain(|id| existing.contains(id));
    }
    Ok(())
}
