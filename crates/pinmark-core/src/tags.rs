//! Ranked, filterable view over the account's tag counts.

use crate::TagCount;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    /// Count descending; equal counts keep source order.
    ranked: Vec<TagCount>,
}

/// Tag list split for display: selected tags always shown, the rest capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPartition {
    pub selected: Vec<TagCount>,
    pub unselected: Vec<TagCount>,
    /// Unselected tags that matched but were cut by the cap.
    pub hidden: usize,
}

impl TagIndex {
    pub fn new(mut tags: Vec<TagCount>) -> Self {
        // stable: ties stay in source order
        tags.sort_by(|a, b| b.count.cmp(&a.count));
        Self { ranked: tags }
    }

    pub fn into_ranked(self) -> Vec<TagCount> {
        self.ranked
    }

    /// Tags whose name contains `filter` (case-insensitive), count descending.
    pub fn list(&self, filter: &str) -> Vec<TagCount> {
        let needle = filter.trim().to_lowercase();
        self.ranked
            .iter()
            .filter(|t| needle.is_empty() || t.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Filter, then split against the current selection. Selected tags keep
    /// selection order and are never truncated; unselected ones fill the
    /// remaining `max_results` slots.
    pub fn partition(&self, filter: &str, selected: &[String], max_results: usize) -> TagPartition {
        let filtered = self.list(filter);
        let mut picked = Vec::new();
        for name in selected {
            if let Some(t) = filtered.iter().find(|t| &t.name == name) {
                picked.push(t.clone());
            }
        }
        let rest: Vec<TagCount> = filtered
            .into_iter()
            .filter(|t| !selected.contains(&t.name))
            .collect();
        let room = max_results.saturating_sub(picked.len());
        let hidden = rest.len().saturating_sub(room);
        let unselected = rest.into_iter().take(room).collect();
        TagPartition {
            selected: picked,
            unselected,
            hidden,
        }
    }
}
