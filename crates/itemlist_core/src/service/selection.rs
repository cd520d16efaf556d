//! Selected-item set.
//!
//! # Invariants
//! - Every write replaces the whole set.
//! - Selection is independent of search scope and ordering.

use crate::model::item::ItemId;
use log::info;
use std::collections::BTreeSet;

/// In-memory set of selected item ids.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    selected: BTreeSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection with `ids`; duplicates collapse.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.selected = ids.into_iter().collect();
        info!(
            "event=selection_replace module=selection status=ok len={}",
            self.selected.len()
        );
    }

    /// Selected ids in ascending string order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.selected.iter().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
