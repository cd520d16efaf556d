//! Working list state machine.
//!
//! # Responsibility
//! - Guard page loads so only one is in flight per search session.
//! - Discard responses that arrive after the search term changed.
//! - Merge pages without duplicating ids and re-sort against the order.
//!
//! # Invariants
//! - `items` never holds two entries with the same id.
//! - A completed load of the current generation always clears `in_flight`.
//! - Local reorders are never rolled back by this type.

use crate::model::item::{Item, ItemId};
use crate::model::page::{normalize_search, ItemPage, DEFAULT_LIMIT};
use std::collections::{HashMap, HashSet};

/// Token handed out by [`WorkingList::begin_load`] and returned with the
/// fetched data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    /// Search term the load was started for.
    pub search: String,
    pub offset: usize,
    pub limit: usize,
}

/// Outcome of feeding a load result back into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page merged; `added` items were new to the list.
    Merged { added: usize },
    /// The term changed since the load started; result dropped.
    Stale,
    /// The fetch failed; cursor unchanged.
    Failed,
}

/// Order update produced by a local move, to be sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    /// Whole working-list id sequence after the move.
    pub ids: Vec<ItemId>,
    /// Active search term; empty means an unscoped replace.
    pub scope: String,
}

/// Client-side accumulated list for one search term at a time.
#[derive(Debug, Clone)]
pub struct WorkingList {
    search: String,
    items: Vec<Item>,
    page_size: usize,
    cursor: usize,
    total: usize,
    has_more: bool,
    in_flight: bool,
    generation: u64,
}

impl Default for WorkingList {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl WorkingList {
    /// Creates an empty list for the unfiltered term.
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            items: Vec::new(),
            page_size: page_size.max(1),
            cursor: 0,
            total: 0,
            has_more: true,
            in_flight: false,
            generation: 0,
        }
    }

    /// Switches the active search term.
    ///
    /// A different term resets items, cursor and the in-flight guard, and
    /// invalidates outstanding loads. Returns whether a reset happened.
    pub fn set_search(&mut self, search: &str) -> bool {
        let search = normalize_search(Some(search));
        if search == self.search {
            return false;
        }

        self.search = search;
        self.items.clear();
        self.cursor = 0;
        self.total = 0;
        self.has_more = true;
        self.in_flight = false;
        self.generation += 1;
        true
    }

    /// Starts a page load, or returns `None` when one is already running or
    /// no more pages are available.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.in_flight || !self.has_more {
            return None;
        }

        self.in_flight = true;
        Some(LoadTicket {
            generation: self.generation,
            search: self.search.clone(),
            offset: self.cursor * self.page_size,
            limit: self.page_size,
        })
    }

    /// Feeds a finished load back in.
    ///
    /// `result` carries the fetched page and the authoritative order, or the
    /// fetch error.
    pub fn complete_load<E>(
        &mut self,
        ticket: &LoadTicket,
        result: Result<(ItemPage, Vec<ItemId>), E>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            return LoadOutcome::Stale;
        }
        self.in_flight = false;

        let Ok((page, order)) = result else {
            return LoadOutcome::Failed;
        };

        let added = self.merge_page(page.items);
        if !order.is_empty() {
            self.sort_by_order(&order);
        }

        self.cursor += 1;
        self.total = page.total;
        self.has_more = self.cursor * self.page_size < page.total;
        LoadOutcome::Merged { added }
    }

    /// Releases the in-flight guard for a load that will never complete,
    /// e.g. when the fetching future was dropped.
    pub fn abandon_load(&mut self, ticket: &LoadTicket) {
        if ticket.generation == self.generation {
            self.in_flight = false;
        }
    }

    /// Moves one item locally and returns the order update to submit.
    ///
    /// `to` past the end is clamped to the last index. Returns `None` when
    /// `from` is out of range.
    pub fn reorder_local(&mut self, from: usize, to: usize) -> Option<ReorderRequest> {
        if from >= self.items.len() {
            return None;
        }

        let moved = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, moved);

        Some(ReorderRequest {
            ids: self.ids(),
            scope: self.search.clone(),
        })
    }

    /// Items in display order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item ids in display order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Active (lowercased) search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Number of pages merged for the active term.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total matches reported by the last merged page.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    fn merge_page(&mut self, incoming: Vec<Item>) -> usize {
        let mut known: HashSet<ItemId> = self.items.iter().map(|item| item.id.clone()).collect();
        let before = self.items.len();
        for item in incoming {
            if known.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    // Ids in `order` first, in that order; everything else keeps its
    // accumulated position relative to each other.
    fn sort_by_order(&mut self, order: &[ItemId]) {
        let mut by_id: HashMap<ItemId, Item> = HashMap::with_capacity(self.items.len());
        let mut accumulated = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            accumulated.push(item.id.clone());
            by_id.insert(item.id.clone(), item);
        }

        let mut sorted = Vec::with_capacity(accumulated.len());
        for id in order {
            if let Some(item) = by_id.remove(id) {
                sorted.push(item);
            }
        }
        for id in accumulated {
            if let Some(item) = by_id.remove(&id) {
                sorted.push(item);
            }
        }
        self.items = sorted;
    }
}

#[cfg(test)]
mod tests {
    use super::WorkingList;
    use crate::model::item::Item;

    fn item(id: &str) -> Item {
        Item::new(id, format!("Name {id}"), format!("{id}@x.io"), "")
    }

    #[test]
    fn sort_by_order_puts_ordered_first_and_keeps_rest_stable() {
        let mut list = WorkingList::new(10);
        list.items = vec![item("1"), item("2"), item("3"), item("4")];
        list.sort_by_order(&["3".to_string(), "9".to_string(), "1".to_string()]);
        assert_eq!(list.ids(), vec!["3", "1", "2", "4"]);
    }

    #[test]
    fn merge_page_skips_known_ids() {
        let mut list = WorkingList::new(10);
        assert_eq!(list.merge_page(vec![item("1"), item("2")]), 2);
        assert_eq!(list.merge_page(vec![item("2"), item("3"), item("3")]), 1);
        assert_eq!(list.ids(), vec!["1", "2", "3"]);
    }
}
