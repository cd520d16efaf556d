//! Catalog store and search.
//!
//! # Responsibility
//! - Index items by id for O(1) lookups.
//! - Run case-insensitive substring search over name and email.
//!
//! # Invariants
//! - Search results preserve catalog order.
//! - An empty term matches every item.
//! - The store is read-only after construction, so `&CatalogStore` is safe to
//!   share across request handlers.

use crate::model::item::{Item, ItemId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from catalog construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two items share the same id.
    DuplicateId(ItemId),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate catalog item id: {id}"),
        }
    }
}

impl Error for CatalogError {}

/// Immutable, searchable item catalog.
#[derive(Debug, Default)]
pub struct CatalogStore {
    items: Vec<Item>,
    positions: HashMap<ItemId, usize>,
    // Lowercased `name` and `email`, parallel to `items`.
    search_keys: Vec<(String, String)>,
}

impl CatalogStore {
    /// Builds a catalog from items in their catalog order.
    ///
    /// # Errors
    /// - Returns `DuplicateId` when two items share one id.
    pub fn try_new(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if positions.insert(item.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }

        let search_keys = items
            .iter()
            .map(|item| (item.name.to_lowercase(), item.email.to_lowercase()))
            .collect();

        Ok(Self {
            items,
            positions,
            search_keys,
        })
    }

    /// Number of items in the catalog.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in catalog order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Loads one item by id.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.position_of(id).map(|position| &self.items[position])
    }

    /// Catalog position of one id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Item at one catalog position.
    pub fn item_at(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// All ids in catalog order (the identity ordering).
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Returns every item matching `term`, in catalog order.
    ///
    /// An item matches when its id equals `term` verbatim, or when its name
    /// or email contains `term` case-insensitively. An empty term returns the
    /// whole catalog.
    pub fn search(&self, term: &str) -> Vec<&Item> {
        self.matching_positions(term)
            .into_iter()
            .map(|position| &self.items[position])
            .collect()
    }

    /// Same as [`CatalogStore::search`] but yields catalog positions.
    pub fn matching_positions(&self, term: &str) -> Vec<usize> {
        if term.is_empty() {
            return (0..self.items.len()).collect();
        }

        let needle = term.to_lowercase();
        self.items
            .iter()
            .zip(&self.search_keys)
            .enumerate()
            .filter(|(_, (item, (name, email)))| {
                item.id == term || name.contains(&needle) || email.contains(&needle)
            })
            .map(|(position, _)| position)
            .collect()
    }
}
