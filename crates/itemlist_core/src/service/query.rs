//! Page query engine.
//!
//! # Responsibility
//! - Merge catalog search results with the global order.
//! - Slice the merged sequence into one page.
//!
//! # Invariants
//! - Every match appears exactly once in the merged sequence: ordered
//!   matches first in ledger order, then the rest in catalog order.
//! - `total` counts all matches regardless of pagination.
//! - Slicing past the end yields an empty page, never an error.

use crate::catalog::store::CatalogStore;
use crate::model::item::{Item, ItemId};
use crate::model::page::{ItemPage, PageRequest};

/// Computes one page of `request.search` results under `order`.
pub fn query_page(catalog: &CatalogStore, order: &[ItemId], request: &PageRequest) -> ItemPage {
    let matches = catalog.matching_positions(&request.search);
    let total = matches.len();

    let items = if order.is_empty() {
        matches
            .iter()
            .skip(request.offset)
            .take(request.limit)
            .filter_map(|position| catalog.item_at(*position))
            .cloned()
            .collect()
    } else {
        merged_sequence(catalog, order, &matches)
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect()
    };

    ItemPage { total, items }
}

/// Ordered matches in ledger order, followed by unordered matches in catalog
/// order.
fn merged_sequence<'a>(
    catalog: &'a CatalogStore,
    order: &'a [ItemId],
    matches: &'a [usize],
) -> impl Iterator<Item = &'a Item> + 'a {
    let mut matched = vec![false; catalog.len()];
    for position in matches {
        matched[*position] = true;
    }

    let mut in_order = vec![false; catalog.len()];
    let mut ordered = Vec::new();
    for position in order.iter().filter_map(|id| catalog.position_of(id)) {
        if in_order[position] {
            continue;
        }
        in_order[position] = true;
        if matched[position] {
            ordered.push(position);
        }
    }

    let rest = matches
        .iter()
        .copied()
        .filter(move |position| !in_order[*position]);

    ordered
        .into_iter()
        .chain(rest)
        .filter_map(move |position| catalog.item_at(position))
}

#[cfg(test)]
mod tests {
    use super::query_page;
    use crate::catalog::store::CatalogStore;
    use crate::model::item::Item;
    use crate::model::page::PageRequest;

    fn catalog() -> CatalogStore {
        CatalogStore::try_new(vec![
            Item::new("1", "Ann", "ann@x.io", ""),
            Item::new("2", "Bob", "bob@x.io", ""),
            Item::new("3", "Cat", "cat@x.io", ""),
        ])
        .unwrap()
    }

    #[test]
    fn unknown_ids_in_order_are_skipped() {
        let order = vec!["99".to_string(), "3".to_string()];
        let page = query_page(&catalog(), &order, &PageRequest::new("", 0, 10));
        let ids: Vec<_> = page.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn empty_order_returns_matches_unchanged() {
        let page = query_page(&catalog(), &[], &PageRequest::new("", 1, 1));
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].id, "2");
    }
}
