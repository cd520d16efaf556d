//! Global order ledger.
//!
//! # Responsibility
//! - Hold the global ordering of item ids.
//! - Apply full replaces and scope-anchored splices.
//! - Persist every successful mutation through an [`OrderRepository`].
//!
//! # Invariants
//! - `order` never contains the same id twice.
//! - Ids missing from `order` form the unordered tail in catalog order.
//! - Persistence failures never fail a mutation; memory stays authoritative.
//! - A [`OrderLedger::snapshot`] never observes later writes.

use crate::catalog::store::CatalogStore;
use crate::model::item::ItemId;
use crate::repo::order_repo::{OrderRepository, RepoResult};
use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Result of one ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderWrite {
    /// The order changed; `persisted` is false when the save failed.
    Applied { persisted: bool },
    /// Nothing matched the current order; ledger and storage untouched.
    Unchanged,
}

/// Where the order came from at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOrigin {
    Persisted,
    Identity,
    /// Supplied by the caller through [`OrderLedger::with_order`].
    Explicit,
}

/// Process-wide global order with best-effort persistence.
pub struct OrderLedger<R: OrderRepository> {
    repo: R,
    order: Arc<Vec<ItemId>>,
    origin: OrderOrigin,
}

impl<R: OrderRepository> OrderLedger<R> {
    /// Loads the persisted order, falling back to catalog (identity) order.
    ///
    /// A missing record, an empty record and an unreadable record all fall
    /// back to identity; the last one is logged.
    pub fn load(repo: R, catalog: &CatalogStore) -> Self {
        let persisted = match repo.load_order() {
            Ok(order) => order,
            Err(err) => {
                warn!(
                    "event=order_load module=ledger status=error error_code=order_load_failed error={err}"
                );
                None
            }
        };

        let (order, origin) = match persisted {
            Some(order) if !order.is_empty() => (dedup_keep_first(order), OrderOrigin::Persisted),
            _ => (catalog.ids(), OrderOrigin::Identity),
        };

        info!(
            "event=order_load module=ledger status=ok origin={:?} len={}",
            origin,
            order.len()
        );
        Self {
            repo,
            order: Arc::new(order),
            origin,
        }
    }

    /// Creates a ledger with an explicit starting order, without reading storage.
    pub fn with_order(repo: R, order: Vec<ItemId>) -> Self {
        Self {
            repo,
            order: Arc::new(dedup_keep_first(order)),
            origin: OrderOrigin::Explicit,
        }
    }

    /// Full global order, unfiltered by any scope.
    pub fn current(&self) -> &[ItemId] {
        &self.order
    }

    /// Cheap shared handle to the current order.
    ///
    /// Lets callers release the ledger lock before scanning or serializing;
    /// the next write copies the order instead of mutating the shared one.
    pub fn snapshot(&self) -> Arc<Vec<ItemId>> {
        Arc::clone(&self.order)
    }

    /// Where the order was loaded from.
    pub fn origin(&self) -> OrderOrigin {
        self.origin
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Applies a reorder: full replace without scope, anchored splice with one.
    pub fn apply(&mut self, ids: Vec<ItemId>, scope: &str) -> OrderWrite {
        if scope.is_empty() {
            self.replace(ids)
        } else {
            self.scoped_splice(ids, scope)
        }
    }

    /// Replaces the whole order.
    ///
    /// Later duplicates in `ids` are dropped so the no-duplicate invariant
    /// holds.
    pub fn replace(&mut self, ids: Vec<ItemId>) -> OrderWrite {
        self.order = Arc::new(dedup_keep_first(ids));
        info!(
            "event=order_replace module=ledger status=ok len={}",
            self.order.len()
        );
        OrderWrite::Applied {
            persisted: self.persist_logged(),
        }
    }

    /// Re-inserts `ids` as one block at the position of their first current
    /// member.
    ///
    /// Items outside the block keep their relative positions. Ids not yet in
    /// the order are inserted with the block. When no id of `ids` is present
    /// the call is a no-op.
    pub fn scoped_splice(&mut self, ids: Vec<ItemId>, scope: &str) -> OrderWrite {
        let ids = dedup_keep_first(ids);
        let moved: HashSet<&str> = ids.iter().map(String::as_str).collect();

        let Some(anchor) = self
            .order
            .iter()
            .position(|id| moved.contains(id.as_str()))
        else {
            info!(
                "event=order_splice module=ledger status=skipped scope_len={} ids={}",
                scope.len(),
                ids.len()
            );
            return OrderWrite::Unchanged;
        };

        // Nothing before `anchor` is removed, so it stays valid after retain.
        let order = Arc::make_mut(&mut self.order);
        order.retain(|id| !moved.contains(id.as_str()));
        let inserted = ids.len();
        order.splice(anchor..anchor, ids);

        info!(
            "event=order_splice module=ledger status=ok scope_len={} anchor={anchor} ids={inserted} len={}",
            scope.len(),
            self.order.len()
        );
        OrderWrite::Applied {
            persisted: self.persist_logged(),
        }
    }

    /// Writes the current order to storage.
    pub fn persist(&self) -> RepoResult<()> {
        self.repo.save_order(&self.order)
    }

    fn persist_logged(&self) -> bool {
        let started_at = Instant::now();
        match self.persist() {
            Ok(()) => {
                info!(
                    "event=order_persist module=ledger status=ok len={} duration_ms={}",
                    self.order.len(),
                    started_at.elapsed().as_millis()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=order_persist module=ledger status=error error_code=order_persist_failed duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                false
            }
        }
    }
}

fn dedup_keep_first(ids: Vec<ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
