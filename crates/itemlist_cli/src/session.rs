//! Async driver for the client working list.
//!
//! # Responsibility
//! - Run `load_more` as a single-flight fetch of one page plus the order.
//! - Apply drag-and-drop moves locally and submit them in the background.
//! - Mirror the server-side selection, re-reading it on every search reset.
//!
//! # Invariants
//! - The working-list lock is never held across an await.
//! - An in-flight load is always released, including when its future is
//!   dropped before completion.
//! - Reorder submissions are fire-and-forget; failures are logged and the
//!   local move is kept.

use crate::api::{ApiError, ItemsApi};
use itemlist_core::{Item, ItemId, LoadOutcome, LoadTicket, WorkingList};
use log::{debug, warn};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

/// One user's view over the remote item list.
pub struct ListSession<A: ItemsApi + 'static> {
    api: Arc<A>,
    list: Mutex<WorkingList>,
    selected: Mutex<BTreeSet<ItemId>>,
}

/// Releases the working list's in-flight flag unless the load completed.
struct InFlight<'a> {
    list: &'a Mutex<WorkingList>,
    ticket: LoadTicket,
    completed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.completed {
            lock(self.list).abandon_load(&self.ticket);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Waits for a background reorder submit. Returns `false` when the task
/// panicked or was cancelled; submit errors themselves are logged by the task.
pub async fn wait_for_submit(submit: JoinHandle<()>) -> bool {
    match submit.await {
        Ok(()) => true,
        Err(err) => {
            warn!("event=reorder_submit module=session status=error error={err}");
            false
        }
    }
}

impl<A: ItemsApi + 'static> ListSession<A> {
    pub fn new(api: Arc<A>, page_size: usize) -> Self {
        Self {
            api,
            list: Mutex::new(WorkingList::new(page_size)),
            selected: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Switches the active search term. Returns `true` when the list was
    /// reset.
    ///
    /// A reset also refreshes the selection mirror from the server. The list
    /// is reset before that request, so an error leaves it on the new term.
    pub async fn set_search(&self, term: &str) -> Result<bool, ApiError> {
        let reset = lock(&self.list).set_search(term);
        if !reset {
            return Ok(false);
        }
        debug!("event=search_change module=session status=reset");
        self.get_selection().await?;
        Ok(true)
    }

    /// Fetches the next page for the active term.
    ///
    /// Returns `Ok(None)` when the load was skipped because another one is
    /// running or nothing more is available. A load that outlived its search
    /// term yields `LoadOutcome::Stale`, whether its fetch succeeded or not.
    pub async fn load_more(&self) -> Result<Option<LoadOutcome>, ApiError> {
        let Some(ticket) = lock(&self.list).begin_load() else {
            debug!("event=load_more module=session status=skipped");
            return Ok(None);
        };
        let mut guard = InFlight {
            list: &self.list,
            ticket,
            completed: false,
        };

        let ticket = &guard.ticket;
        let (page, order) = tokio::join!(
            self.api
                .get_items(&ticket.search, ticket.offset, ticket.limit),
            self.api.get_order(&ticket.search),
        );
        let fetched = page.and_then(|page| order.map(|order| (page, order)));

        let result = match fetched {
            Ok(data) => {
                let outcome = lock(&self.list).complete_load(&guard.ticket, Ok::<_, ()>(data));
                debug!(
                    "event=load_more module=session status=ok offset={} outcome={:?}",
                    guard.ticket.offset, outcome
                );
                Ok(Some(outcome))
            }
            Err(err) => {
                let outcome = lock(&self.list).complete_load(&guard.ticket, Err::<(_, _), _>(()));
                if outcome == LoadOutcome::Stale {
                    debug!(
                        "event=load_more module=session status=stale offset={} error={err}",
                        guard.ticket.offset
                    );
                    Ok(Some(outcome))
                } else {
                    warn!(
                        "event=load_more module=session status=error offset={} error={err}",
                        guard.ticket.offset
                    );
                    Err(err)
                }
            }
        };
        guard.completed = true;
        result
    }

    /// Moves one item locally and submits the new order in the background.
    ///
    /// Returns `None` when `from` is out of range. Must be called inside a
    /// tokio runtime.
    pub fn reorder_local(&self, from: usize, to: usize) -> Option<JoinHandle<()>> {
        let request = lock(&self.list).reorder_local(from, to)?;
        let api = Arc::clone(&self.api);
        Some(tokio::spawn(async move {
            match api.set_order(&request.ids, &request.scope).await {
                Ok(()) => debug!(
                    "event=reorder_submit module=session status=ok count={}",
                    request.ids.len()
                ),
                Err(err) => warn!("event=reorder_submit module=session status=error error={err}"),
            }
        }))
    }

    /// Replaces the server selection and the local mirror.
    pub async fn set_selection(&self, ids: Vec<ItemId>) -> Result<(), ApiError> {
        *lock(&self.selected) = ids.iter().cloned().collect();
        self.api.set_selection(&ids).await
    }

    /// Reads the selection from the server and refreshes the local mirror.
    pub async fn get_selection(&self) -> Result<Vec<ItemId>, ApiError> {
        let ids = self.api.get_selection().await?;
        *lock(&self.selected) = ids.iter().cloned().collect();
        Ok(ids)
    }

    /// Checks or unchecks one item, then writes the full selection.
    pub async fn toggle_selection(&self, id: &str, checked: bool) -> Result<(), ApiError> {
        let ids: Vec<ItemId> = {
            let mut selected = lock(&self.selected);
            if checked {
                selected.insert(id.to_string());
            } else {
                selected.remove(id);
            }
            selected.iter().cloned().collect()
        };
        self.api.set_selection(&ids).await
    }

    pub fn is_selected(&self, id: &str) -> bool {
        lock(&self.selected).contains(id)
    }

    pub fn items(&self) -> Vec<Item> {
        lock(&self.list).items().to_vec()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        lock(&self.list).ids()
    }

    pub fn search(&self) -> String {
        lock(&self.list).search().to_string()
    }

    pub fn total(&self) -> usize {
        lock(&self.list).total()
    }

    pub fn has_more(&self) -> bool {
        lock(&self.list).has_more()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.list).is_loading()
    }
}
