//! Core ordering-and-merge engine for the item list.
//! This crate is the single source of truth for ordering invariants.

pub mod catalog;
pub mod client;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalog::generator::{generate_catalog, DEFAULT_CATALOG_SIZE, DEFAULT_SEED};
pub use catalog::store::{CatalogError, CatalogStore};
pub use client::working_list::{LoadOutcome, LoadTicket, ReorderRequest, WorkingList};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId};
pub use model::page::{ItemPage, PageRequest, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use repo::order_repo::{OrderRepository, RepoError, RepoResult, SqliteOrderRepository};
pub use service::order_ledger::{OrderLedger, OrderOrigin, OrderWrite};
pub use service::query::query_page;
pub use service::selection::SelectionSet;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
