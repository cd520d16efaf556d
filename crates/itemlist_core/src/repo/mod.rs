//! Repository layer for persisted ledger state.
//!
//! # Responsibility
//! - Define the load/save contract the order ledger persists through.
//! - Isolate SQLite details from ledger mutation logic.
//!
//! # Invariants
//! - The persisted order is one record, overwritten wholesale on save.

pub mod order_repo;
