//! Core use-case services.
//!
//! # Responsibility
//! - Own the mutable ledger and selection state.
//! - Compose catalog search with ledger ordering into pages.
//!
//! # Invariants
//! - Ledger mutations are whole-step; no caller observes a half-applied splice.

pub mod order_ledger;
pub mod query;
pub mod selection;
