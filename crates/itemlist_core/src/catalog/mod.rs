//! In-memory item catalog.
//!
//! # Responsibility
//! - Hold the immutable item list for the process lifetime.
//! - Answer substring and exact-id searches in catalog order.
//! - Produce the synthetic catalog used at startup.
//!
//! # Invariants
//! - Catalog order is insertion order and never changes.
//! - Ids are unique within one catalog.

pub mod generator;
pub mod store;
