//! Catalog item and page models shared by server and client.
//!
//! # Responsibility
//! - Define the wire shapes for items and paginated responses.
//! - Normalize raw pagination input into a usable page request.
//!
//! # Invariants
//! - Every item is identified by a stable decimal-string `ItemId`.
//! - Items are immutable once generated.

pub mod item;
pub mod page;
