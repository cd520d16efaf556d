//! Item domain model.
//!
//! # Responsibility
//! - Define the immutable catalog record exposed to list views.
//!
//! # Invariants
//! - `id` is unique and stable for the process lifetime.
//! - `id` is the decimal string of the 1-based catalog position.

use serde::{Deserialize, Serialize};

/// Stable identifier for a catalog item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemId = String;

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Monotonically increasing decimal id (`"1"`, `"2"`, ...).
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Avatar image URL.
    pub avatar: String,
}

impl Item {
    /// Creates an item from its parts.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: avatar.into(),
        }
    }
}
