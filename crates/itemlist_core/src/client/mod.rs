//! Consumer-side list state.
//!
//! # Responsibility
//! - Accumulate fetched pages into a working list per search term.
//! - Reconcile the working list with the authoritative order.
//! - Produce reorder requests for optimistic drag-and-drop moves.
//!
//! This module holds no I/O; async drivers fetch data and feed results in.

pub mod working_list;
