//! Pagination request/response models.
//!
//! # Responsibility
//! - Carry one page of items plus the total match count.
//! - Parse raw query-string values without ever rejecting them.
//!
//! # Invariants
//! - Unparseable or negative offset/limit values fall back to defaults.
//! - Search terms are lowercased before use.

use crate::model::item::Item;
use serde::{Deserialize, Serialize};

/// Offset used when none (or garbage) is supplied.
pub const DEFAULT_OFFSET: usize = 0;
/// Page size used when none (or garbage) is supplied.
pub const DEFAULT_LIMIT: usize = 20;

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemPage {
    /// Number of matches for the search, independent of pagination.
    pub total: usize,
    /// Items in `[offset, offset + limit)` of the ordered result.
    pub items: Vec<Item>,
}

/// Normalized page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Lowercased search term; empty means unfiltered.
    pub search: String,
    pub offset: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            search: String::new(),
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Creates a request from already-validated values.
    pub fn new(search: impl AsRef<str>, offset: usize, limit: usize) -> Self {
        Self {
            search: normalize_search(Some(search.as_ref())),
            offset,
            limit,
        }
    }

    /// Builds a request from raw query-string values.
    ///
    /// Parsing is permissive: a value that does not start with an integer,
    /// or a negative one, is treated as absent. A zero limit is treated as
    /// absent too, so callers always get a non-empty page size.
    pub fn from_raw(offset: Option<&str>, limit: Option<&str>, search: Option<&str>) -> Self {
        let offset = offset
            .and_then(parse_int_prefix)
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(DEFAULT_OFFSET);
        let limit = limit
            .and_then(parse_int_prefix)
            .and_then(|value| usize::try_from(value).ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_LIMIT);

        Self {
            search: normalize_search(search),
            offset,
            limit,
        }
    }
}

/// Lowercases a search term; `None` becomes the empty term.
pub fn normalize_search(search: Option<&str>) -> String {
    search.map(str::to_lowercase).unwrap_or_default()
}

/// Parses the leading base-10 integer of `raw`.
///
/// Accepts leading whitespace and one optional sign, then reads digits until
/// the first non-digit (`"12abc"` is 12). Returns `None` when no digit follows.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = rest[..digits_len]
        .bytes()
        .try_fold(0_i64, |acc, digit| {
            acc.checked_mul(10)?.checked_add(i64::from(digit - b'0'))
        })
        .unwrap_or(i64::MAX);

    Some(if negative { -magnitude } else { magnitude })
}
