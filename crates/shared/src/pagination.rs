//! Offset-based pagination utilities.

use serde::Serialize;

/// Default number of rows returned when the caller does not ask for a page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A window into an ordered result set.
///
/// `offset` is a row offset (not a page index), matching table widgets that
/// send `start`/`length` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Builds a page request from optional `start`/`length` parameters.
    ///
    /// A missing length falls back to `default_size`; any length is clamped
    /// to `1..=max_size`.
    pub fn from_params(
        start: Option<u32>,
        length: Option<u32>,
        default_size: u32,
        max_size: u32,
    ) -> Self {
        let max_size = max_size.max(1);
        let limit = length.unwrap_or(default_size).clamp(1, max_size);
        Self {
            offset: start.unwrap_or(0),
            limit,
        }
    }

    pub fn offset_i64(&self) -> i64 {
        self.offset as i64
    }

    pub fn limit_i64(&self) -> i64 {
        self.limit as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Converts every item, keeping the total.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}
