//! Pagination helper types for repository queries
//!
//! Pages are 1-indexed. Raw query-string values are turned into a validated
//! [`PageRequest`] with [`PageRequest::parse`]; the store reports a total row
//! count and [`Page::new`] derives the page count from it.

use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};

/// Page used when the caller supplies none
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when the caller supplies none
pub const DEFAULT_LIMIT: u64 = 10;

/// Pagination request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Current page number (1-indexed)
    pub page: u64,
    /// Number of items per page
    pub limit: u64,
}

impl PageRequest {
    /// Create a validated page request
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `page` or `limit` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::PageRequest;
    ///
    /// let request = PageRequest::new(3, 20).unwrap();
    /// assert_eq!(request.offset(), 40);
    /// assert!(PageRequest::new(0, 20).is_err());
    /// ```
    pub fn new(page: u64, limit: u64) -> Result<Self> {
        if page < 1 {
            return Err(LibraryError::invalid("page", "invalid page number"));
        }
        if limit < 1 {
            return Err(LibraryError::invalid("limit", "invalid limit number"));
        }
        Ok(Self { page, limit })
    }

    /// Parse raw `page`/`limit` query values.
    ///
    /// Absent values default to page 1 and limit 10. A present value must be
    /// an integer of at least 1; an empty string is not a number.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let page = parse_positive("page", "invalid page number", page, DEFAULT_PAGE)?;
        let limit = parse_positive("limit", "invalid limit number", limit, DEFAULT_LIMIT)?;
        Self::new(page, limit)
    }

    /// Number of rows to skip: `(page - 1) * limit`, saturating
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Get the LIMIT value
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Ceiling of `total / limit`
    pub fn total_pages(&self, total: u64) -> u64 {
        total_pages(total, self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Number of pages needed to show `total` rows, `limit` per page.
///
/// Zero rows yield zero pages.
pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }

    let mut pages = total / limit;
    if total % limit != 0 {
        pages += 1;
    }
    pages
}

fn parse_positive(field: &str, message: &str, raw: Option<&str>, default: u64) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.parse::<i64>() {
        Ok(value) if value >= 1 => Ok(value as u64),
        _ => Err(LibraryError::invalid(field, message)),
    }
}

/// Paginated response containing items and metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    pub total: u64,
    /// Current page number
    pub page: u64,
    /// Number of items per page
    pub limit: u64,
    /// Total number of pages
    pub pages: u64,
}

impl<T> Page<T> {
    /// Create a new paginated response
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::repositories::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(1, 10).unwrap();
    /// let page = Page::new(vec![1, 2, 3], 25, request);
    ///
    /// assert_eq!(page.items.len(), 3);
    /// assert_eq!(page.total, 25);
    /// assert_eq!(page.pages, 3);
    /// ```
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            pages: request.total_pages(total),
        }
    }

    /// Check if there are more pages after the current one
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Check if there are pages before the current one
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Map the items to a different type
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            pages: self.pages,
        }
    }
}
