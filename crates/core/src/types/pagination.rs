//! Pagination query parameters and the paged response envelope.

use serde::{Deserialize, Serialize};

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Ascending (the default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl OrderBy {
    /// The SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Errors that can occur when validating [`Pagination`] parameters.
#[derive(thiserror::Error, Debug, Clone)]
pub enum PaginationError {
    /// Page numbers start at 1.
    #[error("page must be greater than or equal to 1")]
    PageZero,
    /// Page sizes start at 1.
    #[error("size must be greater than or equal to 1")]
    SizeZero,
    /// Page size capped to keep result sets bounded.
    #[error("size must be less than or equal to {max}")]
    SizeTooLarge {
        /// Maximum allowed page size.
        max: u32,
    },
}

/// Validated pagination parameters: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    size: u32,
}

impl Pagination {
    /// Largest allowed page size.
    pub const MAX_SIZE: u32 = 100;

    /// Default page size.
    pub const DEFAULT_SIZE: u32 = 10;

    /// Validate a page/size pair.
    ///
    /// # Errors
    ///
    /// Returns an error when `page` or `size` is zero, or `size` exceeds
    /// [`Self::MAX_SIZE`].
    pub const fn new(page: u32, size: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::PageZero);
        }
        if size == 0 {
            return Err(PaginationError::SizeZero);
        }
        if size > Self::MAX_SIZE {
            return Err(PaginationError::SizeTooLarge {
                max: Self::MAX_SIZE,
            });
        }
        Ok(Self { page, size })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// SQL `LIMIT` value.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.size as i64
    }

    /// SQL `OFFSET` value.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.size as i64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// One page of results plus the counters clients need to iterate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total matching rows across all pages.
    pub total: u64,
    /// The 1-based page number that was requested.
    pub page: u32,
    /// The page size that was requested.
    pub size: u32,
    /// Total number of pages (zero when there are no rows).
    pub pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page envelope from query results and the request that
    /// produced them.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let size = u64::from(pagination.size());
        Self {
            items,
            total,
            page: pagination.page(),
            size: pagination.size(),
            pages: total.div_ceil(size),
        }
    }

    /// Map the items while keeping the counters.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_bounds() {
        assert!(Pagination::new(1, 10).is_ok());
        assert!(Pagination::new(1, 100).is_ok());
        assert!(matches!(
            Pagination::new(0, 10),
            Err(PaginationError::PageZero)
        ));
        assert!(matches!(
            Pagination::new(1, 0),
            Err(PaginationError::SizeZero)
        ));
        assert!(matches!(
            Pagination::new(1, 101),
            Err(PaginationError::SizeTooLarge { max: 100 })
        ));
    }

    #[test]
    fn test_limit_offset() {
        let p = Pagination::new(3, 25).unwrap();
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 50);

        let first = Pagination::default();
        assert_eq!(first.offset(), 0);
        assert_eq!(first.limit(), 10);
    }

    #[test]
    fn test_page_counts() {
        let p = Pagination::new(1, 10).unwrap();
        let page = Page::new(vec![1, 2, 3], 23, p);
        assert_eq!(page.pages, 3);
        assert_eq!(page.total, 23);

        let empty: Page<i32> = Page::new(vec![], 0, p);
        assert_eq!(empty.pages, 0);

        let exact: Page<i32> = Page::new(vec![], 30, p);
        assert_eq!(exact.pages, 3);
    }

    #[test]
    fn test_page_map_keeps_counters() {
        let p = Pagination::new(2, 5).unwrap();
        let page = Page::new(vec![1, 2], 7, p).map(|n| n.to_string());
        assert_eq!(page.items, vec!["1".to_owned(), "2".to_owned()]);
        assert_eq!(page.page, 2);
        assert_eq!(page.pages, 2);
    }

    #[test]
    fn test_order_by_sql() {
        assert_eq!(OrderBy::Asc.as_sql(), "ASC");
        assert_eq!(OrderBy::Desc.as_sql(), "DESC");
        assert_eq!(OrderBy::default(), OrderBy::Asc);
    }
}
