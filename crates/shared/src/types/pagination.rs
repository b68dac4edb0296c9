//! Pagination types for list endpoints.

use serde::Serialize;

/// Normalised page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-indexed).
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
}

impl PageRequest {
    /// Builds a request, forcing `page >= 1` and clamping `per_page` into
    /// `1..=max_per_page`.
    #[must_use]
    pub fn new(page: Option<i64>, per_page: Option<i64>, default_per_page: u64, max_per_page: u64) -> Self {
        let page = page.and_then(|p| u64::try_from(p).ok()).unwrap_or(1).max(1);
        let per_page = per_page
            .map_or(default_per_page, |p| u64::try_from(p).unwrap_or(1))
            .clamp(1, max_per_page);
        Self { page, per_page }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page
    }
}

/// Pagination block used by the user list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number.
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Total number of pages. Zero when there are no items.
    pub total_pages: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl Pagination {
    /// Computes pagination metadata for a request and total.
    #[must_use]
    pub const fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.per_page);
        Self {
            page: request.page,
            per_page: request.per_page,
            total_pages,
            total_items,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// Pagination block used by the cashier transaction list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    /// Total number of items.
    pub total: u64,
    /// Items per page.
    pub per_page: u64,
    /// Current page number.
    pub current_page: u64,
    /// Last page number. Never below 1.
    pub last_page: u64,
}

impl PageMeta {
    /// Computes the meta block for a request and total.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        let last_page = if total == 0 {
            1
        } else {
            total.div_ceil(request.per_page)
        };
        Self {
            total,
            per_page: request.per_page,
            current_page: request.page,
            last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 25)]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(-3), Some(500), 1, 200)]
    #[case(Some(4), Some(10), 4, 10)]
    fn test_page_request_normalises(
        #[case] page: Option<i64>,
        #[case] per_page: Option<i64>,
        #[case] expected_page: u64,
        #[case] expected_per_page: u64,
    ) {
        let req = PageRequest::new(page, per_page, 25, 200);
        assert_eq!(req.page, expected_page);
        assert_eq!(req.per_page, expected_per_page);
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::new(Some(3), Some(20), 50, 1000);
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_pagination_flags() {
        let req = PageRequest::new(Some(2), Some(10), 50, 1000);
        let p = Pagination::new(req, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let empty = Pagination::new(PageRequest::new(None, None, 50, 1000), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn test_page_meta_last_page() {
        let req = PageRequest::new(Some(1), Some(25), 25, 200);
        assert_eq!(PageMeta::new(req, 0).last_page, 1);
        assert_eq!(PageMeta::new(req, 25).last_page, 1);
        assert_eq!(PageMeta::new(req, 26).last_page, 2);
    }
}
