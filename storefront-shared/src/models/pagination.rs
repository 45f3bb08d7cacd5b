/// Page arithmetic for list endpoints

use serde::Serialize;

/// Page size used when the caller supplies none or an invalid one
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Normalized page request
///
/// Out-of-range input is clamped rather than rejected: `page < 1` becomes 1 and
/// `per_page < 1` becomes [`DEFAULT_PER_PAGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: if page < 1 { 1 } else { page },
            per_page: if per_page < 1 { DEFAULT_PER_PAGE } else { per_page },
        }
    }

    /// Rows to skip
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Rows to return
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// `ceil(total / per_page)`
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.per_page - 1) / self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_normalizes_to_defaults() {
        for (page, per_page) in [(0, 0), (-3, -1), (0, 10), (1, 0)] {
            assert_eq!(Pagination::new(page, per_page), Pagination::new(1, 10));
        }
    }

    #[test]
    fn test_offset_and_limit() {
        let page = Pagination::new(3, 25);
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
        assert_eq!(Pagination::default().offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Pagination::new(1, 10);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
        assert_eq!(page.total_pages(95), 10);
    }
}
