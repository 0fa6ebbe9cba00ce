use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Page size used when the client does not send `limit`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Hard ceiling on `limit`; larger values are clamped, not rejected.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameters accepted by every paginated list endpoint.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Rows per page
    pub limit: Option<u64>,
}

impl PaginationQuery {
    /// 1-based page number with the default applied. Zero is treated as one.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Rows per page with default and ceiling applied.
    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Zero-based page index for the ORM paginator.
    pub fn page_index(&self) -> u64 {
        self.page() - 1
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: None,
            limit: None,
        }
    }
}

/// Pagination block attached to every list response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(query: &PaginationQuery, total: u64) -> Self {
        let limit = query.limit();
        Self {
            page: query.page(),
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_query_is_empty() {
        let q = PaginationQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(q.page_index(), 0);
    }

    #[test]
    fn limit_is_clamped_to_ceiling() {
        let q = PaginationQuery {
            page: Some(2),
            limit: Some(5000),
        };
        assert_eq!(q.limit(), MAX_PAGE_SIZE);
        assert_eq!(q.page_index(), 1);
    }

    #[test]
    fn zero_values_fall_back_to_minimums() {
        let q = PaginationQuery {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        let q = PaginationQuery {
            page: Some(1),
            limit: Some(10),
        };
        let p = Pagination::new(&q, 21);
        assert_eq!(p.total_pages, 3);

        let empty = Pagination::new(&q, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn pagination_serializes_as_flat_object() {
        let q = PaginationQuery {
            page: Some(2),
            limit: Some(10),
        };
        let p = Pagination::new(&q, 35);
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page": 2, "limit": 10, "total": 35, "total_pages": 4})
        );
    }
}
