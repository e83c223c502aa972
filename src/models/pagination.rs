//! Pagination primitives shared across all list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters (`?pageNumber=2&pageSize=10`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Maximum items per page.
    pub const MAX_PAGE_SIZE: i64 = 50;

    /// Default items per page.
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    /// Effective page size. Values below 1 fall back to the default rather
    /// than being clamped to 1; values above the cap are clamped to the cap.
    pub fn page_size(&self) -> i64 {
        match self.page_size {
            Some(size) if size >= 1 => size.min(Self::MAX_PAGE_SIZE),
            _ => Self::DEFAULT_PAGE_SIZE,
        }
    }

    /// Effective 1-based page number; values below 1 clamp to 1.
    pub fn page_number(&self) -> i64 {
        self.page_number.unwrap_or(1).max(1)
    }

    /// SQL LIMIT for the item window.
    pub fn limit(&self) -> i64 {
        self.page_size()
    }

    /// SQL OFFSET for the item window `[(page-1)*size, page*size)`.
    pub fn offset(&self) -> i64 {
        (self.page_number() - 1) * self.page_size()
    }
}

/// Page metadata computed fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageMetadata {
    /// Compute metadata for a total row count under the given parameters.
    ///
    /// A page beyond the end yields an empty window with correct metadata,
    /// not an error. `total_count == 0` means zero pages and no prev/next.
    pub fn compute(total_count: i64, params: &PageParams) -> Self {
        let page_size = params.page_size();
        let current_page = params.page_number();
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + page_size - 1) / page_size
        };
        Self {
            total_count,
            page_size,
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

/// JSON payload of the `Pagination` response header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationHeader<'a> {
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub previous_page_link: Option<&'a str>,
    pub next_page_link: Option<&'a str>,
}

impl<'a> PaginationHeader<'a> {
    pub fn new(
        meta: &PageMetadata,
        previous_page_link: Option<&'a str>,
        next_page_link: Option<&'a str>,
    ) -> Self {
        Self {
            total_count: meta.total_count,
            page_size: meta.page_size,
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            previous_page_link,
            next_page_link,
        }
    }

    /// Serialize to the single-line JSON header value.
    pub fn to_header_value(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, size: i64) -> PageParams {
        PageParams {
            page_number: Some(page),
            page_size: Some(size),
        }
    }

    #[test]
    fn defaults_when_unset() {
        let p = PageParams::default();
        assert_eq!(p.page_number(), 1);
        assert_eq!(p.page_size(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn page_size_below_one_falls_back_to_default() {
        assert_eq!(params(1, 0).page_size(), 10);
        assert_eq!(params(1, -3).page_size(), 10);
    }

    #[test]
    fn page_size_clamps_to_cap() {
        assert_eq!(params(1, 500).page_size(), 50);
    }

    #[test]
    fn page_number_clamps_to_one() {
        assert_eq!(params(-2, 10).page_number(), 1);
        assert_eq!(params(-2, 10).offset(), 0);
    }

    #[test]
    fn boundary_page() {
        let p = params(3, 10);
        let meta = PageMetadata::compute(23, &p);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_previous);
        assert!(!meta.has_next);
        assert_eq!(p.offset(), 20);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn empty_result_set() {
        let meta = PageMetadata::compute(0, &params(1, 10));
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_previous);
        assert!(!meta.has_next);
    }

    #[test]
    fn page_beyond_end_is_not_an_error() {
        let p = params(9, 10);
        let meta = PageMetadata::compute(23, &p);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_previous);
        assert!(!meta.has_next);
        assert_eq!(p.offset(), 80);
    }

    #[test]
    fn header_value_shape() {
        let meta = PageMetadata::compute(23, &params(2, 10));
        let header = PaginationHeader::new(
            &meta,
            Some("/api/v1/categories?pageNumber=1&pageSize=10"),
            Some("/api/v1/categories?pageNumber=3&pageSize=10"),
        );
        let json: serde_json::Value = serde_json::from_str(&header.to_header_value()).unwrap();
        assert_eq!(json["totalCount"], 23);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(
            json["previousPageLink"],
            "/api/v1/categories?pageNumber=1&pageSize=10"
        );
    }
}
