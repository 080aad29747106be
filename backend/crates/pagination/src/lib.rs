//! Offset pagination primitives shared by directory backend endpoints.
//!
//! Endpoints accept a one-based `page` and a bounded `limit` and respond
//! with a [`Page`] envelope carrying the items plus [`PageMeta`] so clients
//! can render pagers without issuing an extra count query.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Page size applied when the client does not send one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Errors raised while validating pagination input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageParamsError {
    /// Pages are one-based; zero is rejected rather than silently clamped.
    #[error("page must be at least 1, got {0}")]
    PageOutOfRange(u32),
    /// A zero limit would make every response empty.
    #[error("limit must be at least 1, got {0}")]
    LimitOutOfRange(u32),
}

/// Validated pagination request parameters.
///
/// `limit` is clamped to [`MAX_LIMIT`] instead of being rejected so that
/// over-eager clients degrade gracefully, matching the HTTP surface's
/// documented behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    page: u32,
    limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    /// Validate a page/limit pair.
    ///
    /// # Errors
    ///
    /// Returns [`PageParamsError`] when either value is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageParamsError> {
        if page == 0 {
            return Err(PageParamsError::PageOutOfRange(page));
        }
        if limit == 0 {
            return Err(PageParamsError::LimitOutOfRange(limit));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_LIMIT),
        })
    }

    /// Build params from untrusted input, clamping instead of failing.
    ///
    /// Zero or missing values fall back to the first page and the default
    /// limit. This is the constructor HTTP handlers use.
    #[must_use]
    pub fn clamped(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// One-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size after clamping.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for SQL `OFFSET`/`skip` style queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Pagination metadata accompanying a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Total number of matching rows across all pages.
    pub total: u64,
    /// Number of pages at the current limit.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
}

/// One page of results plus its metadata envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    /// Items on this page, at most `meta.limit` of them.
    pub data: Vec<T>,
    /// Envelope metadata.
    pub pagination: PageMeta,
}

impl<T> Page<T> {
    /// Assemble a page envelope from fetched rows and the matching total.
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, params: PageParams) -> Self {
        let total_pages = total.div_ceil(u64::from(params.limit));
        let page = u64::from(params.page);
        Self {
            data,
            pagination: PageMeta {
                page: params.page,
                limit: params.limit,
                total,
                total_pages,
                has_next: page < total_pages,
                has_previous: params.page > 1 && total > 0,
            },
        }
    }

    /// Map the items of this page while keeping the metadata intact.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    fn offset_is_pages_skipped_times_limit(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: u64,
    ) {
        let params = PageParams::new(page, limit).expect("valid params");
        assert_eq!(params.offset(), expected);
    }

    #[rstest]
    fn zero_page_is_rejected() {
        assert_eq!(
            PageParams::new(0, 10),
            Err(PageParamsError::PageOutOfRange(0))
        );
    }

    #[rstest]
    fn zero_limit_is_rejected() {
        assert_eq!(
            PageParams::new(1, 0),
            Err(PageParamsError::LimitOutOfRange(0))
        );
    }

    #[rstest]
    fn oversized_limit_is_clamped() {
        let params = PageParams::new(1, 500).expect("valid params");
        assert_eq!(params.limit(), MAX_LIMIT);
    }

    #[rstest]
    fn clamped_treats_zero_as_defaults() {
        let params = PageParams::clamped(Some(0), Some(0));
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 1);

        let params = PageParams::clamped(None, None);
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), DEFAULT_LIMIT);
    }

    #[rstest]
    #[case(25, 1, 10, 3, true, false)]
    #[case(25, 3, 10, 3, false, true)]
    #[case(0, 1, 10, 0, false, false)]
    #[case(10, 1, 10, 1, false, false)]
    fn envelope_math_matches_totals(
        #[case] total: u64,
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total_pages: u64,
        #[case] has_next: bool,
        #[case] has_previous: bool,
    ) {
        let params = PageParams::new(page, limit).expect("valid params");
        let envelope = Page::new(vec![(); 0], total, params);
        assert_eq!(envelope.pagination.total_pages, total_pages);
        assert_eq!(envelope.pagination.has_next, has_next);
        assert_eq!(envelope.pagination.has_previous, has_previous);
    }

    #[rstest]
    fn map_preserves_metadata() {
        let params = PageParams::new(2, 2).expect("valid params");
        let page = Page::new(vec![1, 2], 5, params).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.total, 5);
    }

    #[rstest]
    fn envelope_serialises_camel_case() {
        let params = PageParams::default();
        let page = Page::new(vec![1], 1, params);
        let json = serde_json::to_value(&page).expect("serialises");
        assert!(json["pagination"]["totalPages"].is_u64());
        assert!(json["pagination"]["hasNext"].is_boolean());
    }
}
