//! Response envelope shared by every successful endpoint.
//!
//! Success responses wrap their payload as `{success, data, timestamp}`;
//! paginated listings add a `meta` block. Failures bypass this module
//! and serialise the domain [`crate::domain::Error`] directly.

use chrono::{DateTime, Utc};
use pagination::{Page, PageMeta};
use serde::Serialize;
use utoipa::ToSchema;

/// Envelope for a single-payload success response.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Envelope<T> {
    /// Always `true`; failures serialise the error type instead.
    pub success: bool,
    /// The endpoint's payload.
    pub data: T,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T> Envelope<T> {
    /// Wrap a payload with the current timestamp.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Envelope for a paginated success response.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PagedEnvelope<T> {
    /// Always `true`; failures serialise the error type instead.
    pub success: bool,
    /// One page of items.
    pub data: Vec<T>,
    /// Pagination bookkeeping for the client.
    pub meta: PageMeta,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T> PagedEnvelope<T> {
    /// Wrap a page with the current timestamp.
    pub fn new(page: Page<T>) -> Self {
        Self {
            success: true,
            data: page.data,
            meta: page.pagination,
            timestamp: Utc::now(),
        }
    }
}
