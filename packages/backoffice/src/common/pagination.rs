//! Page-number pagination for back-office listings.
//!
//! # Usage
//!
//! ```rust,ignore
//! let page = PageRequest::new(2, 10).validate(&deps.paging)?;
//! let rows = fetch(page.limit(), page.offset()).await?;
//! let meta = PageMeta::new(&page, total);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{ModerationError, ModerationResult};

// ============================================================================
// Limits
// ============================================================================

/// Bounds applied to caller-supplied page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// Raw pagination input. `page` is 1-indexed; `limit` falls back to the
/// configured default when absent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Rejects `page < 1`, limits outside `1..=max_limit`, and pages whose
    /// offset does not fit in an `i64`.
    ///
    /// Out-of-range values are an error, not clamped: a listing UI that asks
    /// for page 0 has a bug worth surfacing.
    pub fn validate(&self, limits: &PagingLimits) -> ModerationResult<ValidatedPage> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ModerationError::validation(format!(
                "page must be at least 1 (got {})",
                page
            )));
        }

        let limit = self.limit.unwrap_or(limits.default_limit);
        if !(1..=limits.max_limit).contains(&limit) {
            return Err(ModerationError::validation(format!(
                "limit must be between 1 and {} (got {})",
                limits.max_limit, limit
            )));
        }

        let offset = (page - 1).checked_mul(limit).ok_or_else(|| {
            ModerationError::validation(format!(
                "page {} is out of range for limit {}",
                page, limit
            ))
        })?;

        Ok(ValidatedPage {
            page,
            limit,
            offset,
        })
    }
}

/// Pagination input that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPage {
    page: i64,
    limit: i64,
    offset: i64,
}

impl ValidatedPage {
    pub fn page(&self) -> i64 {
        self.page
    }

    /// SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

// ============================================================================
// Response
// ============================================================================

/// Pagination metadata returned alongside every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    /// Full filtered count, not the size of this page.
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn new(page: &ValidatedPage, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page.limit - 1) / page.limit
        };

        PageMeta {
            page: page.page,
            limit: page.limit,
            total,
            total_pages,
            has_next: page.page < total_pages,
            has_prev: page.page > 1,
        }
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}
