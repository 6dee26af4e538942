//! Pagination utilities for service layer
//!
//! `PageRequest` carries the raw zero-based `page`/`size` pair from callers and
//! checks it before anything reaches storage.

use crate::errors::ServiceError;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page: i64,
    /// items per page
    pub size: i64,
}

impl PageRequest {
    pub const DEFAULT_SIZE: i64 = 10;

    pub fn new(page: i64, size: i64) -> Self { Self { page, size } }

    /// Reject negative pages and empty pages, then convert to `u64`.
    /// There is no upper bound on `size`.
    pub fn validate(self) -> Result<(u64, u64), ServiceError> {
        if self.page < 0 {
            return Err(ServiceError::Validation("Page index must not be less than zero".into()));
        }
        if self.size < 1 {
            return Err(ServiceError::Validation("Page size must not be less than one".into()));
        }
        Ok((self.page as u64, self.size as u64))
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: 0, size: Self::DEFAULT_SIZE } }
}
