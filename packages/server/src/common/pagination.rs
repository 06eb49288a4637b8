//! Offset pagination for list endpoints (`?skip=&limit=`).

use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 500;

/// Raw query-string arguments as sent by clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationArgs {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Pagination arguments after validation, ready for `OFFSET`/`LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPagination {
    pub offset: i64,
    pub limit: i64,
}

impl PaginationArgs {
    pub fn validate(&self) -> Result<ValidatedPagination, &'static str> {
        let offset = self.skip.unwrap_or(0);
        if offset < 0 {
            return Err("skip must not be negative");
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit < 1 {
            return Err("limit must be at least 1");
        }

        Ok(ValidatedPagination {
            offset,
            limit: limit.min(MAX_LIMIT),
        })
    }
}
