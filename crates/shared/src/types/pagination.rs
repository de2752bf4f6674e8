//! Offset pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameters for offset-paginated lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRequest {
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
    /// Number of items to return.
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    3
}

impl Default for OffsetRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            size: default_size(),
        }
    }
}

impl OffsetRequest {
    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the limit for database queries, capped at [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.size.min(MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
