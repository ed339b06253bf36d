//! Query DTOs - Query string parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters for the admin user search
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct UserSearchQuery {
    pub search: Option<String>,
}

/// Query parameters for message pagination
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct MessagesQuery {
    #[serde(default)]
    pub before_date: Option<DateTime<Utc>>,
}

/// Limit/offset pagination
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    /// Clamped (limit, offset)
    pub fn bounds(&self) -> (i64, i64) {
        clamp_page(self.limit, self.offset)
    }
}

pub fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit
        .unwrap_or(PageQuery::DEFAULT_LIMIT)
        .clamp(1, PageQuery::MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(None, None), (50, 0));
        assert_eq!(clamp_page(Some(1000), Some(-5)), (100, 0));
        assert_eq!(clamp_page(Some(0), Some(20)), (1, 20));
    }
}
