//! Offset pagination.

use serde::Deserialize;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// `skip`/`limit` window over a listing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl Page {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }

    /// Clamp to `skip >= 0` and `1 <= limit <= MAX_PAGE_SIZE`.
    pub fn normalized(self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps() {
        let page = Page::new(-5, 1_000).normalized();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(Page::new(3, 0).normalized().limit, 1);
    }

    #[test]
    fn test_defaults_from_empty_query() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 10);
    }
}
