use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Page size used by `get_all` when no window is given.
pub const DEFAULT_QUERY_ALL_COUNT: u64 = 100;

/// Window over sequential token ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryAllParams {
    pub start: u64,
    pub count: u64,
}

impl Default for QueryAllParams {
    fn default() -> Self {
        Self {
            start: 0,
            count: DEFAULT_QUERY_ALL_COUNT,
        }
    }
}

impl QueryAllParams {
    pub fn new(start: u64, count: u64) -> Self {
        Self { start, count }
    }

    /// Ids covered by this window, clamped to `total`.
    pub fn range(&self, total: u64) -> Range<u64> {
        let end = self.start.saturating_add(self.count).min(total);
        self.start.min(end)..end
    }
}
