use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timer windows, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Quiet period after the last content change before a pagination pass.
    pub pagination_debounce_ms: u64,
    /// Delay after a spacer update before pagination re-arms.
    pub pagination_settle_ms: u64,
    /// Debounce for recomputing the active format from the selection.
    pub selection_recompute_ms: u64,
    /// Delays at which a transition re-asserts its active format.
    pub format_reassert_ms: Vec<u64>,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            pagination_debounce_ms: 200,
            pagination_settle_ms: 100,
            selection_recompute_ms: 50,
            format_reassert_ms: vec![10, 50],
        }
    }
}

impl Timings {
    pub fn pagination_debounce(&self) -> Duration {
        Duration::from_millis(self.pagination_debounce_ms)
    }

    pub fn pagination_settle(&self) -> Duration {
        Duration::from_millis(self.pagination_settle_ms)
    }

    pub fn selection_recompute(&self) -> Duration {
        Duration::from_millis(self.selection_recompute_ms)
    }

    pub fn format_reasserts(&self) -> impl Iterator<Item = Duration> + '_ {
        self.format_reassert_ms
            .iter()
            .map(|millis| Duration::from_millis(*millis))
    }
}
