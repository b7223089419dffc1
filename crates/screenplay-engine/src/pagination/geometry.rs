use serde::{Deserialize, Serialize};

/// Simulated page dimensions in layout pixels (96 per inch).
///
/// Defaults describe US Letter with 1" top and bottom margins: 9" of
/// content per page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Content-height budget of one page.
    pub content_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Visual gap between two pages.
    pub page_gap: f64,
    /// Overflow tolerated past the budget before a block is pushed to the
    /// next page.
    pub overflow_slack: f64,
    /// Padding above the first page inside the scrolling surface.
    pub container_padding: f64,
    /// Extra height added to every inserted spacer.
    pub offset_spacing: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            content_height: 864.0,
            margin_top: 96.0,
            margin_bottom: 96.0,
            page_gap: 40.0,
            overflow_slack: 16.0,
            container_padding: 20.0,
            offset_spacing: 0.0,
        }
    }
}

impl PageGeometry {
    /// Full height of one printed page, margins included.
    pub fn page_height(&self) -> f64 {
        self.content_height + self.margin_top + self.margin_bottom
    }

    /// Rendered height of a spacer: the bottom margin of one page, the gap,
    /// and the top margin of the next.
    pub fn spacer_height(&self, offset_spacing: f64) -> f64 {
        self.margin_bottom + self.margin_top + self.page_gap + offset_spacing
    }

    /// Running page height beyond which the next block starts a new page.
    pub fn break_threshold(&self) -> f64 {
        self.content_height + self.margin_top + self.overflow_slack
    }
}
