//! Page count and page decoration rectangles.
//!
//! This is a coarse view derived from the total content height alone. Spacer
//! positions remain the source of truth for where a break visually falls;
//! the two can drift by a few pixels.

use crate::pagination::PageGeometry;

/// Pages numbered from here on; the first two pages carry no number.
pub const FIRST_NUMBERED_PAGE: usize = 3;

/// One page's decoration rectangle within the scrolling surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageOverlay {
    /// 1-based page number.
    pub number: usize,
    pub top: f64,
    pub height: f64,
    pub show_number: bool,
}

/// Number of pages needed for `total_height` of content, at least one.
pub fn page_count(total_height: f64, geometry: &PageGeometry) -> usize {
    if !total_height.is_finite() || total_height <= 0.0 || geometry.content_height <= 0.0 {
        return 1;
    }
    ((total_height / geometry.content_height).ceil() as usize).max(1)
}

pub fn page_overlays(page_count: usize, geometry: &PageGeometry) -> Vec<PageOverlay> {
    let stride = geometry.page_height() + geometry.page_gap;
    (0..page_count)
        .map(|index| {
            let number = index + 1;
            PageOverlay {
                number,
                top: index as f64 * stride + geometry.container_padding,
                height: geometry.page_height(),
                show_number: number >= FIRST_NUMBERED_PAGE,
            }
        })
        .collect()
}
