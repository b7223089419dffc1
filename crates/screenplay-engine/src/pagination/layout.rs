use std::collections::HashMap;

use crate::editing::{Block, BlockKey};
use crate::error::EngineError;
use crate::pagination::PageGeometry;

/// Height queries against the rendering surface.
///
/// A host answers from real layout; tests answer from fixed numbers.
pub trait Measure {
    /// Rendered height of a block including its vertical margins, or `None`
    /// when the block has not been laid out yet.
    fn rendered_height(&self, key: BlockKey) -> Option<f64>;

    /// Total rendered height of the content area, used for the page count.
    fn content_height(&self) -> Option<f64> {
        None
    }
}

impl Measure for HashMap<BlockKey, f64> {
    fn rendered_height(&self, key: BlockKey) -> Option<f64> {
        self.get(&key).copied()
    }
}

/// One content block's measured height for a single pagination pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSample {
    pub key: BlockKey,
    pub height: f64,
}

/// Measures every content block, skipping spacers and blocks the surface
/// has not rendered yet.
///
/// A negative or non-finite height fails the whole pass.
pub fn sample_heights<'a>(
    blocks: impl IntoIterator<Item = &'a Block>,
    measure: &dyn Measure,
) -> Result<Vec<MeasurementSample>, EngineError> {
    let mut skipped = 0;
    let mut samples = Vec::new();
    for block in blocks.into_iter().filter(|block| !block.is_spacer()) {
        let Some(height) = measure.rendered_height(block.key()) else {
            skipped += 1;
            continue;
        };
        if !height.is_finite() || height < 0.0 {
            return Err(EngineError::InvalidMeasurement(block.key()));
        }
        samples.push(MeasurementSample {
            key: block.key(),
            height,
        });
    }

    if skipped > 0 {
        log::debug!("pagination: {skipped} block(s) not rendered yet, skipped");
    }
    Ok(samples)
}

/// Keys of the blocks that must start a new page, in document order.
///
/// The running height starts at the top margin. A block that would push it
/// past [`PageGeometry::break_threshold`] starts a new page, unless the
/// current page is still empty: an oversized block on an empty page stays
/// put rather than leaving a blank page behind it.
pub fn page_breaks(samples: &[MeasurementSample], geometry: &PageGeometry) -> Vec<BlockKey> {
    let mut breaks = Vec::new();
    let mut page_height = geometry.margin_top;

    for sample in samples {
        let would_exceed = page_height + sample.height > geometry.break_threshold();
        if would_exceed && page_height > geometry.margin_top {
            breaks.push(sample.key);
            page_height = geometry.margin_top + sample.height;
        } else {
            page_height += sample.height;
        }
    }

    breaks
}
