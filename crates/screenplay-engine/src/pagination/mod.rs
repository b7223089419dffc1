/*!
# Pagination

Simulated page breaks for a continuously scrolling document.

A pass measures every content block, walks them accumulating height against
the [`PageGeometry`] budget and records which blocks must start a new page.
Spacer blocks are then reconciled against that list in one tagged update.
[`PaginationEngine`] debounces passes against the stream of editor commits.
*/

pub mod engine;
pub mod geometry;
pub mod layout;
pub mod overlay;
pub mod reconcile;

pub use engine::{PaginationEngine, PassOutcome};
pub use geometry::PageGeometry;
pub use layout::{Measure, MeasurementSample, page_breaks, sample_heights};
pub use overlay::{PageOverlay, page_count, page_overlays};
pub use reconcile::{Reconciliation, reconcile};
