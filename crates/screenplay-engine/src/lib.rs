pub mod blocks;
pub mod editing;
pub mod error;
pub mod format_state;
pub mod pagination;
pub mod session;
pub mod timing;
pub mod transition;

// Re-export key types for easier usage
pub use blocks::{Alignment, BlockKind, CasingPolicy, Presentation};
pub use editing::{Block, BlockKey, Commit, Document, Editor, Point, Selection, TextRun, UpdateTag};
pub use error::EngineError;
pub use format_state::FormatState;
pub use pagination::{Measure, PageGeometry, PageOverlay, PaginationEngine, PassOutcome};
pub use session::{ScreenplaySession, TickReport};
pub use timing::Timings;
pub use transition::TransitionOutcome;
