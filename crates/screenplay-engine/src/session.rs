use std::time::Duration;

use crate::blocks::BlockKind;
use crate::editing::{Document, Editor, Point, UpdateTag};
use crate::error::EngineError;
use crate::format_state::FormatState;
use crate::pagination::{
    Measure, PageGeometry, PageOverlay, PaginationEngine, PassOutcome, page_count, page_overlays,
};
use crate::timing::Timings;
use crate::transition::{self, TransitionOutcome};

/// One editing session: the editor plus the listeners fed by its commits.
///
/// The host forwards input through the command methods, renders, and calls
/// [`ScreenplaySession::tick`] with a [`Measure`] over the fresh layout
/// whenever [`ScreenplaySession::next_deadline`] comes due. `now` is always
/// time since the session started.
#[derive(Debug)]
pub struct ScreenplaySession {
    editor: Editor,
    pagination: PaginationEngine,
    format: FormatState,
}

/// Effects of one [`ScreenplaySession::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub pagination: Option<PassOutcome>,
    pub format_changed: Option<BlockKind>,
}

impl ScreenplaySession {
    pub fn new(geometry: PageGeometry, timings: &Timings) -> Self {
        Self::with_document(Document::new(), geometry, timings)
    }

    pub fn with_document(document: Document, geometry: PageGeometry, timings: &Timings) -> Self {
        let mut session = Self {
            editor: Editor::new(document),
            pagination: PaginationEngine::new(geometry, timings),
            format: FormatState::new(timings),
        };
        session.pagination.schedule(Duration::ZERO);
        session
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.pagination.geometry()
    }

    pub fn active_format(&self) -> BlockKind {
        self.format.active()
    }

    pub fn press_enter(&mut self, now: Duration) -> TransitionOutcome {
        let outcome = self
            .editor
            .update([UpdateTag::Transition], transition::press_enter);
        self.apply_outcome(outcome, now)
    }

    pub fn format_block(&mut self, kind: BlockKind, now: Duration) -> TransitionOutcome {
        let outcome = self
            .editor
            .update([UpdateTag::Reformat], |doc| transition::format_block(doc, kind));
        self.apply_outcome(outcome, now)
    }

    pub fn type_text(&mut self, text: &str, now: Duration) -> Result<(), EngineError> {
        let result = self
            .editor
            .try_update([UpdateTag::Typing], |doc| doc.insert_text(text));
        self.dispatch_commits(now);
        result
    }

    pub fn delete_backward(&mut self, now: Duration) -> Result<(), EngineError> {
        let result = self
            .editor
            .try_update([UpdateTag::Typing], Document::delete_backward);
        self.dispatch_commits(now);
        result
    }

    pub fn set_selection(&mut self, point: Point, now: Duration) -> Result<(), EngineError> {
        let result = self
            .editor
            .try_update([UpdateTag::Selection], |doc| doc.select(point));
        self.dispatch_commits(now);
        result
    }

    /// Earliest instant at which [`ScreenplaySession::tick`] has work.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.pagination.next_deadline(), self.format.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires every timer due at `now`.
    pub fn tick(&mut self, now: Duration, measure: &dyn Measure) -> TickReport {
        let pagination = self.pagination.tick(&mut self.editor, measure, now);
        self.dispatch_commits(now);

        let editor = &self.editor;
        let format_changed = self
            .format
            .tick(now, || editor.read(|doc| doc.anchor_block().map(|b| b.kind())));

        TickReport {
            pagination,
            format_changed,
        }
    }

    /// Page count from the surface's total content height.
    pub fn page_count(&self, measure: &dyn Measure) -> usize {
        page_count(measure.content_height().unwrap_or(0.0), self.geometry())
    }

    pub fn page_overlays(&self, measure: &dyn Measure) -> Vec<PageOverlay> {
        page_overlays(self.page_count(measure), self.geometry())
    }

    fn apply_outcome(&mut self, outcome: TransitionOutcome, now: Duration) -> TransitionOutcome {
        if let Some(kind) = outcome.applied_kind() {
            self.format.assert_priority(kind, now);
        }
        self.dispatch_commits(now);
        outcome
    }

    fn dispatch_commits(&mut self, now: Duration) {
        for commit in self.editor.drain_commits() {
            self.pagination.on_commit(&commit, now);
            self.format.on_commit(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Block;
    use pretty_assertions::assert_eq;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn session_with_caret(kind: BlockKind, text: &str) -> ScreenplaySession {
        let block = Block::with_text(kind, text);
        let key = block.key();
        let mut session = ScreenplaySession::with_document(
            Document::from_blocks(vec![block]),
            PageGeometry::default(),
            &Timings::default(),
        );
        session
            .set_selection(Point::new(key, text.chars().count()), ms(0))
            .unwrap();
        session
    }

    #[test]
    fn test_enter_sets_active_format_synchronously() {
        let mut session = session_with_caret(BlockKind::Character, "MAYA");

        session.press_enter(ms(0));

        assert_eq!(session.active_format(), BlockKind::Dialogue);
        assert_eq!(session.document().outline(), "character: MAYA\ndialogue");
    }

    #[test]
    fn test_reformat_noop_keeps_active_format() {
        let mut session = ScreenplaySession::new(PageGeometry::default(), &Timings::default());
        let outcome = session.format_block(BlockKind::Spacer, ms(0));

        assert_eq!(outcome, TransitionOutcome::NoOp);
        assert_eq!(session.active_format(), BlockKind::Action);
    }

    #[test]
    fn test_typing_without_selection_is_an_error_and_publishes_nothing() {
        let mut session = ScreenplaySession::new(PageGeometry::default(), &Timings::default());

        assert_eq!(session.type_text("x", ms(0)), Err(EngineError::NoSelection));
        assert_eq!(session.editor().version(), 0);
    }

    #[test]
    fn test_next_deadline_is_the_earliest_timer() {
        let mut session = session_with_caret(BlockKind::Action, "x");
        session.press_enter(ms(100));

        assert_eq!(session.next_deadline(), Some(ms(110)));
    }
}
