use std::collections::HashMap;
use std::time::Duration;

use pretty_assertions::assert_eq;
use screenplay_engine::pagination::reconcile::installed_anchors;
use screenplay_engine::{
    BlockKey, BlockKind, Document, Measure, PageGeometry, PassOutcome, ScreenplaySession, Timings,
};

/// Rendering surface stand-in: every content block has the same height.
struct SyntheticSurface {
    heights: HashMap<BlockKey, f64>,
    total: f64,
}

impl SyntheticSurface {
    fn of(doc: &Document, block_height: f64, geometry: &PageGeometry) -> Self {
        let heights: HashMap<_, _> = doc
            .blocks()
            .iter()
            .map(|block| {
                let height = if block.is_spacer() {
                    geometry.spacer_height(block.offset_spacing())
                } else {
                    block_height
                };
                (block.key(), height)
            })
            .collect();
        let total = heights.values().sum();
        Self { heights, total }
    }
}

impl Measure for SyntheticSurface {
    fn rendered_height(&self, key: BlockKey) -> Option<f64> {
        self.heights.get(&key).copied()
    }

    fn content_height(&self) -> Option<f64> {
        Some(self.total)
    }
}

/// Logical clock advancing 5ms per input event.
struct Clock(u64);

impl Clock {
    fn next(&mut self) -> Duration {
        self.0 += 5;
        Duration::from_millis(self.0)
    }
}

/// Fires deadlines in order until the session goes idle.
fn settle(session: &mut ScreenplaySession, block_height: f64) -> Vec<PassOutcome> {
    let mut passes = Vec::new();
    for _ in 0..32 {
        let Some(deadline) = session.next_deadline() else {
            return passes;
        };
        let surface = SyntheticSurface::of(session.document(), block_height, session.geometry());
        let report = session.tick(deadline, &surface);
        passes.extend(report.pagination);
    }
    panic!("session never went idle");
}

fn write_short_scene(session: &mut ScreenplaySession, clock: &mut Clock) {
    session.format_block(BlockKind::SceneHeading, clock.next());
    session.type_text("int. office - day", clock.next()).unwrap();
    session.press_enter(clock.next());
    session.type_text("Maya paces.", clock.next()).unwrap();
    session.press_enter(clock.next());
    session.format_block(BlockKind::Character, clock.next());
    session.type_text("maya", clock.next()).unwrap();
    session.press_enter(clock.next());
    session.format_block(BlockKind::Parenthetical, clock.next());
    session.type_text("beat", clock.next()).unwrap();
    session.press_enter(clock.next());
    session.type_text("We're late.", clock.next()).unwrap();
    for line in 1..=6 {
        session.press_enter(clock.next());
        session.type_text(&format!("Line {line}"), clock.next()).unwrap();
    }
}

fn new_session() -> ScreenplaySession {
    ScreenplaySession::new(PageGeometry::default(), &Timings::default())
}

#[test]
fn test_writing_a_scene_paginates_once_edits_settle() {
    let mut session = new_session();
    let mut clock = Clock(0);

    write_short_scene(&mut session, &mut clock);
    assert_eq!(session.document().spacers().count(), 0);

    let passes = settle(&mut session, 100.0);

    assert_eq!(passes, vec![PassOutcome::Reconciled { inserted: 1, removed: 0 }]);
    insta::assert_snapshot!(session.document().outline(), @r"
    scene-heading: INT. OFFICE - DAY
    action: Maya paces.
    character: MAYA
    parenthetical: (beat)
    dialogue: We're late.
    action: Line 1
    action: Line 2
    action: Line 3
    --- page break ---
    action: Line 4
    action: Line 5
    action: Line 6
    ");
    assert_eq!(session.active_format(), BlockKind::Action);
}

#[test]
fn test_shrinking_content_removes_the_break() {
    let mut session = new_session();
    let mut clock = Clock(0);
    write_short_scene(&mut session, &mut clock);
    settle(&mut session, 100.0);

    session.type_text("!", clock.next() + Duration::from_secs(1)).unwrap();
    let passes = settle(&mut session, 50.0);

    assert_eq!(passes, vec![PassOutcome::Reconciled { inserted: 0, removed: 1 }]);
    assert!(installed_anchors(session.document()).is_empty());
}

#[test]
fn test_settled_document_is_left_alone() {
    let mut session = new_session();
    let mut clock = Clock(0);
    write_short_scene(&mut session, &mut clock);
    settle(&mut session, 100.0);
    let before = session.document().clone();

    session.type_text("?", clock.next() + Duration::from_secs(1)).unwrap();
    let passes = settle(&mut session, 100.0);

    assert_eq!(passes, vec![PassOutcome::Unchanged]);
    assert_eq!(
        session.document().spacers().map(|b| b.key()).collect::<Vec<_>>(),
        before.spacers().map(|b| b.key()).collect::<Vec<_>>()
    );
}

#[test]
fn test_transition_format_survives_both_debounces() {
    let mut session = new_session();
    let mut clock = Clock(0);
    session.format_block(BlockKind::Character, clock.next());
    session.type_text("maya", clock.next()).unwrap();

    let enter_at = clock.next();
    session.press_enter(enter_at);
    assert_eq!(session.active_format(), BlockKind::Dialogue);

    // Only the format timers; pagination has nothing to break here.
    settle(&mut session, 20.0);

    assert_eq!(session.active_format(), BlockKind::Dialogue);
    assert_eq!(session.document().outline(), "character: MAYA\ndialogue");
}

#[test]
fn test_page_overlays_follow_content_height() {
    let mut session = new_session();
    let mut clock = Clock(0);
    write_short_scene(&mut session, &mut clock);
    settle(&mut session, 100.0);

    let surface = SyntheticSurface::of(session.document(), 100.0, session.geometry());
    let overlays = session.page_overlays(&surface);

    // 11 blocks of 100 plus one 232px spacer.
    assert_eq!(session.page_count(&surface), 2);
    assert_eq!(overlays.len(), 2);
    assert!(overlays.iter().all(|overlay| !overlay.show_number));
    assert_eq!(overlays[1].top, 1116.0);
}
