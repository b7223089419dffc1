//! Active format: the block kind a toolbar would highlight.
//!
//! Two producers write it. The transition engine asserts a kind directly and
//! re-asserts it after each configured delay; every editor commit also
//! schedules a recompute from the kind of the block under the caret. A
//! priority assertion pins the value until its last re-assert, and a
//! recompute falling due inside that pin is dropped.

use std::time::Duration;

use crate::blocks::BlockKind;
use crate::timing::Timings;

#[derive(Debug, Clone)]
pub struct FormatState {
    active: BlockKind,
    pinned_until: Option<Duration>,
    reasserts: Vec<(Duration, BlockKind)>,
    recompute_at: Option<Duration>,
    recompute_delay: Duration,
    reassert_delays: Vec<Duration>,
}

impl FormatState {
    pub fn new(timings: &Timings) -> Self {
        Self {
            active: BlockKind::Action,
            pinned_until: None,
            reasserts: Vec::new(),
            recompute_at: None,
            recompute_delay: timings.selection_recompute(),
            reassert_delays: timings.format_reasserts().collect(),
        }
    }

    pub fn active(&self) -> BlockKind {
        self.active
    }

    /// Sets the active format now and schedules its re-asserts.
    pub fn assert_priority(&mut self, kind: BlockKind, now: Duration) {
        self.active = kind;
        self.reasserts = self
            .reassert_delays
            .iter()
            .map(|delay| (now + *delay, kind))
            .collect();
        self.pinned_until = Some(
            self.reasserts
                .iter()
                .map(|(at, _)| *at)
                .max()
                .unwrap_or(now),
        );
    }

    /// Schedules a selection-driven recompute, replacing any pending one.
    pub fn on_commit(&mut self, now: Duration) {
        self.recompute_at = Some(now + self.recompute_delay);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.reasserts
            .iter()
            .map(|(at, _)| *at)
            .chain(self.recompute_at)
            .min()
    }

    /// Fires everything due at `now`.
    ///
    /// `resolve` yields the kind of the block holding the caret; it is only
    /// called when a recompute actually runs. Returns the new active format
    /// when it changed.
    pub fn tick(
        &mut self,
        now: Duration,
        resolve: impl FnOnce() -> Option<BlockKind>,
    ) -> Option<BlockKind> {
        let before = self.active;

        let (due, pending): (Vec<_>, Vec<_>) =
            self.reasserts.drain(..).partition(|(at, _)| *at <= now);
        self.reasserts = pending;
        if let Some((_, kind)) = due.last() {
            self.active = *kind;
        }

        if let Some(at) = self.recompute_at
            && at <= now
        {
            self.recompute_at = None;
            if self.pinned_until.is_some_and(|pin| at <= pin) {
                log::debug!("selection recompute at {at:?} superseded by asserted format");
            } else {
                self.active = resolve()
                    .filter(|kind| !kind.is_spacer())
                    .unwrap_or(BlockKind::Action);
            }
        }

        if self.reasserts.is_empty() && self.pinned_until.is_some_and(|pin| pin < now) {
            self.pinned_until = None;
        }

        (self.active != before).then_some(self.active)
    }
}
