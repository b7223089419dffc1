use std::time::Duration;

use crate::editing::{Commit, Editor, UpdateTag};
use crate::pagination::reconcile::{Reconciliation, reconcile};
use crate::pagination::{Measure, PageGeometry};
use crate::timing::Timings;

/// What a due measurement pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Unchanged,
    Reconciled { inserted: usize, removed: usize },
    /// The pass failed and was rolled back; the next content change retries.
    Failed,
}

/// Debounced driver around [`reconcile`].
///
/// Content commits push the pass deadline out by the debounce window, so a
/// burst of edits yields a single pass. After a pass that changed spacers the
/// engine stays in its reconciling state for the settle window; commits that
/// arrive meanwhile are remembered and rescheduled once it re-arms.
#[derive(Debug, Clone)]
pub struct PaginationEngine {
    geometry: PageGeometry,
    debounce: Duration,
    settle: Duration,
    scheduled: Option<Duration>,
    reconciling: bool,
    rearm_at: Option<Duration>,
    missed: bool,
}

impl PaginationEngine {
    pub fn new(geometry: PageGeometry, timings: &Timings) -> Self {
        Self {
            geometry,
            debounce: timings.pagination_debounce(),
            settle: timings.pagination_settle(),
            scheduled: None,
            reconciling: false,
            rearm_at: None,
            missed: false,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn is_reconciling(&self) -> bool {
        self.reconciling
    }

    /// Reacts to one published commit.
    ///
    /// Commits carrying [`UpdateTag::PageBreakSpacer`] are the engine's own
    /// and are ignored, as are selection-only commits.
    pub fn on_commit(&mut self, commit: &Commit, now: Duration) {
        if commit.has_tag(UpdateTag::PageBreakSpacer) || !commit.content_changed {
            return;
        }
        if self.reconciling {
            self.missed = true;
            return;
        }
        self.schedule(now);
    }

    /// Replaces any pending deadline with `now + debounce`.
    pub fn schedule(&mut self, now: Duration) {
        self.scheduled = Some(now + self.debounce);
    }

    /// Earliest instant at which [`PaginationEngine::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.scheduled, self.rearm_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires whatever is due at `now`. Returns the outcome of the pass if one
    /// ran.
    pub fn tick(
        &mut self,
        editor: &mut Editor,
        measure: &dyn Measure,
        now: Duration,
    ) -> Option<PassOutcome> {
        if let Some(rearm) = self.rearm_at
            && now >= rearm
        {
            self.rearm_at = None;
            self.reconciling = false;
            if std::mem::take(&mut self.missed) {
                self.schedule(rearm);
            }
        }

        if self.reconciling {
            return None;
        }
        let due = self.scheduled.filter(|deadline| now >= *deadline)?;
        self.scheduled = None;
        self.reconciling = true;

        let outcome = match reconcile(editor, measure, &self.geometry) {
            Ok(Reconciliation::Unchanged) => {
                self.reconciling = false;
                PassOutcome::Unchanged
            }
            Ok(Reconciliation::Applied { inserted, removed }) => {
                self.rearm_at = Some(now + self.settle);
                PassOutcome::Reconciled { inserted, removed }
            }
            Err(err) => {
                log::error!("pagination pass due at {due:?} failed: {err}");
                self.reconciling = false;
                PassOutcome::Failed
            }
        };
        Some(outcome)
    }
}
