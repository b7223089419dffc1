use std::collections::BTreeSet;

use crate::editing::{Block, BlockKey, Document, Editor, UpdateTag};
use crate::error::EngineError;
use crate::pagination::layout::{Measure, page_breaks, sample_heights};
use crate::pagination::PageGeometry;

/// Result of one reconciliation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Installed spacers already match the computed breaks.
    Unchanged,
    /// One tagged update brought the spacers in line.
    Applied { inserted: usize, removed: usize },
}

/// For each installed spacer, the content block directly after it.
///
/// `None` marks a spacer that is trailing or followed by another spacer.
pub fn installed_anchors(doc: &Document) -> Vec<Option<BlockKey>> {
    let blocks = doc.blocks();
    blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.is_spacer())
        .map(|(index, _)| {
            blocks
                .get(index + 1)
                .filter(|next| !next.is_spacer())
                .map(Block::key)
        })
        .collect()
}

/// Whether exactly one spacer sits before each desired break and nowhere else.
pub fn is_reconciled(doc: &Document, breaks: &[BlockKey]) -> bool {
    let installed = installed_anchors(doc);
    installed.len() == breaks.len()
        && installed
            .iter()
            .zip(breaks)
            .all(|(installed, wanted)| *installed == Some(*wanted))
}

/// Brings the spacer set in line with `breaks`.
///
/// A spacer already sitting directly before a wanted break keeps its key;
/// every other spacer is removed and missing ones are inserted. Returns
/// `(inserted, removed)`.
pub fn apply_spacers(
    doc: &mut Document,
    breaks: &[BlockKey],
    offset_spacing: f64,
) -> Result<(usize, usize), EngineError> {
    let wanted: BTreeSet<BlockKey> = breaks.iter().copied().collect();
    let mut satisfied = BTreeSet::new();
    let mut stale = Vec::new();

    let blocks = doc.blocks();
    for (index, block) in blocks.iter().enumerate() {
        if !block.is_spacer() {
            continue;
        }
        let anchor = blocks
            .get(index + 1)
            .filter(|next| !next.is_spacer())
            .map(Block::key);
        match anchor {
            Some(anchor) if wanted.contains(&anchor) && satisfied.insert(anchor) => {}
            _ => stale.push(block.key()),
        }
    }

    for key in &stale {
        doc.remove(*key)?;
    }

    let mut inserted = 0;
    for key in breaks {
        if !satisfied.contains(key) {
            doc.insert_before(*key, Block::spacer(offset_spacing))?;
            inserted += 1;
        }
    }

    Ok((inserted, stale.len()))
}

/// Runs one measurement pass and reconciles spacers if the breaks moved.
///
/// The spacer update is atomic and tagged [`UpdateTag::PageBreakSpacer`];
/// on error the document is left exactly as it was.
pub fn reconcile(
    editor: &mut Editor,
    measure: &dyn Measure,
    geometry: &PageGeometry,
) -> Result<Reconciliation, EngineError> {
    let breaks = editor.read(|doc| {
        let samples = sample_heights(doc.blocks(), measure)?;
        Ok::<_, EngineError>(page_breaks(&samples, geometry))
    })?;

    if editor.read(|doc| is_reconciled(doc, &breaks)) {
        return Ok(Reconciliation::Unchanged);
    }

    let (inserted, removed) = editor.try_update([UpdateTag::PageBreakSpacer], |doc| {
        apply_spacers(doc, &breaks, geometry.offset_spacing)
    })?;

    log::debug!(
        "pagination: {} page break(s), {inserted} spacer(s) inserted, {removed} removed",
        breaks.len()
    );
    Ok(Reconciliation::Applied { inserted, removed })
}
