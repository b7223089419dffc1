//! Forced-uppercase normalisation for casing-sensitive blocks.
//!
//! Runs inside every editor update, after the mutator and before the commit
//! is published, so anything measuring the document sees final casing.

use std::sync::LazyLock;

use regex::Regex;

use crate::blocks::CasingPolicy;
use crate::editing::document::{Block, Document, Point};

static LOWERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Ll}").expect("lowercase pattern is valid"));

/// Uppercased copy of `text`, or `None` when there is nothing to change.
pub fn uppercased(text: &str) -> Option<String> {
    LOWERCASE
        .is_match(text)
        .then(|| text.to_uppercase())
}

/// Applies the block's casing policy to each of its runs.
///
/// Returns whether any run was rewritten.
pub fn enforce(block: &mut Block) -> bool {
    if block.kind().casing() != CasingPolicy::ForceUppercase {
        return false;
    }

    let mut changed = false;
    for run in block.runs_mut() {
        if let Some(upper) = uppercased(run.text()) {
            run.set_text(upper);
            changed = true;
        }
    }
    changed
}

/// Char offset that `offset` lands on once [`enforce`] has rewritten `block`.
///
/// Uppercasing can lengthen text (`ß` becomes `SS`), so the caret is moved
/// past the full expansion of every character before it.
fn cased_offset(block: &Block, offset: usize) -> usize {
    let mut remaining = offset;
    let mut mapped = 0;
    for run in block.runs() {
        if remaining == 0 {
            break;
        }
        let rewritten = LOWERCASE.is_match(run.text());
        for c in run.text().chars().take(remaining) {
            mapped += if rewritten { c.to_uppercase().count() } else { 1 };
        }
        remaining = remaining.saturating_sub(run.text().chars().count());
    }
    mapped
}

/// Enforces casing on every block whose text changed since the last pass.
pub(crate) fn enforce_dirty(doc: &mut Document) -> usize {
    let anchor = doc.selection().map(|selection| selection.anchor);
    let mut rewritten = 0;
    for key in doc.take_dirty() {
        let Some(block) = doc.block_mut(key) else {
            continue;
        };
        let caret = anchor
            .filter(|anchor| anchor.key == key)
            .map(|anchor| cased_offset(block, anchor.offset));
        if !enforce(block) {
            continue;
        }
        rewritten += 1;
        if let Some(offset) = caret
            && let Err(err) = doc.select(Point::new(key, offset))
        {
            log::warn!("caret not restored after casing: {err}");
        }
    }
    if rewritten > 0 {
        doc.clamp_selection();
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::editing::document::TextRun;
    use crate::editing::{Editor, UpdateTag};
    use rstest::rstest;

    #[rstest]
    #[case(BlockKind::SceneHeading, "INT. OFFICE - DAY")]
    #[case(BlockKind::Character, "INT. OFFICE - DAY")]
    #[case(BlockKind::Transition, "INT. OFFICE - DAY")]
    #[case(BlockKind::Shot, "INT. OFFICE - DAY")]
    #[case(BlockKind::Action, "int. office - day")]
    #[case(BlockKind::Dialogue, "int. office - day")]
    #[case(BlockKind::Parenthetical, "int. office - day")]
    fn test_enforce_by_kind(#[case] kind: BlockKind, #[case] expected: &str) {
        let mut block = Block::with_text(kind, "int. office - day");
        enforce(&mut block);
        assert_eq!(block.text(), expected);
    }

    #[test]
    fn test_enforce_is_idempotent() {
        let mut block = Block::with_text(BlockKind::SceneHeading, "EXT. ROOFTOP - NIGHT");
        assert!(!enforce(&mut block));
        assert_eq!(block.text(), "EXT. ROOFTOP - NIGHT");
    }

    #[test]
    fn test_enforce_preserves_run_boundaries() {
        let mut block = Block::with_runs(
            BlockKind::Character,
            vec![TextRun::new("mary "), TextRun::new("(v.o.)")],
        );
        assert!(enforce(&mut block));
        let runs: Vec<&str> = block.runs().iter().map(TextRun::text).collect();
        assert_eq!(runs, vec!["MARY ", "(V.O.)"]);
    }

    #[test]
    fn test_uppercased_ignores_non_letters() {
        assert_eq!(uppercased("123 - !"), None);
        assert_eq!(uppercased("élan"), Some("ÉLAN".to_string()));
    }

    #[test]
    fn test_expanding_uppercase_keeps_typing_in_order() {
        let block = Block::new(BlockKind::SceneHeading);
        let key = block.key();
        let mut editor = Editor::new(Document::from_blocks(vec![block]));
        editor.update([UpdateTag::Selection], |doc| doc.select_start(key)).unwrap();

        for c in ["s", "t", "r", "a", "ß", "e"] {
            editor.update([UpdateTag::Typing], |doc| doc.insert_text(c)).unwrap();
        }

        assert_eq!(editor.document().blocks()[0].text(), "STRASSE");
        assert_eq!(editor.selection().unwrap().anchor, Point::new(key, 7));
    }

    #[test]
    fn test_expansion_before_caret_shifts_it_mid_text() {
        let block = Block::with_text(BlockKind::Character, "GROSS");
        let key = block.key();
        let mut editor = Editor::new(Document::from_blocks(vec![block]));
        editor
            .update([UpdateTag::Selection], |doc| doc.select(Point::new(key, 3)))
            .unwrap();

        // "GRO" + "ß" + "SS": the caret follows the expanded "SS".
        editor.update([UpdateTag::Typing], |doc| doc.insert_text("ß")).unwrap();

        assert_eq!(editor.document().blocks()[0].text(), "GROSSSS");
        assert_eq!(editor.selection().unwrap().anchor, Point::new(key, 5));
    }

    #[test]
    fn test_enforce_dirty_only_touches_dirty_blocks() {
        let mut doc = Document::from_blocks(vec![Block::with_text(BlockKind::Shot, "close on")]);
        assert_eq!(enforce_dirty(&mut doc), 1);
        assert_eq!(doc.blocks()[0].text(), "CLOSE ON");
        assert_eq!(enforce_dirty(&mut doc), 0);
    }
}
