use std::sync::LazyLock;

use regex::Regex;

use crate::blocks::BlockKind;
use crate::editing::{Block, BlockKey, Document, Point, TextRun};
use crate::error::EngineError;
use crate::transition::TransitionOutcome;

static WRAPPING_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(|\)$").expect("paren pattern is valid"));

/// Converts the block holding the caret to `target`.
///
/// Without a selection a fresh `target` block is appended after the last
/// block instead. Converting a block to its own kind changes nothing but
/// still reports `Applied`, so a repeated toolbar click re-asserts the
/// active format.
pub fn format_block(doc: &mut Document, target: BlockKind) -> TransitionOutcome {
    if target.is_spacer() {
        log::warn!("refusing to format a block as a spacer");
        return TransitionOutcome::NoOp;
    }

    let result = match doc.selection() {
        None => append_block(doc, target),
        Some(selection) => convert_block(doc, selection.anchor, target),
    };

    match result {
        Ok(focus) => TransitionOutcome::Applied {
            kind: target,
            focus,
        },
        Err(err) => {
            log::debug!("format {target} ignored: {err}");
            TransitionOutcome::NoOp
        }
    }
}

/// Text with one leading `(` and one trailing `)` removed, then trimmed.
pub fn strip_wrapping_parens(text: &str) -> String {
    WRAPPING_PARENS.replace_all(text, "").trim().to_string()
}

fn append_block(doc: &mut Document, target: BlockKind) -> Result<BlockKey, EngineError> {
    if target == BlockKind::Parenthetical {
        let key = doc.append(Block::with_runs(
            target,
            vec![TextRun::new("("), TextRun::new(")")],
        ));
        doc.select(Point::new(key, 1))?;
        return Ok(key);
    }

    let key = doc.append(Block::new(target));
    doc.select_end(key)?;
    Ok(key)
}

fn convert_block(
    doc: &mut Document,
    anchor: Point,
    target: BlockKind,
) -> Result<BlockKey, EngineError> {
    let block = doc
        .block(anchor.key)
        .ok_or(EngineError::UnknownBlock(anchor.key))?;
    if block.is_spacer() {
        return Err(EngineError::SpacerNotEditable(anchor.key));
    }
    if block.kind() == target {
        return Ok(anchor.key);
    }

    match (block.kind(), target) {
        (_, BlockKind::Parenthetical) => {
            let inner = strip_wrapping_parens(&block.text());
            let mut runs = vec![TextRun::new("(")];
            if !inner.is_empty() {
                runs.push(TextRun::new(inner.as_str()));
            }
            runs.push(TextRun::new(")"));

            let key = doc.replace(anchor.key, Block::with_runs(target, runs))?;
            doc.select(Point::new(key, 1 + inner.chars().count()))?;
            Ok(key)
        }
        (BlockKind::Parenthetical, _) => {
            let inner = strip_wrapping_parens(&block.text());
            let key = doc.replace(anchor.key, Block::with_text(target, inner))?;
            doc.select_end(key)?;
            Ok(key)
        }
        _ => {
            let replacement = Block::with_runs(target, block.runs().to_vec());
            let offset = anchor.offset.min(replacement.char_len());
            let key = doc.replace(anchor.key, replacement)?;
            doc.select(Point::new(key, offset))?;
            Ok(key)
        }
    }
}
