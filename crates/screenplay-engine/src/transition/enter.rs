use crate::blocks::BlockKind;
use crate::editing::document::split_at_char;
use crate::editing::{Block, Document};
use crate::error::EngineError;
use crate::transition::TransitionOutcome;

/// Handles an Enter keypress at the caret.
///
/// The keypress is always consumed: the host must not insert its own line
/// break whatever the outcome. The new block's kind comes from
/// [`BlockKind::next_on_enter`]; how the current text is divided depends on
/// where the caret sits:
///
/// - at the end of the text, the block keeps its text and an empty block is
///   appended after it (an unclosed parenthetical gets its `)` first);
/// - inside a parenthetical, everything up to the last `)` stays and the
///   trimmed remainder moves down, synthesising the `)` when there is none;
/// - anywhere else, the text is cut at the caret.
///
/// Split blocks are rebuilt from the retained text rather than trimmed run
/// by run, so no stale run fragments survive.
pub fn press_enter(doc: &mut Document) -> TransitionOutcome {
    match split_at_caret(doc) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::debug!("enter ignored: {err}");
            TransitionOutcome::NoOp
        }
    }
}

fn split_at_caret(doc: &mut Document) -> Result<TransitionOutcome, EngineError> {
    let anchor = doc.selection().ok_or(EngineError::NoSelection)?.anchor;
    let block = doc
        .block(anchor.key)
        .ok_or(EngineError::UnknownBlock(anchor.key))?;
    if block.is_spacer() {
        return Err(EngineError::SpacerNotEditable(anchor.key));
    }

    let kind = block.kind();
    let next = kind.next_on_enter();
    let text = block.text();
    let at_end = anchor.offset >= block.char_len();

    let (keep, carry) = match (at_end, kind) {
        (true, BlockKind::Parenthetical) => (close_parenthetical(&text), String::new()),
        (true, _) => (None, String::new()),
        (false, BlockKind::Parenthetical) => {
            let (keep, carry) = split_parenthetical(&text, anchor.offset);
            (Some(keep), carry)
        }
        (false, _) => {
            let (before, after) = split_at_char(&text, anchor.offset);
            (Some(before.to_string()), after.to_string())
        }
    };

    if let Some(keep) = keep {
        doc.set_block_text(anchor.key, &keep)?;
    }
    let created = doc.insert_after(anchor.key, Block::with_text(next, carry))?;
    doc.select_start(created)?;

    log::debug!("enter: {kind} -> {next} ({created})");
    Ok(TransitionOutcome::Applied {
        kind: next,
        focus: created,
    })
}

/// Splits parenthetical text so the closing mark stays on its own line.
///
/// Returns `(kept, carried)`.
pub(crate) fn split_parenthetical(text: &str, offset: usize) -> (String, String) {
    match text.rfind(')') {
        Some(close) => (
            text[..=close].to_string(),
            text[close + 1..].trim().to_string(),
        ),
        None => {
            let (before, after) = split_at_char(text, offset);
            (format!("{before})"), after.trim().to_string())
        }
    }
}

/// Closed form of an unclosed, non-empty parenthetical.
fn close_parenthetical(text: &str) -> Option<String> {
    (!text.is_empty() && !text.contains(')')).then(|| format!("{text})"))
}
