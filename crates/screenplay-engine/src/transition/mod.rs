//! Block transition engine.
//!
//! Decides what happens to the block structure when the user presses Enter
//! ([`press_enter`]) or explicitly switches a block's kind ([`format_block`]).
//! Both run inside an editor update and leave the caret where typing should
//! continue. Neither ever fails towards the host: an unresolvable caret is a
//! [`TransitionOutcome::NoOp`].

pub mod enter;
pub mod reformat;

pub use enter::press_enter;
pub use reformat::format_block;

use crate::blocks::BlockKind;
use crate::editing::BlockKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The document changed (or was already in the requested shape) and the
    /// caret now sits in `focus`, a block of `kind`.
    Applied { kind: BlockKind, focus: BlockKey },
    /// No anchor block could be resolved; the document is untouched.
    NoOp,
}

impl TransitionOutcome {
    /// The kind the active format should switch to, if any.
    pub fn applied_kind(&self) -> Option<BlockKind> {
        match self {
            TransitionOutcome::Applied { kind, .. } => Some(*kind),
            TransitionOutcome::NoOp => None,
        }
    }
}
