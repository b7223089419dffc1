//! Block type registry.
//!
//! A pure lookup table: every [`BlockKind`] maps to its presentation rules,
//! its text-casing policy and its successor on Enter. Nothing here holds state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of a document block.
///
/// The seven screenplay kinds carry user text. `Spacer` is inserted by the
/// pagination engine to push the following block onto a new simulated page
/// and never holds content or a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    SceneHeading,
    Action,
    Character,
    Dialogue,
    Parenthetical,
    Transition,
    Shot,
    Spacer,
}

/// How text typed into a block is cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasingPolicy {
    /// Text is stored exactly as typed.
    None,
    /// Any lowercase character is replaced by its uppercase form.
    ForceUppercase,
}

/// Horizontal alignment of a block's text inside its margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Fixed formatting rules for one block kind.
///
/// Indents are measured in inches from the 1.5" page margin, vertical
/// spacing in layout pixels (96 per inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub indent_left_in: f64,
    pub indent_right_in: f64,
    pub space_before_px: f64,
    pub space_after_px: f64,
    pub alignment: Alignment,
    pub casing: CasingPolicy,
    pub bold: bool,
}

/// Kinds a user can format a block as, in toolbar order.
pub const CONTENT_KINDS: [BlockKind; 7] = [
    BlockKind::SceneHeading,
    BlockKind::Action,
    BlockKind::Character,
    BlockKind::Parenthetical,
    BlockKind::Dialogue,
    BlockKind::Transition,
    BlockKind::Shot,
];

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::SceneHeading => "scene-heading",
            BlockKind::Action => "action",
            BlockKind::Character => "character",
            BlockKind::Dialogue => "dialogue",
            BlockKind::Parenthetical => "parenthetical",
            BlockKind::Transition => "transition",
            BlockKind::Shot => "shot",
            BlockKind::Spacer => "spacer",
        }
    }

    pub fn is_spacer(self) -> bool {
        matches!(self, BlockKind::Spacer)
    }

    /// Kind of the block created when Enter is pressed inside a block of this kind.
    pub fn next_on_enter(self) -> BlockKind {
        match self {
            BlockKind::Character | BlockKind::Parenthetical => BlockKind::Dialogue,
            BlockKind::SceneHeading
            | BlockKind::Action
            | BlockKind::Dialogue
            | BlockKind::Transition
            | BlockKind::Shot
            | BlockKind::Spacer => BlockKind::Action,
        }
    }

    pub fn casing(self) -> CasingPolicy {
        self.presentation().casing
    }

    pub fn presentation(self) -> Presentation {
        let base = Presentation {
            indent_left_in: 0.0,
            indent_right_in: 0.0,
            space_before_px: 0.0,
            space_after_px: 16.0,
            alignment: Alignment::Left,
            casing: CasingPolicy::None,
            bold: false,
        };

        match self {
            BlockKind::SceneHeading => Presentation {
                casing: CasingPolicy::ForceUppercase,
                bold: true,
                ..base
            },
            BlockKind::Action => base,
            BlockKind::Character => Presentation {
                indent_left_in: 2.2,
                space_before_px: 16.0,
                space_after_px: 0.0,
                casing: CasingPolicy::ForceUppercase,
                ..base
            },
            BlockKind::Dialogue => Presentation {
                indent_left_in: 1.0,
                indent_right_in: 2.0,
                ..base
            },
            BlockKind::Parenthetical => Presentation {
                indent_left_in: 1.5,
                space_after_px: 4.0,
                ..base
            },
            BlockKind::Transition => Presentation {
                alignment: Alignment::Right,
                casing: CasingPolicy::ForceUppercase,
                ..base
            },
            BlockKind::Shot => Presentation {
                casing: CasingPolicy::ForceUppercase,
                ..base
            },
            BlockKind::Spacer => Presentation {
                space_after_px: 0.0,
                ..base
            },
        }
    }

    /// Toolbar shortcut digit (used with a modifier key) for this kind.
    pub fn shortcut_digit(self) -> Option<char> {
        CONTENT_KINDS
            .iter()
            .position(|kind| *kind == self)
            .and_then(|index| char::from_digit(index as u32 + 1, 10))
    }

    pub fn from_shortcut_digit(digit: char) -> Option<BlockKind> {
        let index = digit.to_digit(10)?.checked_sub(1)?;
        CONTENT_KINDS.get(index as usize).copied()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block kind: {0}")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CONTENT_KINDS
            .iter()
            .copied()
            .chain(std::iter::once(BlockKind::Spacer))
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BlockKind::SceneHeading, BlockKind::Action)]
    #[case(BlockKind::Action, BlockKind::Action)]
    #[case(BlockKind::Character, BlockKind::Dialogue)]
    #[case(BlockKind::Dialogue, BlockKind::Action)]
    #[case(BlockKind::Parenthetical, BlockKind::Dialogue)]
    #[case(BlockKind::Transition, BlockKind::Action)]
    #[case(BlockKind::Shot, BlockKind::Action)]
    fn test_successor_table(#[case] current: BlockKind, #[case] expected: BlockKind) {
        assert_eq!(current.next_on_enter(), expected);
    }

    #[rstest]
    #[case(BlockKind::SceneHeading, CasingPolicy::ForceUppercase)]
    #[case(BlockKind::Action, CasingPolicy::None)]
    #[case(BlockKind::Character, CasingPolicy::ForceUppercase)]
    #[case(BlockKind::Dialogue, CasingPolicy::None)]
    #[case(BlockKind::Parenthetical, CasingPolicy::None)]
    #[case(BlockKind::Transition, CasingPolicy::ForceUppercase)]
    #[case(BlockKind::Shot, CasingPolicy::ForceUppercase)]
    #[case(BlockKind::Spacer, CasingPolicy::None)]
    fn test_casing_policy(#[case] kind: BlockKind, #[case] expected: CasingPolicy) {
        assert_eq!(kind.casing(), expected);
    }

    #[test]
    fn test_only_transition_is_right_aligned() {
        for kind in CONTENT_KINDS {
            let expected = if kind == BlockKind::Transition {
                Alignment::Right
            } else {
                Alignment::Left
            };
            assert_eq!(kind.presentation().alignment, expected, "{kind}");
        }
    }

    #[test]
    fn test_dialogue_and_character_indents() {
        assert_eq!(BlockKind::Character.presentation().indent_left_in, 2.2);
        let dialogue = BlockKind::Dialogue.presentation();
        assert_eq!(dialogue.indent_left_in, 1.0);
        assert_eq!(dialogue.indent_right_in, 2.0);
        assert_eq!(BlockKind::Parenthetical.presentation().indent_left_in, 1.5);
    }

    #[test]
    fn test_shortcut_digits_round_trip() {
        for kind in CONTENT_KINDS {
            let digit = kind.shortcut_digit().unwrap();
            assert_eq!(BlockKind::from_shortcut_digit(digit), Some(kind));
        }
        assert_eq!(BlockKind::from_shortcut_digit('4'), Some(BlockKind::Parenthetical));
        assert_eq!(BlockKind::from_shortcut_digit('0'), None);
        assert_eq!(BlockKind::from_shortcut_digit('8'), None);
        assert_eq!(BlockKind::Spacer.shortcut_digit(), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("scene-heading".parse::<BlockKind>(), Ok(BlockKind::SceneHeading));
        assert_eq!(BlockKind::Parenthetical.to_string(), "parenthetical");
        assert!("montage".parse::<BlockKind>().is_err());
    }
}
