//! Terminal stand-in for a rendering surface.
//!
//! Text is set in a 10-pitch monospace face on a 6" wide text column, so a
//! block's wrap width follows from its indents, and every wrapped line is
//! 16px (12pt) tall.

use std::collections::HashMap;

use screenplay_engine::{Block, BlockKey, Document, Measure, PageGeometry};

pub const COLUMNS_PER_INCH: f64 = 10.0;
pub const TEXT_WIDTH_IN: f64 = 6.0;
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// One visual line of a wrapped block, with the char offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    pub start: usize,
    pub text: String,
}

/// Wrap width in columns for a block.
pub fn wrap_width(block: &Block) -> usize {
    let presentation = block.kind().presentation();
    let inches = TEXT_WIDTH_IN - presentation.indent_left_in - presentation.indent_right_in;
    ((inches * COLUMNS_PER_INCH).round() as usize).max(1)
}

/// Greedy word wrap; words longer than `width` are cut.
pub fn wrap(text: &str, width: usize) -> Vec<WrappedLine> {
    let chars: Vec<char> = text.chars().collect();
    let width = width.max(1);
    if chars.is_empty() {
        return vec![WrappedLine {
            start: 0,
            text: String::new(),
        }];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        if chars.len() - start <= width {
            lines.push(WrappedLine {
                start,
                text: chars[start..].iter().collect(),
            });
            break;
        }
        let window = &chars[start..=start + width];
        match window.iter().rposition(|c| *c == ' ') {
            Some(space) if space > 0 => {
                lines.push(WrappedLine {
                    start,
                    text: window[..space].iter().collect(),
                });
                start += space + 1;
            }
            _ => {
                lines.push(WrappedLine {
                    start,
                    text: window[..width].iter().collect(),
                });
                start += width;
            }
        }
    }
    lines
}

/// Heights of every block as laid out in the terminal.
pub struct TerminalSurface {
    heights: HashMap<BlockKey, f64>,
    total: f64,
}

impl TerminalSurface {
    pub fn layout(doc: &Document, geometry: &PageGeometry) -> Self {
        let heights: HashMap<BlockKey, f64> = doc
            .blocks()
            .iter()
            .map(|block| (block.key(), block_height(block, geometry)))
            .collect();
        let total = heights.values().sum();
        Self { heights, total }
    }
}

impl Measure for TerminalSurface {
    fn rendered_height(&self, key: BlockKey) -> Option<f64> {
        self.heights.get(&key).copied()
    }

    fn content_height(&self) -> Option<f64> {
        Some(self.total)
    }
}

fn block_height(block: &Block, geometry: &PageGeometry) -> f64 {
    if block.is_spacer() {
        return geometry.spacer_height(block.offset_spacing());
    }
    let presentation = block.kind().presentation();
    let lines = wrap(&block.text(), wrap_width(block)).len() as f64;
    presentation.space_before_px + lines * LINE_HEIGHT_PX + presentation.space_after_px
}
