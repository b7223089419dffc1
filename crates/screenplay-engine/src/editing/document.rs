use std::collections::BTreeSet;
use std::fmt;

use uuid::Uuid;

use crate::blocks::BlockKind;
use crate::error::EngineError;

/// Stable identity of a block.
///
/// Used to find a block's rendered counterpart and to tell whether two
/// spacers seen in different reconciliation passes are the same spacer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct BlockKey(Uuid);

impl BlockKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

/// An inline run of text inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// The atomic document unit.
///
/// A block's kind never changes after creation; reformatting replaces the
/// block with a new one. Spacers never carry text runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    key: BlockKey,
    kind: BlockKind,
    runs: Vec<TextRun>,
    /// Extra height added to a spacer, in layout pixels.
    offset_spacing: f64,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            key: BlockKey::new(),
            kind,
            runs: Vec::new(),
            offset_spacing: 0.0,
        }
    }

    /// Creates a block holding `text` as a single run (no run when empty).
    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::new(text)]
        };
        Self::with_runs(kind, runs)
    }

    pub fn with_runs(kind: BlockKind, runs: Vec<TextRun>) -> Self {
        let mut block = Self::new(kind);
        if !kind.is_spacer() {
            block.runs = runs;
        }
        block
    }

    pub fn spacer(offset_spacing: f64) -> Self {
        Self {
            offset_spacing,
            ..Self::new(BlockKind::Spacer)
        }
    }

    pub fn key(&self) -> BlockKey {
        self.key
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn offset_spacing(&self) -> f64 {
        self.offset_spacing
    }

    pub fn is_spacer(&self) -> bool {
        self.kind.is_spacer()
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    /// Drops every run and rebuilds the block from `text` alone.
    pub(crate) fn rebuild_from(&mut self, text: &str) {
        self.runs.clear();
        if !text.is_empty() {
            self.runs.push(TextRun::new(text));
        }
    }

    pub(crate) fn runs_mut(&mut self) -> &mut Vec<TextRun> {
        &mut self.runs
    }

    /// Inserts `text` at a character offset, into the run that ends at or
    /// contains the offset.
    fn insert_str(&mut self, offset: usize, text: &str) {
        let mut remaining = offset;
        for run in &mut self.runs {
            let len = run.char_len();
            if remaining <= len {
                let (before, after) = split_at_char(&run.text, remaining);
                run.text = format!("{before}{text}{after}");
                return;
            }
            remaining -= len;
        }
        self.runs.push(TextRun::new(text));
    }

    /// Removes the character just before `offset`. Runs left empty are dropped.
    fn remove_char_before(&mut self, offset: usize) {
        let Some(target) = offset.checked_sub(1) else {
            return;
        };
        let mut remaining = target;
        for index in 0..self.runs.len() {
            let len = self.runs[index].char_len();
            if remaining < len {
                let run = &mut self.runs[index];
                let byte = char_to_byte(&run.text, remaining);
                run.text.remove(byte);
                if run.text.is_empty() {
                    self.runs.remove(index);
                }
                return;
            }
            remaining -= len;
        }
    }
}

/// A position inside a block: the block's key and a character offset into
/// its concatenated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub key: BlockKey,
    pub offset: usize,
}

impl Point {
    pub fn new(key: BlockKey, offset: usize) -> Self {
        Self { key, offset }
    }
}

/// A collapsed selection (the caret).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
}

/// The document root: an ordered sequence of blocks plus the selection.
///
/// All mutation goes through [`crate::editing::Editor`]; the methods here are
/// the node operations the transition and pagination engines build on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
    selection: Option<Selection>,
    /// Bumped on every text or structural change (not on selection moves).
    content_revision: u64,
    /// Blocks whose text changed since the last casing pass.
    dirty: BTreeSet<BlockKey>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let dirty = blocks.iter().map(Block::key).collect();
        Self {
            blocks,
            selection: None,
            content_revision: 0,
            dirty,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn content_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|block| !block.is_spacer())
    }

    pub fn spacers(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|block| block.is_spacer())
    }

    pub fn index_of(&self, key: BlockKey) -> Option<usize> {
        self.blocks.iter().position(|block| block.key == key)
    }

    pub fn block(&self, key: BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|block| block.key == key)
    }

    pub fn last_key(&self) -> Option<BlockKey> {
        self.blocks.last().map(Block::key)
    }

    pub fn content_revision(&self) -> u64 {
        self.content_revision
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// The block holding the caret, if the selection still resolves.
    pub fn anchor_block(&self) -> Option<&Block> {
        let selection = self.selection?;
        self.block(selection.anchor.key)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Places the caret at `point`.
    pub fn select(&mut self, point: Point) -> Result<(), EngineError> {
        let block = self.editable(point.key)?;
        let len = block.char_len();
        if point.offset > len {
            return Err(EngineError::OffsetOutOfRange {
                key: point.key,
                offset: point.offset,
                len,
            });
        }
        self.selection = Some(Selection { anchor: point });
        Ok(())
    }

    pub fn select_start(&mut self, key: BlockKey) -> Result<(), EngineError> {
        self.select(Point::new(key, 0))
    }

    pub fn select_end(&mut self, key: BlockKey) -> Result<(), EngineError> {
        let len = self.editable(key)?.char_len();
        self.select(Point::new(key, len))
    }

    pub fn append(&mut self, block: Block) -> BlockKey {
        let key = block.key;
        self.blocks.push(block);
        self.touch(key);
        key
    }

    pub fn insert_after(&mut self, target: BlockKey, block: Block) -> Result<BlockKey, EngineError> {
        let index = self.require(target)?;
        Ok(self.insert_at(index + 1, block))
    }

    pub fn insert_before(&mut self, target: BlockKey, block: Block) -> Result<BlockKey, EngineError> {
        let index = self.require(target)?;
        Ok(self.insert_at(index, block))
    }

    /// Swaps the block at `target` for `block`, keeping its position.
    ///
    /// A selection inside the replaced block is dropped; callers reselect.
    pub fn replace(&mut self, target: BlockKey, block: Block) -> Result<BlockKey, EngineError> {
        let index = self.require(target)?;
        let key = block.key;
        self.blocks[index] = block;
        self.dirty.remove(&target);
        self.drop_selection_in(target);
        self.touch(key);
        Ok(key)
    }

    pub fn remove(&mut self, target: BlockKey) -> Result<Block, EngineError> {
        let index = self.require(target)?;
        let removed = self.blocks.remove(index);
        self.dirty.remove(&target);
        self.drop_selection_in(target);
        self.content_revision += 1;
        Ok(removed)
    }

    /// Rebuilds a block's children from `text`, discarding its old runs.
    pub fn set_block_text(&mut self, key: BlockKey, text: &str) -> Result<(), EngineError> {
        self.editable_mut(key)?.rebuild_from(text);
        self.touch(key);
        self.clamp_selection();
        Ok(())
    }

    /// Types `text` at the caret and moves the caret past it.
    pub fn insert_text(&mut self, text: &str) -> Result<(), EngineError> {
        let anchor = self.selection.ok_or(EngineError::NoSelection)?.anchor;
        let block = self.editable_mut(anchor.key)?;
        let offset = anchor.offset.min(block.char_len());
        block.insert_str(offset, text);
        self.touch(anchor.key);
        self.selection = Some(Selection {
            anchor: Point::new(anchor.key, offset + text.chars().count()),
        });
        Ok(())
    }

    /// Deletes the character before the caret.
    ///
    /// At the start of a block the block is merged into the previous content
    /// block, which keeps its own kind, and any spacers between the two are
    /// dropped. At the start of the first block this does nothing.
    pub fn delete_backward(&mut self) -> Result<(), EngineError> {
        let anchor = self.selection.ok_or(EngineError::NoSelection)?.anchor;
        let index = self.require(anchor.key)?;
        if self.blocks[index].is_spacer() {
            return Err(EngineError::SpacerNotEditable(anchor.key));
        }

        if anchor.offset > 0 {
            let offset = anchor.offset.min(self.blocks[index].char_len());
            self.blocks[index].remove_char_before(offset);
            self.touch(anchor.key);
            self.selection = Some(Selection {
                anchor: Point::new(anchor.key, offset.saturating_sub(1)),
            });
            return Ok(());
        }

        let Some(previous) = self.blocks[..index]
            .iter()
            .rposition(|block| !block.is_spacer())
        else {
            return Ok(());
        };

        let merged = self.blocks.remove(index);
        self.dirty.remove(&merged.key);
        // Page breaks that stood before the merged block go with it.
        for spacer in self.blocks.drain(previous + 1..index) {
            self.dirty.remove(&spacer.key);
        }
        let target = &mut self.blocks[previous];
        let join_at = target.char_len();
        target.runs.extend(merged.runs);
        let target_key = target.key;
        self.touch(target_key);
        self.selection = Some(Selection {
            anchor: Point::new(target_key, join_at),
        });
        Ok(())
    }

    /// Plain-text outline, one block per line.
    pub fn outline(&self) -> String {
        self.blocks
            .iter()
            .map(|block| {
                if block.is_spacer() {
                    "--- page break ---".to_string()
                } else {
                    let text = block.text();
                    if text.is_empty() {
                        block.kind.to_string()
                    } else {
                        format!("{}: {}", block.kind, text)
                    }
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn block_mut(&mut self, key: BlockKey) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.key == key)
    }

    pub(crate) fn take_dirty(&mut self) -> BTreeSet<BlockKey> {
        std::mem::take(&mut self.dirty)
    }

    /// Pulls the caret back inside its block after the block's text shrank.
    pub(crate) fn clamp_selection(&mut self) {
        if let Some(selection) = self.selection
            && let Some(block) = self.block(selection.anchor.key)
        {
            let len = block.char_len();
            if selection.anchor.offset > len {
                self.selection = Some(Selection {
                    anchor: Point::new(selection.anchor.key, len),
                });
            }
        }
    }

    fn insert_at(&mut self, index: usize, block: Block) -> BlockKey {
        let key = block.key;
        self.blocks.insert(index, block);
        self.touch(key);
        key
    }

    fn touch(&mut self, key: BlockKey) {
        self.content_revision += 1;
        self.dirty.insert(key);
    }

    fn drop_selection_in(&mut self, key: BlockKey) {
        if self.selection.is_some_and(|s| s.anchor.key == key) {
            self.selection = None;
        }
    }

    fn require(&self, key: BlockKey) -> Result<usize, EngineError> {
        self.index_of(key).ok_or(EngineError::UnknownBlock(key))
    }

    fn editable(&self, key: BlockKey) -> Result<&Block, EngineError> {
        let block = self.block(key).ok_or(EngineError::UnknownBlock(key))?;
        if block.is_spacer() {
            return Err(EngineError::SpacerNotEditable(key));
        }
        Ok(block)
    }

    fn editable_mut(&mut self, key: BlockKey) -> Result<&mut Block, EngineError> {
        let block = self.block_mut(key).ok_or(EngineError::UnknownBlock(key))?;
        if block.is_spacer() {
            return Err(EngineError::SpacerNotEditable(key));
        }
        Ok(block)
    }
}

/// Byte index of the character at `offset`, or the string length past the end.
pub(crate) fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Splits `text` at a character offset.
pub(crate) fn split_at_char(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(char_to_byte(text, offset))
}
