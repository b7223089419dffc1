use std::collections::{BTreeSet, VecDeque};

use crate::editing::casing;
use crate::editing::document::{Document, Selection};

/// Provenance marker attached to every committed update.
///
/// Listeners filter on these instead of an ambient "is updating" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpdateTag {
    /// Spacer reconciliation by the pagination engine.
    PageBreakSpacer,
    /// Enter handled by the transition engine.
    Transition,
    /// Explicit block reformat (toolbar or shortcut).
    Reformat,
    /// Text typed or deleted at the caret.
    Typing,
    /// Caret moved without changing content.
    Selection,
}

/// Notification published after each update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub version: u64,
    pub tags: BTreeSet<UpdateTag>,
    /// Whether block text or structure changed (selection moves alone don't count).
    pub content_changed: bool,
}

impl Commit {
    pub fn has_tag(&self, tag: UpdateTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Owner of the document and its single serialized update path.
///
/// Each `update` runs the mutator, then the casing transform, then queues a
/// [`Commit`]. Commits are drained by the session and fanned out to the
/// pagination engine and the format-state broadcaster.
#[derive(Debug, Default)]
pub struct Editor {
    document: Document,
    version: u64,
    commits: VecDeque<Commit>,
}

impl Editor {
    pub fn new(mut document: Document) -> Self {
        casing::enforce_dirty(&mut document);
        Self {
            document,
            version: 0,
            commits: VecDeque::new(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Option<Selection> {
        self.document.selection()
    }

    /// Runs `f` against a read-only view of the document.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.document)
    }

    /// Runs `f` as one committed update tagged with `tags`.
    pub fn update<R>(
        &mut self,
        tags: impl IntoIterator<Item = UpdateTag>,
        f: impl FnOnce(&mut Document) -> R,
    ) -> R {
        let revision = self.document.content_revision();
        let selection = self.document.selection();
        let result = f(&mut self.document);
        self.commit(tags, revision, selection);
        result
    }

    /// Like [`Editor::update`], but an `Err` from `f` rolls the document back
    /// and publishes nothing.
    pub fn try_update<R, E>(
        &mut self,
        tags: impl IntoIterator<Item = UpdateTag>,
        f: impl FnOnce(&mut Document) -> Result<R, E>,
    ) -> Result<R, E> {
        let checkpoint = self.document.clone();
        let revision = checkpoint.content_revision();
        let selection = checkpoint.selection();
        match f(&mut self.document) {
            Ok(result) => {
                self.commit(tags, revision, selection);
                Ok(result)
            }
            Err(err) => {
                self.document = checkpoint;
                Err(err)
            }
        }
    }

    /// Takes every commit published since the last drain, oldest first.
    pub fn drain_commits(&mut self) -> Vec<Commit> {
        self.commits.drain(..).collect()
    }

    fn commit(
        &mut self,
        tags: impl IntoIterator<Item = UpdateTag>,
        revision_before: u64,
        selection_before: Option<Selection>,
    ) {
        casing::enforce_dirty(&mut self.document);

        let content_changed = self.document.content_revision() != revision_before;
        if !content_changed && self.document.selection() == selection_before {
            return;
        }

        self.version += 1;
        self.commits.push_back(Commit {
            version: self.version,
            tags: tags.into_iter().collect(),
            content_changed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::editing::document::Block;
    use crate::error::EngineError;

    fn editor_with(blocks: Vec<Block>) -> Editor {
        Editor::new(Document::from_blocks(blocks))
    }

    #[test]
    fn test_new_editor_normalises_casing() {
        let editor = editor_with(vec![Block::with_text(BlockKind::SceneHeading, "int. lab - day")]);
        assert_eq!(editor.document().blocks()[0].text(), "INT. LAB - DAY");
    }

    #[test]
    fn test_update_publishes_tagged_commit() {
        let block = Block::with_text(BlockKind::Character, "");
        let key = block.key();
        let mut editor = editor_with(vec![block]);

        editor.update([UpdateTag::Typing], |doc| {
            doc.select_start(key)?;
            doc.insert_text("maya")
        })
        .unwrap();

        assert_eq!(editor.document().blocks()[0].text(), "MAYA");
        let commits = editor.drain_commits();
        assert_eq!(commits.len(), 1);
        assert!(commits[0].has_tag(UpdateTag::Typing));
        assert!(commits[0].content_changed);
        assert_eq!(commits[0].version, 1);
        assert!(editor.drain_commits().is_empty());
    }

    #[test]
    fn test_selection_only_update_is_not_a_content_change() {
        let block = Block::with_text(BlockKind::Action, "abc");
        let key = block.key();
        let mut editor = editor_with(vec![block]);

        editor.update([UpdateTag::Selection], |doc| doc.select_end(key)).unwrap();

        let commits = editor.drain_commits();
        assert_eq!(commits.len(), 1);
        assert!(!commits[0].content_changed);
    }

    #[test]
    fn test_empty_update_publishes_nothing() {
        let mut editor = editor_with(vec![Block::new(BlockKind::Action)]);
        editor.update([UpdateTag::Typing], |_| ());
        assert!(editor.drain_commits().is_empty());
        assert_eq!(editor.version(), 0);
    }

    #[test]
    fn test_try_update_rolls_back_on_error() {
        let block = Block::with_text(BlockKind::Action, "keep me");
        let key = block.key();
        let mut editor = editor_with(vec![block]);

        let result: Result<(), EngineError> = editor.try_update([UpdateTag::PageBreakSpacer], |doc| {
            doc.insert_before(key, Block::spacer(0.0))?;
            doc.remove(crate::editing::BlockKey::new())?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(editor.document().len(), 1);
        assert_eq!(editor.document().spacers().count(), 0);
        assert!(editor.drain_commits().is_empty());
    }
}
