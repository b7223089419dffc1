/*!
 * # Editing Core Module
 *
 * The document root and the one path through which it changes.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the block list
 * - A [`Document`] is an ordered list of typed [`Block`]s plus a caret
 * - A block's kind is fixed at creation; reformatting swaps in a new block
 * - Spacer blocks are owned by pagination and never hold text or the caret
 *
 * ### 2. Serialized, Tagged Updates
 * - Every change runs inside [`Editor::update`] or [`Editor::try_update`]
 * - Each update publishes a [`Commit`] carrying its provenance tags, so a
 *   listener can ignore the changes it caused itself
 * - `try_update` is atomic: an error restores the pre-update document
 *
 * ### 3. Node Transforms
 * - The casing transform runs inside every update, before the commit, on
 *   the blocks whose text changed
 *
 * ## Module Structure
 *
 * - **`document`**: `Document`, `Block`, `BlockKey`, `TextRun`, `Point`, `Selection`
 * - **`editor`**: `Editor`, `Commit`, `UpdateTag`
 * - **`casing`**: forced-uppercase enforcement
 */

pub mod casing;
pub mod document;
pub mod editor;

pub use document::{Block, BlockKey, Document, Point, Selection, TextRun};
pub use editor::{Commit, Editor, UpdateTag};
