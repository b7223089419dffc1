use screenplay_engine::{Block, Document, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// Where the caret lands after `motion`, skipping spacers. `None` when the
/// caret cannot move.
pub fn moved(doc: &Document, motion: Motion) -> Option<Point> {
    let anchor = doc.selection()?.anchor;
    let block = doc.block(anchor.key)?;
    let index = doc.index_of(anchor.key)?;
    let previous = || doc.blocks()[..index].iter().rev().find(|b| !b.is_spacer());
    let next = || doc.blocks()[index + 1..].iter().find(|b| !b.is_spacer());

    let target = match motion {
        Motion::Left if anchor.offset > 0 => Point::new(anchor.key, anchor.offset - 1),
        Motion::Left => end_of(previous()?),
        Motion::Right if anchor.offset < block.char_len() => {
            Point::new(anchor.key, anchor.offset + 1)
        }
        Motion::Right => Point::new(next()?.key(), 0),
        Motion::Up => clamped(previous()?, anchor.offset),
        Motion::Down => clamped(next()?, anchor.offset),
        Motion::Home => Point::new(anchor.key, 0),
        Motion::End => end_of(block),
    };
    (target != anchor).then_some(target)
}

fn end_of(block: &Block) -> Point {
    Point::new(block.key(), block.char_len())
}

fn clamped(block: &Block, offset: usize) -> Point {
    Point::new(block.key(), offset.min(block.char_len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use screenplay_engine::BlockKind;

    fn doc() -> (Document, Vec<Block>) {
        let blocks = vec![
            Block::with_text(BlockKind::Character, "MAYA"),
            Block::spacer(0.0),
            Block::with_text(BlockKind::Dialogue, "Hi"),
        ];
        (Document::from_blocks(blocks.clone()), blocks)
    }

    #[test]
    fn test_left_at_start_jumps_over_spacer_to_previous_end() {
        let (mut doc, blocks) = doc();
        doc.select_start(blocks[2].key()).unwrap();

        assert_eq!(moved(&doc, Motion::Left), Some(Point::new(blocks[0].key(), 4)));
    }

    #[test]
    fn test_down_clamps_offset() {
        let (mut doc, blocks) = doc();
        doc.select_end(blocks[0].key()).unwrap();

        assert_eq!(moved(&doc, Motion::Down), Some(Point::new(blocks[2].key(), 2)));
    }

    #[test]
    fn test_no_motion_past_the_edges() {
        let (mut doc, blocks) = doc();
        doc.select_end(blocks[2].key()).unwrap();

        assert_eq!(moved(&doc, Motion::Right), None);
        assert_eq!(moved(&doc, Motion::Down), None);
        assert_eq!(moved(&doc, Motion::End), None);
    }
}
