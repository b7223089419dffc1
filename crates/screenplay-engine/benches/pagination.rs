use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use screenplay_engine::pagination::{
    MeasurementSample, PageGeometry, page_breaks, reconcile, sample_heights,
};
use screenplay_engine::{Block, BlockKey, BlockKind, Document, Editor};

fn long_script(blocks: usize) -> (Document, HashMap<BlockKey, f64>) {
    let kinds = [
        BlockKind::SceneHeading,
        BlockKind::Action,
        BlockKind::Character,
        BlockKind::Dialogue,
    ];
    let blocks: Vec<Block> = (0..blocks)
        .map(|i| Block::with_text(kinds[i % kinds.len()], format!("block {i}")))
        .collect();
    let heights = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| (block.key(), 16.0 + (i % 5) as f64 * 16.0))
        .collect();
    (Document::from_blocks(blocks), heights)
}

fn bench_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagination");
    group.sample_size(10);

    let (doc, heights) = long_script(5_000);
    let geometry = PageGeometry::default();
    let samples: Vec<MeasurementSample> =
        sample_heights(doc.blocks(), &heights).expect("synthetic heights are finite");

    group.bench_function("page_breaks", |b| {
        b.iter(|| {
            let breaks = page_breaks(std::hint::black_box(&samples), &geometry);
            std::hint::black_box(breaks);
        });
    });

    group.bench_function("reconcile_settled", |b| {
        let mut editor = Editor::new(doc.clone());
        let _ = reconcile(&mut editor, &heights, &geometry);
        b.iter(|| {
            let outcome = reconcile(&mut editor, std::hint::black_box(&heights), &geometry);
            std::hint::black_box(outcome.ok());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pagination);
criterion_main!(benches);
