//! Layout benchmark: measure the flex engine and full tree layout.
//!
//! Target: < 200µs for a 500-node tree

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trellis::layout::{compute_flex_layout, compute_tree_layout, FlexContainer, FlexItem, FlexWrap};
use trellis::render::{Border, BorderStyle, NodeId, NodeRegistry, Renderer, Style};
use trellis::text::WidthCache;

fn flex_items(count: u32) -> Vec<FlexItem> {
    (0..count)
        .map(|index| {
            FlexItem::new(NodeId(index), 5.0 + (index % 7) as f32, 1.0)
                .grow((index % 3) as f32)
                .shrink(1.0)
        })
        .collect()
}

/// Rows of bordered cards, each holding two text nodes.
fn create_test_tree(cards: usize) -> (NodeRegistry, NodeId) {
    let mut registry = NodeRegistry::new();
    let root = registry.add_root(Style::default().column());
    for index in 0..cards {
        let card = registry.add_box(root, Style::default().border(Border::new(BorderStyle::Round)));
        registry.add_text(card, Style::default().grow(1.0), format!("card {index}"));
        registry.add_text(card, Style::default(), "status: streaming tokens to the terminal");
    }
    (registry, root)
}

fn flex_by_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("flex_by_count");

    for count in [10u32, 100, 1000] {
        let items = flex_items(count);
        let mut wrapped = FlexContainer::new(200.0, 50.0);
        wrapped.wrap = FlexWrap::Wrap;
        let single = FlexContainer::new(200.0, 50.0);

        group.bench_with_input(BenchmarkId::new("nowrap", count), &items, |b, items| {
            b.iter(|| compute_flex_layout(black_box(&single), black_box(items)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("wrap", count), &items, |b, items| {
            b.iter(|| compute_flex_layout(black_box(&wrapped), black_box(items)).unwrap())
        });
    }

    group.finish();
}

fn tree_layout(c: &mut Criterion) {
    let (registry, root) = create_test_tree(160);
    let mut cache = WidthCache::default();

    c.bench_function("tree_layout_160_cards", |b| {
        b.iter(|| compute_tree_layout(black_box(&registry), root, 120, &mut cache).unwrap())
    });
}

fn full_frame(c: &mut Criterion) {
    let (registry, root) = create_test_tree(40);
    let mut renderer = Renderer::default();

    c.bench_function("render_frame_40_cards", |b| {
        b.iter(|| renderer.render(black_box(&registry), root, 120).unwrap())
    });
}

criterion_group!(benches, flex_by_count, tree_layout, full_frame);
criterion_main!(benches);
