use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dom::{Document, NodeKey};
use highlight_core::{
    ContainmentCache, HIGHLIGHT_ID_ATTR, HighlightId, HighlightRecord, HighlightStore,
    MonospaceViewport, TextSelection, find_text_in_element, is_already_highlighted,
    is_within_existing_highlight, wrap_range_as_highlight,
};

const PARAGRAPHS: usize = 2_000;
const HIGHLIGHTS: usize = 200;

fn make_article(paragraphs: usize) -> (Document, NodeKey) {
    let mut doc = Document::new();
    let root = doc.root();
    let article = doc.append_element(root, "article").expect("article");
    for i in 0..paragraphs {
        let p = doc.append_element(article, "p").expect("p");
        doc.append_text(p, &format!("paragraph {i} holds a needle and some hay"))
            .expect("text");
    }
    (doc, article)
}

/// Highlight the word "needle" in the first `count` paragraphs.
fn highlight_needles(doc: &mut Document, article: NodeKey, count: usize) -> HighlightStore {
    let view = MonospaceViewport::default();
    let mut store = HighlightStore::new();
    for range in find_text_in_element(doc, article, "needle")
        .into_iter()
        .take(count)
    {
        let selection = TextSelection::measure(doc, &view, range, "needle");
        let element = wrap_range_as_highlight(doc, &range, "span", None).expect("wrap");
        let id = HighlightId::generate("bench");
        doc.set_attribute(element, HIGHLIGHT_ID_ATTR, id.as_str()).expect("tag");
        store.insert(HighlightRecord::new(id, element, selection));
    }
    store
}

fn bench_find_text_large(c: &mut Criterion) {
    let (doc, article) = make_article(PARAGRAPHS);
    c.bench_function("bench_find_text_large", |b| {
        b.iter(|| {
            let found = find_text_in_element(&doc, article, black_box("needle"));
            black_box(found.len());
        });
    });
}

fn bench_already_highlighted(c: &mut Criterion) {
    let (mut doc, article) = make_article(PARAGRAPHS);
    let store = highlight_needles(&mut doc, article, HIGHLIGHTS);
    let candidate = find_text_in_element(&doc, article, "hay")
        .pop()
        .expect("candidate");
    c.bench_function("bench_already_highlighted", |b| {
        b.iter(|| black_box(is_already_highlighted(&doc, black_box(&candidate), &store)));
    });
}

fn bench_within_existing_cold_vs_warm(c: &mut Criterion) {
    let (mut doc, article) = make_article(PARAGRAPHS);
    highlight_needles(&mut doc, article, HIGHLIGHTS);
    let candidate = find_text_in_element(&doc, article, "eed")
        .first()
        .copied()
        .expect("candidate");

    c.bench_function("bench_within_existing_cold", |b| {
        b.iter_batched(
            ContainmentCache::new,
            |mut cache| {
                black_box(is_within_existing_highlight(&doc, &candidate, article, &mut cache))
            },
            BatchSize::SmallInput,
        );
    });

    let mut warm = ContainmentCache::new();
    assert!(is_within_existing_highlight(&doc, &candidate, article, &mut warm));
    assert!(!warm.is_empty());
    c.bench_function("bench_within_existing_warm", |b| {
        b.iter(|| {
            black_box(is_within_existing_highlight(&doc, &candidate, article, &mut warm))
        });
    });
}

criterion_group!(
    benches,
    bench_find_text_large,
    bench_already_highlighted,
    bench_within_existing_cold_vs_warm
);
criterion_main!(benches);
