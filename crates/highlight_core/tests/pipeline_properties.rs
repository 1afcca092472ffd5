use dom::{Document, NodeKey, Position, Range};
use highlight_core::{
    HIGHLIGHT_ID_ATTR, HighlightId, HighlightRecord, HighlightStore, MonospaceViewport,
    SelectionBoundary, TextSelection, adjust_to_word_boundary, adjusted_selection,
    capture_selection, find_text_in_element, is_already_highlighted, is_valid_selection,
    unwrap_highlight, wrap_range_as_highlight,
};
use pretty_assertions::assert_eq;

const PARAGRAPH: &str = "This is a test paragraph with some text to highlight.";

fn single_paragraph(text: &str) -> (Document, NodeKey, NodeKey) {
    let mut doc = Document::new();
    let root = doc.root();
    let container = doc.append_element(root, "div").unwrap();
    let p = doc.append_element(container, "p").unwrap();
    let t = doc.append_text(p, text).unwrap();
    (doc, container, t)
}

fn highlight(
    doc: &mut Document,
    store: &mut HighlightStore,
    range: Range,
    transient: bool,
) -> HighlightId {
    let view = MonospaceViewport::default();
    let selection = TextSelection::from_range(doc, &view, range).unwrap();
    let element = wrap_range_as_highlight(doc, &range, "span", None).unwrap();
    let id = HighlightId::generate("highlight");
    doc.set_attribute(element, HIGHLIGHT_ID_ATTR, id.as_str()).unwrap();
    let mut record = HighlightRecord::new(id.clone(), element, selection);
    record.transient = transient;
    store.insert(record);
    id
}

#[test]
fn unwrap_restores_text_and_node_count() {
    let (mut doc, container, t) = single_paragraph(PARAGRAPH);
    let p = doc.parent(t).unwrap();
    let before_text = doc.text_content(container);
    let before_nodes = doc.subtree_size(container);

    for (start, end) in [(0, 4), (10, 14), (43, 53), (0, 53)] {
        // Normalization may keep a different node than the one we started with.
        let t = doc.first_child(p).unwrap();
        let range = doc.range(t, start, t, end).unwrap();
        let element = wrap_range_as_highlight(&mut doc, &range, "span", None).unwrap();
        assert_ne!(doc.subtree_size(container), before_nodes);
        unwrap_highlight(&mut doc, element).unwrap();
        assert_eq!(doc.text_content(container), before_text);
        assert_eq!(doc.subtree_size(container), before_nodes);
    }
}

#[test]
fn unwrap_restores_cross_element_wrap() {
    let mut doc = Document::new();
    let root = doc.root();
    let container = doc.append_element(root, "div").unwrap();
    let a = doc.append_text(container, "plain text ").unwrap();
    let b = doc.append_element(container, "b").unwrap();
    let bold = doc.append_text(b, "bold words").unwrap();
    let before = doc.text_content(container);

    let range = doc.range(a, 6, bold, 4).unwrap();
    let element = wrap_range_as_highlight(&mut doc, &range, "span", None).unwrap();
    assert_eq!(doc.text_content(element), "text bold");
    unwrap_highlight(&mut doc, element).unwrap();
    assert_eq!(doc.text_content(container), before);
}

#[test]
fn intersecting_selection_is_rejected_either_order() {
    for first_is_left in [true, false] {
        let (mut doc, container, t) = single_paragraph(PARAGRAPH);
        let mut store = HighlightStore::new();
        let (first, second) = if first_is_left {
            ((5, 14), (10, 24))
        } else {
            ((10, 24), (5, 14))
        };
        let existing = doc.range(t, first.0, t, first.1).unwrap();
        highlight(&mut doc, &mut store, existing, false);

        // The tree changed, so the second selection is located again by text.
        let needle = &PARAGRAPH[second.0..second.1];
        let texts = doc.text_content(container);
        assert_eq!(texts, PARAGRAPH);
        let candidate = locate_across_nodes(&doc, container, second.0, second.1);
        assert!(
            is_already_highlighted(&doc, &candidate, &store),
            "{needle:?} should collide with the existing highlight"
        );
    }
}

#[test]
fn disjoint_selection_is_accepted() {
    let (mut doc, container, t) = single_paragraph(PARAGRAPH);
    let mut store = HighlightStore::new();
    let existing = doc.range(t, 0, t, 4).unwrap();
    highlight(&mut doc, &mut store, existing, false);

    let candidate = find_text_in_element(&doc, container, "paragraph")
        .pop()
        .unwrap();
    assert!(!is_already_highlighted(&doc, &candidate, &store));
}

#[test]
fn transient_highlight_never_blocks() {
    let (mut doc, container, t) = single_paragraph(PARAGRAPH);
    let mut store = HighlightStore::new();
    let existing = doc.range(t, 10, t, 14).unwrap();
    let id = highlight(&mut doc, &mut store, existing, true);

    let candidate = locate_across_nodes(&doc, container, 8, 20);
    assert!(!is_already_highlighted(&doc, &candidate, &store));

    store.promote(id.as_str());
    assert!(is_already_highlighted(&doc, &candidate, &store));
}

#[test]
fn word_adjustment_is_idempotent() {
    let (doc, _, t) = single_paragraph(PARAGRAPH);
    let len = PARAGRAPH.len();
    for start in 0..len {
        for end in (start + 1)..=len {
            let range = doc.range(t, start, t, end).unwrap();
            let once = adjust_to_word_boundary(&doc, &range);
            let twice = adjust_to_word_boundary(&doc, &once);
            assert_eq!(once, twice, "range {start}..{end}");
        }
    }
}

#[test]
fn search_then_wrap_round_trips() {
    let (mut doc, container, _) = single_paragraph(PARAGRAPH);
    let found = find_text_in_element(&doc, container, "test");
    assert_eq!(found.len(), 1);
    assert_eq!(doc.range_text(&found[0]).unwrap(), "test");

    let element = wrap_range_as_highlight(&mut doc, &found[0], "span", None).unwrap();
    assert_eq!(doc.text_content(element), "test");
    unwrap_highlight(&mut doc, element).unwrap();
    assert_eq!(doc.text_content(container), PARAGRAPH);
}

#[test]
fn selection_across_paragraphs_needs_cross_element_permission() {
    let mut doc = Document::new();
    let root = doc.root();
    let container = doc.append_element(root, "div").unwrap();
    let p1 = doc.append_element(container, "p").unwrap();
    let t1 = doc.append_text(p1, "first paragraph").unwrap();
    let p2 = doc.append_element(container, "p").unwrap();
    let t2 = doc.append_text(p2, "second paragraph").unwrap();

    let range = doc.range(t1, 6, t2, 6).unwrap();
    doc.selection_mut().select(range);
    let selection = capture_selection(&doc, &MonospaceViewport::default());
    assert_eq!(selection.as_ref().map(|s| s.text.as_str()), Some("paragraphsecond"));

    assert!(!is_valid_selection(selection.as_ref(), false));
    assert!(is_valid_selection(selection.as_ref(), true));
}

#[test]
fn boundary_modes_on_partial_word_drag() {
    let (mut doc, _, t) = single_paragraph("demonstration");
    let range = doc.range(t, 0, t, 10).unwrap();
    doc.selection_mut().select(range);
    let view = MonospaceViewport::default();

    let cursor = adjusted_selection(&doc, &view, SelectionBoundary::Cursor).unwrap();
    assert_eq!(cursor.text, "demonstrat");
    let word = adjusted_selection(&doc, &view, SelectionBoundary::Word).unwrap();
    assert_eq!(word.text, "demonstration");
}

#[test]
fn space_only_drag_is_rejected_in_every_mode() {
    let (mut doc, _, t) = single_paragraph("left right");
    let range = doc.range(t, 4, t, 5).unwrap();
    doc.selection_mut().select(range);
    let view = MonospaceViewport::default();

    assert!(capture_selection(&doc, &view).is_none());
    for mode in [SelectionBoundary::Cursor, SelectionBoundary::Word] {
        assert!(adjusted_selection(&doc, &view, mode).is_none());
    }
}

/// Range covering bytes `start..end` of the concatenated text under `root`,
/// which may span several text nodes after earlier wraps.
fn locate_across_nodes(doc: &Document, root: NodeKey, start: usize, end: usize) -> Range {
    let mut consumed = 0;
    let mut start_pos = None;
    let mut end_pos = None;
    for node in dom::traverse::text_nodes(doc, root) {
        let len = doc.node_length(node);
        if start_pos.is_none() && start < consumed + len {
            start_pos = Some(Position::new(node, start - consumed));
        }
        if end_pos.is_none() && end <= consumed + len {
            end_pos = Some(Position::new(node, end - consumed));
        }
        consumed += len;
    }
    Range::new(start_pos.unwrap(), end_pos.unwrap())
}
