#![allow(dead_code)]

use dom::{Document, NodeKey};
use highlight_core::TextSelection;
use highlighter::HighlightEvents;
use std::time::{Duration, Instant};

/// Records every callback as `"<event>:<text>"`.
#[derive(Debug, Default)]
pub struct Recorder {
    pub log: Vec<String>,
}

impl Recorder {
    pub fn count(&self, event: &str) -> usize {
        self.log
            .iter()
            .filter(|entry| entry.split(':').next() == Some(event))
            .count()
    }
}

impl HighlightEvents for Recorder {
    fn on_text_selected(&mut self, selection: &TextSelection) {
        self.log.push(format!("selected:{}", selection.text));
    }

    fn on_text_highlighted(&mut self, selection: &TextSelection) {
        self.log.push(format!("highlighted:{}", selection.text));
    }

    fn on_highlight_removed(&mut self, selection: &TextSelection) {
        self.log.push(format!("removed:{}", selection.text));
    }
}

pub struct Page {
    pub doc: Document,
    /// Element outside the highlighter's container.
    pub outside: NodeKey,
    pub container: NodeKey,
    pub paragraphs: Vec<NodeKey>,
    /// The single text node of each paragraph, in order.
    pub texts: Vec<NodeKey>,
}

/// `<body><nav>menu</nav><div>` + one `<p>` per entry + `</div></body>`.
pub fn page(paragraphs: &[&str]) -> Page {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut doc = Document::new();
    let root = doc.root();
    let body = doc.append_element(root, "body").unwrap();
    let outside = doc.append_element(body, "nav").unwrap();
    doc.append_text(outside, "menu").unwrap();
    let container = doc.append_element(body, "div").unwrap();
    let mut ps = Vec::new();
    let mut texts = Vec::new();
    for text in paragraphs {
        let p = doc.append_element(container, "p").unwrap();
        texts.push(doc.append_text(p, text).unwrap());
        ps.push(p);
    }
    Page {
        doc,
        outside,
        container,
        paragraphs: ps,
        texts,
    }
}

pub fn select(doc: &mut Document, node: NodeKey, start: usize, end: usize) {
    let range = doc.range(node, start, node, end).unwrap();
    doc.selection_mut().select(range);
}

pub fn after(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}
