/// Stable handle for a node owned by a [`Document`](crate::Document).
///
/// Keys are never reused: a node that is detached from the tree keeps its key
/// and can be re-inserted later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub(crate) u32);

impl NodeKey {
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Coarse node classification, mirroring the DOM `nodeType` values we model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Fragment,
    Element,
    Text,
    Comment,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    /// Detached container used to carry extracted content.
    Fragment,
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        style: Vec<(String, String)>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Fragment => NodeType::Fragment,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Comment { .. } => NodeType::Comment,
        }
    }

    pub fn allows_children(&self) -> bool {
        matches!(
            self,
            NodeKind::Document | NodeKind::Fragment | NodeKind::Element { .. }
        )
    }

    /// Text and comments carry character data; offsets into them are byte offsets.
    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    pub(crate) fn character_data_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    /// Copy of this node without children, as used by `cloneNode(false)`.
    pub(crate) fn shallow_clone(&self) -> NodeKind {
        self.clone()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeRecord {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl NodeRecord {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn allows_children(&self) -> bool {
        self.kind.allows_children()
    }
}
