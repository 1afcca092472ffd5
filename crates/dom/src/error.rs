use crate::types::NodeKey;
use thiserror::Error;

/// Structural failures raised by tree mutation and range algorithms.
///
/// Variants follow the DOM exception names so callers can reason about them the
/// same way a browser host would (`surroundContents` raising `InvalidStateError`,
/// boundary comparison raising `WrongDocumentError`, and so on).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node {0:?} does not belong to this document")]
    NotFound(NodeKey),
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeKey, child: NodeKey },
    #[error("offset {offset} is out of bounds for node {node:?}")]
    IndexSize { node: NodeKey, offset: usize },
    #[error("inserting {child:?} into {parent:?} would violate the tree hierarchy")]
    HierarchyRequest { parent: NodeKey, child: NodeKey },
    #[error("range partially contains the non-text node {0:?}")]
    InvalidState(NodeKey),
    #[error("boundary points belong to different trees")]
    WrongDocument,
    #[error("node {0:?} has the wrong type for this operation")]
    InvalidNodeType(NodeKey),
}
