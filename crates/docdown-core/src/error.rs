//! Error type for tree mutation and reference resolution.

/// Error type for docdown-core operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("This node does not belong to any parent.")]
    NotAttached,

    #[error("{parent} only accepts {accepts}, got {child}")]
    InvalidChild {
        parent: &'static str,
        child: &'static str,
        accepts: &'static str,
    },

    #[error("{child} can only be added to {expected}, not {parent}")]
    InvalidParent {
        child: &'static str,
        parent: &'static str,
        expected: &'static str,
    },

    #[error("{0} cannot have children")]
    Leaf(&'static str),

    #[error("{0} cannot be removed from its parent")]
    Pinned(&'static str),

    #[error("Invalid table structure: {0}")]
    InvalidTable(&'static str),

    #[error("Cannot insert a node into itself or one of its descendants")]
    Cycle,

    #[error("The same node was passed more than once")]
    DuplicateNode,

    #[error("Expected a Document, got {0}")]
    NotADocument(&'static str),

    #[error("Expected {expected}, got {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cannot resolve reference: {0}")]
    UnresolvedReference(String),
}

pub type Result<T> = std::result::Result<T, Error>;
