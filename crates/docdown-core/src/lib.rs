//! docdown-core - document tree for Markdown generation
//!
//! This crate provides the document model that `docdown` renders: a generic
//! ordered tree with validated mutation, the node variants built on it, lazy
//! link references and heading anchor generation.
//!
//! # Architecture
//!
//! ```text
//! Source model ──builds──▶ ┌────────────────┐
//!                          │ Document trees │ ──generate_ids──▶ anchored trees ──▶ docdown
//!                          └────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use docdown_core::{generate_ids, NodeRef, Reference};
//!
//! let heading = NodeRef::heading("Hello World!", 1);
//! let doc = NodeRef::document(Some("simple.md"))
//!     .with([heading.clone(), NodeRef::link("self", Reference::to_heading(&heading))])
//!     .unwrap();
//!
//! generate_ids(&doc).unwrap();
//! assert_eq!(heading.heading_link().as_deref(), Some("simple.md#hello-world"));
//! ```

mod anchor;
pub mod ast;
mod error;
pub mod tree;

pub use anchor::{generate_forest_ids, generate_ids, slugify};
pub use ast::{
    clamp_level, level_from_f64, Alignment, BlockType, CellData, Content, Heading, NodeKind,
    NodeRef, Reference, SpanStyle, DEFAULT_HEADING_LEVEL,
};
pub use error::{Error, Result};
pub use tree::{Constraint, Node, Splice, WeakNode};
