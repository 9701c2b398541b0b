//! # docdown
//!
//! Render document trees to Markdown.
//!
//! Documentation generators build a forest of [`NodeRef`] documents (one per
//! output file) from their source model, then hand the whole forest to a
//! [`Renderer`]. The renderer assigns heading anchors across every document
//! first, so a link may reference a heading that appears later in the
//! forest, and returns each document's Markdown keyed by its path.
//!
//! ## Design
//!
//! - **Validated trees**: invalid nesting is rejected when a node is attached,
//!   not when it is rendered
//! - **Lazy links**: a [`Reference`] can point at a heading whose anchor does
//!   not exist yet
//! - **Relative output**: links between rendered documents are rewritten
//!   relative to the linking document
//!
//! ## Example
//!
//! ```rust
//! use docdown::{NodeRef, Reference, Renderer};
//!
//! let usage = NodeRef::heading("Usage", 2);
//! let guide = NodeRef::document(Some("guide.md"))
//!     .with([usage.clone(), NodeRef::paragraph().with([NodeRef::text("Run it.")]).unwrap()])
//!     .unwrap();
//! let index = NodeRef::document(Some("index.md"))
//!     .with([NodeRef::link("Read the usage notes", Reference::to_heading(&usage))])
//!     .unwrap();
//!
//! let output = Renderer::new().render(&[index, guide]).unwrap();
//! assert_eq!(output["index.md"], "[Read the usage notes](guide.md#usage)");
//! assert_eq!(output["guide.md"], "## Usage\n\nRun it.");
//! ```

mod options;
mod renderer;
mod table;
mod util;

pub use docdown_core::{
    ast, clamp_level, generate_forest_ids, generate_ids, level_from_f64, slugify, tree,
    Alignment, BlockType, CellData, Content, Heading, NodeKind, NodeRef, Reference, SpanStyle,
    DEFAULT_HEADING_LEVEL,
};
pub use options::RenderOptions;
pub use renderer::Renderer;
pub use util::relative_path;

/// Error type for docdown operations
#[derive(Debug, thiserror::Error)]
pub enum DocdownError {
    #[error(transparent)]
    Tree(#[from] docdown_core::Error),

    #[error("Unresolved link \"{text}\" in {document}: {source}")]
    UnresolvedLink {
        document: String,
        text: String,
        #[source]
        source: docdown_core::Error,
    },

    #[error("Duplicate document path: {0}")]
    DuplicatePath(String),
}

pub type Result<T> = std::result::Result<T, DocdownError>;
