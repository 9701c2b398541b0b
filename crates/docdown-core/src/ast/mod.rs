//! Document node variants
//!
//! Every node in a document tree is a [`NodeRef`], a tree handle whose
//! payload is a [`Content`] variant. The nesting rules between variants are
//! enforced through the tree's [`Constraint`] hooks, so an invalid attachment
//! fails before the tree changes.

mod reference;
mod table;

pub use reference::Reference;
pub use table::{Alignment, CellData};

use std::fmt;

use crate::error::{Error, Result};
use crate::tree::{Constraint, Node, Splice};

/// Handle to a document node
pub type NodeRef = Node<Content>;

/// Node kinds, one per [`Content`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    LineBreak,
    FormattedSpan,
    Heading,
    Link,
    Image,
    Block,
    FormattedBlock,
    Document,
    Table,
    TableHeader,
    TableRow,
    TableCell,
    List,
    ListItem,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Text => "Text",
            NodeKind::LineBreak => "LineBreak",
            NodeKind::FormattedSpan => "FormattedSpan",
            NodeKind::Heading => "Heading",
            NodeKind::Link => "Link",
            NodeKind::Image => "Image",
            NodeKind::Block => "Block",
            NodeKind::FormattedBlock => "FormattedBlock",
            NodeKind::Document => "Document",
            NodeKind::Table => "Table",
            NodeKind::TableHeader => "TableHeader",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell => "TableCell",
            NodeKind::List => "List",
            NodeKind::ListItem => "ListItem",
        }
    }

    /// Inline leaves never own children
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::LineBreak
                | NodeKind::FormattedSpan
                | NodeKind::Heading
                | NodeKind::Link
                | NodeKind::Image
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Style flags of a [`Content::FormattedSpan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub code: bool,
}

impl SpanStyle {
    pub fn strong() -> Self {
        Self {
            strong: true,
            ..Self::default()
        }
    }

    pub fn emphasis() -> Self {
        Self {
            emphasis: true,
            ..Self::default()
        }
    }

    pub fn code() -> Self {
        Self {
            code: true,
            ..Self::default()
        }
    }
}

/// Type tag of a [`Content::FormattedBlock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockType {
    #[default]
    Default,
    Info,
    Warning,
    Error,
    Code,
    Blockquote,
}

/// Default level for headings built from invalid input
pub const DEFAULT_HEADING_LEVEL: u8 = 4;

/// A heading: text, a level in `1..=6` and the anchor assigned by
/// [`generate_ids`](crate::generate_ids).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub text: String,
    level: u8,
    pub(crate) link: Option<String>,
}

impl Heading {
    pub fn new(text: impl Into<String>, level: i64) -> Self {
        Self {
            text: text.into(),
            level: clamp_level(level),
            link: None,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: i64) {
        self.level = clamp_level(level);
    }

    /// Anchor such as `guide.md#usage`, or `None` while unpublished
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

/// Clamp a heading level into `1..=6`
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(1, 6) as u8
}

/// Heading level from loosely typed input: non-integers fall back to the
/// default level, integers are clamped.
pub fn level_from_f64(level: f64) -> u8 {
    if level.is_finite() && level.fract() == 0.0 {
        level.clamp(1.0, 6.0) as u8
    } else {
        DEFAULT_HEADING_LEVEL
    }
}

/// Payload of a document node
#[derive(Debug)]
pub enum Content {
    /// Literal text
    Text(String),

    /// Hard line break
    LineBreak,

    /// Text with bold / italic / inline-code flags
    FormattedSpan { text: String, style: SpanStyle },

    Heading(Heading),

    Link { text: String, href: Reference },

    Image { alt: String, src: Reference },

    /// Generic container; `paragraph` forces blank-line separation
    Block { paragraph: bool },

    FormattedBlock {
        block_type: BlockType,
        /// Language of a code block
        sub_type: Option<String>,
    },

    /// A document; nested documents take their root document's path
    Document { path: Option<String> },

    Table,

    /// First row of a table, with per-column alignment
    TableHeader { aligns: Vec<Option<Alignment>> },

    TableRow,

    TableCell,

    List { numbered: bool },

    ListItem,
}

impl Content {
    pub fn kind(&self) -> NodeKind {
        match self {
            Content::Text(_) => NodeKind::Text,
            Content::LineBreak => NodeKind::LineBreak,
            Content::FormattedSpan { .. } => NodeKind::FormattedSpan,
            Content::Heading(_) => NodeKind::Heading,
            Content::Link { .. } => NodeKind::Link,
            Content::Image { .. } => NodeKind::Image,
            Content::Block { .. } => NodeKind::Block,
            Content::FormattedBlock { .. } => NodeKind::FormattedBlock,
            Content::Document { .. } => NodeKind::Document,
            Content::Table => NodeKind::Table,
            Content::TableHeader { .. } => NodeKind::TableHeader,
            Content::TableRow => NodeKind::TableRow,
            Content::TableCell => NodeKind::TableCell,
            Content::List { .. } => NodeKind::List,
            Content::ListItem => NodeKind::ListItem,
        }
    }

    /// Whether the node is rendered as its own paragraph
    pub fn is_paragraph(&self) -> bool {
        match self {
            Content::Block { paragraph } => *paragraph,
            Content::FormattedBlock { .. }
            | Content::Document { .. }
            | Content::Table
            | Content::List { .. } => true,
            _ => false,
        }
    }
}

fn only_accept(parent: NodeKind, accepts: NodeKind, splice: &Splice<'_, Content>) -> Result<()> {
    for node in splice.incoming {
        let child = node.kind();
        if child != accepts {
            return Err(Error::InvalidChild {
                parent: parent.name(),
                child: child.name(),
                accepts: accepts.name(),
            });
        }
    }
    Ok(())
}

impl Constraint for Content {
    fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    fn check_insert(&self, splice: &Splice<'_, Self>) -> Result<()> {
        let kind = self.kind();
        match kind {
            _ if kind.is_leaf() => Err(Error::Leaf(kind.name())),
            NodeKind::Table => table::check_rows(splice),
            NodeKind::TableHeader | NodeKind::TableRow => {
                only_accept(kind, NodeKind::TableCell, splice)
            }
            NodeKind::List => only_accept(kind, NodeKind::ListItem, splice),
            _ => Ok(()),
        }
    }

    fn check_parent(&self, parent: &Self) -> Result<()> {
        let (expected, ok) = match self.kind() {
            NodeKind::TableHeader | NodeKind::TableRow => {
                (NodeKind::Table, parent.kind() == NodeKind::Table)
            }
            NodeKind::TableCell => (
                NodeKind::TableRow,
                matches!(parent.kind(), NodeKind::TableRow | NodeKind::TableHeader),
            ),
            NodeKind::ListItem => (NodeKind::List, parent.kind() == NodeKind::List),
            NodeKind::Document => (NodeKind::Document, parent.kind() == NodeKind::Document),
            _ => return Ok(()),
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidParent {
                child: self.kind_name(),
                parent: parent.kind_name(),
                expected: expected.name(),
            })
        }
    }

    fn is_removable(&self) -> bool {
        !matches!(self, Content::TableHeader { .. })
    }
}

impl NodeRef {
    pub fn text(text: impl Into<String>) -> Self {
        Node::new(Content::Text(text.into()))
    }

    pub fn line_break() -> Self {
        Node::new(Content::LineBreak)
    }

    pub fn formatted(text: impl Into<String>, style: SpanStyle) -> Self {
        Node::new(Content::FormattedSpan {
            text: text.into(),
            style,
        })
    }

    /// Heading; `level` is clamped into `1..=6`
    pub fn heading(text: impl Into<String>, level: i64) -> Self {
        Node::new(Content::Heading(Heading::new(text, level)))
    }

    pub fn link(text: impl Into<String>, href: impl Into<Reference>) -> Self {
        Node::new(Content::Link {
            text: text.into(),
            href: href.into(),
        })
    }

    pub fn image(alt: impl Into<String>, src: impl Into<Reference>) -> Self {
        Node::new(Content::Image {
            alt: alt.into(),
            src: src.into(),
        })
    }

    /// Generic block that stays inline with its siblings
    pub fn block() -> Self {
        Node::new(Content::Block { paragraph: false })
    }

    /// Generic block rendered as its own paragraph
    pub fn paragraph() -> Self {
        Node::new(Content::Block { paragraph: true })
    }

    pub fn formatted_block(block_type: BlockType) -> Self {
        Node::new(Content::FormattedBlock {
            block_type,
            sub_type: None,
        })
    }

    pub fn code_block(language: impl Into<String>) -> Self {
        Node::new(Content::FormattedBlock {
            block_type: BlockType::Code,
            sub_type: Some(language.into()),
        })
    }

    pub fn document(path: Option<&str>) -> Self {
        Node::new(Content::Document {
            path: normalize_path(path),
        })
    }

    pub fn list(numbered: bool) -> Self {
        Node::new(Content::List { numbered })
    }

    pub fn list_item() -> Self {
        Node::new(Content::ListItem)
    }

    /// Append `children` and return the node, for building trees inline
    pub fn with<I: IntoIterator<Item = NodeRef>>(self, children: I) -> Result<Self> {
        self.append(children)?;
        Ok(self)
    }

    pub fn kind(&self) -> NodeKind {
        self.data().kind()
    }

    pub fn is_paragraph(&self) -> bool {
        self.data().is_paragraph()
    }

    /// Plain text of the node and its descendants
    pub fn text_content(&self) -> String {
        match &*self.data() {
            Content::Text(text) | Content::FormattedSpan { text, .. } | Content::Link { text, .. } => {
                text.clone()
            }
            Content::Heading(heading) => heading.text.clone(),
            Content::Image { alt, .. } => alt.clone(),
            Content::LineBreak => "\n".to_string(),
            _ => self
                .children()
                .iter()
                .map(NodeRef::text_content)
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Anchor of a heading node
    pub fn heading_link(&self) -> Option<String> {
        match &*self.data() {
            Content::Heading(heading) => heading.link.clone(),
            _ => None,
        }
    }

    /// The nearest Document, this node included
    pub fn owner_document(&self) -> Option<NodeRef> {
        std::iter::once(self.clone())
            .chain(self.ancestors())
            .find(|node| node.kind() == NodeKind::Document)
    }

    /// The outermost Document this node belongs to.
    ///
    /// Documents nest only under documents, so this is the last document in
    /// the chain above the nearest one.
    pub fn root_document(&self) -> Option<NodeRef> {
        let document = self.owner_document()?;
        Some(
            document
                .ancestors()
                .take_while(|node| node.kind() == NodeKind::Document)
                .last()
                .unwrap_or(document),
        )
    }

    /// Path of the document this node belongs to, taken from its root
    /// document
    pub fn path(&self) -> Option<String> {
        let root = self.root_document()?;
        let data = root.data();
        match &*data {
            Content::Document { path } => normalize_path(path.as_deref()),
            _ => None,
        }
    }

    /// Set a document's own path; an empty string clears it
    pub fn set_path(&self, path: Option<&str>) -> Result<()> {
        match &mut *self.data_mut() {
            Content::Document { path: own } => {
                *own = normalize_path(path);
                Ok(())
            }
            other => Err(Error::NotADocument(other.kind_name())),
        }
    }

    pub fn numbered(&self) -> Option<bool> {
        match &*self.data() {
            Content::List { numbered } => Some(*numbered),
            _ => None,
        }
    }
}

fn normalize_path(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(str::to_string)
}
