//! Renderer - the main entry point for document tree to Markdown conversion.

use std::collections::HashSet;

use docdown_core::{
    generate_forest_ids, BlockType, Content, Error as TreeError, NodeKind, NodeRef, Reference,
    SpanStyle,
};
use indexmap::IndexMap;

use crate::options::RenderOptions;
use crate::table::format_table;
use crate::util::{code_span, fence_for, relative_path, split_whitespace_edges};
use crate::{DocdownError, Result};

/// Per-render state
struct Context {
    /// Paths of the documents being rendered; link targets into them are
    /// rewritten relative to the linking document
    documents: HashSet<String>,
}

impl Context {
    fn for_documents(documents: &[NodeRef]) -> Self {
        Self {
            documents: documents.iter().filter_map(NodeRef::path).collect(),
        }
    }
}

/// Renders document trees to Markdown
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a Renderer with default options
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
        }
    }

    /// Create a Renderer with custom options
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Get the current options
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    /// Anchor and render a forest of documents.
    ///
    /// Anchors are generated for every document before any link is resolved,
    /// so links may point at headings of documents later in the list. The
    /// result maps each document path to its Markdown, in input order.
    pub fn render(&self, documents: &[NodeRef]) -> Result<IndexMap<String, String>> {
        generate_forest_ids(documents)?;
        let cx = Context::for_documents(documents);

        let mut output = IndexMap::with_capacity(documents.len());
        for document in documents {
            let key = match (document.path(), &self.options.missing_path_key) {
                (Some(path), _) => path,
                (None, Some(key)) => key.clone(),
                (None, None) => {
                    tracing::warn!("Skipping document without a path");
                    continue;
                }
            };
            if output.contains_key(&key) {
                return Err(DocdownError::DuplicatePath(key));
            }
            let markdown = self.render_in(document, &cx)?;
            tracing::debug!(path = %key, bytes = markdown.len(), "Rendered document");
            output.insert(key, markdown);
        }
        Ok(output)
    }

    /// Render one document of a forest, using the anchors it already has.
    ///
    /// `forest` lists the documents its links may point into. Targets inside
    /// them are rewritten exactly as [`render`](Self::render) rewrites them;
    /// the document itself always counts as part of the forest.
    pub fn render_document(&self, document: &NodeRef, forest: &[NodeRef]) -> Result<String> {
        let kind = document.kind();
        if kind != NodeKind::Document {
            return Err(TreeError::NotADocument(kind.name()).into());
        }
        let mut cx = Context::for_documents(forest);
        cx.documents.extend(document.path());
        self.render_in(document, &cx)
    }

    /// Render any node on its own
    pub fn render_node(&self, node: &NodeRef) -> Result<String> {
        let cx = Context {
            documents: node.path().into_iter().collect(),
        };
        self.render_in(node, &cx)
    }

    fn render_in(&self, node: &NodeRef, cx: &Context) -> Result<String> {
        let data = node.data();
        match &*data {
            Content::Text(text) => Ok(text.clone()),

            Content::LineBreak => Ok(self.options.hard_break.clone()),

            Content::FormattedSpan { text, style } => Ok(format_span(text, *style)),

            Content::Heading(heading) => Ok(format!(
                "{} {}",
                "#".repeat(usize::from(heading.level())),
                heading.text.replace('\n', &self.options.line_break)
            )),

            Content::Link { text, href } => {
                let target = self.resolve_target(node, text, href, cx)?;
                Ok(format!("[{text}]({target})"))
            }

            Content::Image { alt, src } => {
                let target = self.resolve_target(node, alt, src, cx)?;
                Ok(format!("![{alt}]({target})"))
            }

            Content::FormattedBlock {
                block_type,
                sub_type,
            } => self.render_formatted_block(node, *block_type, sub_type.as_deref(), cx),

            Content::Table => self.render_table(node, cx),

            Content::List { numbered } => self.render_list(node, *numbered, cx),

            Content::TableCell => self.render_cell(node, cx),

            Content::Block { .. }
            | Content::Document { .. }
            | Content::TableHeader { .. }
            | Content::TableRow
            | Content::ListItem => self.render_block_children(&node.children(), cx),
        }
    }

    /// Render children, grouping inline runs into paragraphs and giving every
    /// paragraph-forming block its own paragraph
    fn render_block_children(&self, children: &[NodeRef], cx: &Context) -> Result<String> {
        let mut paragraphs = Vec::new();
        let mut pending = String::new();

        for child in children {
            if child.is_paragraph() {
                if !pending.is_empty() {
                    paragraphs.push(std::mem::take(&mut pending));
                }
                let block = self.render_in(child, cx)?;
                if !block.is_empty() {
                    paragraphs.push(block);
                }
            } else {
                pending.push_str(&self.render_in(child, cx)?);
            }
        }
        if !pending.is_empty() {
            paragraphs.push(pending);
        }

        Ok(paragraphs.join("\n\n"))
    }

    fn render_formatted_block(
        &self,
        node: &NodeRef,
        block_type: BlockType,
        sub_type: Option<&str>,
        cx: &Context,
    ) -> Result<String> {
        let body = self.render_block_children(&node.children(), cx)?;
        Ok(match block_type {
            BlockType::Default | BlockType::Info | BlockType::Warning | BlockType::Error => body,
            BlockType::Blockquote => body
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            BlockType::Code => {
                let fence = fence_for(&body, self.options.fence_char, self.options.min_fence_len);
                format!("{fence}{}\n{body}\n{fence}", sub_type.unwrap_or(""))
            }
        })
    }

    /// Cell content on one line: blocks run together, newlines become the
    /// line-break marker and pipes are escaped
    fn render_cell(&self, cell: &NodeRef, cx: &Context) -> Result<String> {
        let mut text = String::new();
        for child in cell.children() {
            text.push_str(&self.render_in(&child, cx)?);
        }
        Ok(text
            .trim()
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join(&self.options.line_break)
            .replace('|', "\\|"))
    }

    fn render_row(&self, row: &NodeRef, cx: &Context) -> Result<Vec<String>> {
        row.children()
            .iter()
            .map(|cell| self.render_cell(cell, cx))
            .collect()
    }

    fn render_table(&self, table: &NodeRef, cx: &Context) -> Result<String> {
        let rows = table.children();
        let Some((header, body)) = rows.split_first() else {
            return Ok(String::new());
        };
        let header_cells = self.render_row(header, cx)?;
        let body_cells = body
            .iter()
            .map(|row| self.render_row(row, cx))
            .collect::<Result<Vec<_>>>()?;
        let aligns = table.alignments(header_cells.len());
        Ok(format_table(
            &header_cells,
            &aligns,
            &body_cells,
            self.options.min_column_width,
        ))
    }

    fn render_list(&self, list: &NodeRef, numbered: bool, cx: &Context) -> Result<String> {
        let paragraph_break = format!("{}\n", self.options.line_break);
        let continuation = format!("\n{}", " ".repeat(self.options.list_indent));

        let mut items = Vec::new();
        for (i, item) in list.children().iter().enumerate() {
            let body = self.render_block_children(&item.children(), cx)?;
            let body = body
                .trim()
                .replace("\n\n", &paragraph_break)
                .replace('\n', &continuation);
            let marker = if numbered {
                format!("{}.", i + 1)
            } else {
                self.options.bullet_marker.clone()
            };
            items.push(format!("{marker} {body}"));
        }
        Ok(items.join("\n"))
    }

    fn resolve_target(
        &self,
        node: &NodeRef,
        text: &str,
        reference: &Reference,
        cx: &Context,
    ) -> Result<String> {
        let from = node.path();
        let target = reference
            .resolve()
            .map_err(|source| DocdownError::UnresolvedLink {
                document: from.clone().unwrap_or_else(|| "<no path>".to_string()),
                text: text.to_string(),
                source,
            })?;
        Ok(self.rewrite_target(target, from.as_deref(), cx))
    }

    /// Make a target into a rendered document relative to the linking one
    fn rewrite_target(&self, target: String, from: Option<&str>, cx: &Context) -> String {
        if !self.options.relative_links {
            return target;
        }
        let Some(from) = from else {
            return target;
        };
        let (path, fragment) = match target.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (target.as_str(), None),
        };
        if !cx.documents.contains(path) {
            return target;
        }

        let rewritten = match fragment {
            Some(fragment) if path == from => format!("#{fragment}"),
            Some(fragment) => format!("{}#{fragment}", relative_path(from, path)),
            None => relative_path(from, path),
        };
        tracing::trace!(%target, %rewritten, "Rewrote link target");
        rewritten
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap the trimmed text in code, bold and italic markers, in that order,
/// keeping surrounding whitespace outside the markers
fn format_span(text: &str, style: SpanStyle) -> String {
    let (leading, core, trailing) = split_whitespace_edges(text);
    if core.is_empty() {
        return text.to_string();
    }
    let mut out = core.to_string();
    if style.code {
        out = code_span(&out);
    }
    if style.strong {
        out = format!("**{out}**");
    }
    if style.emphasis {
        out = format!("*{out}*");
    }
    format!("{leading}{out}{trailing}")
}
