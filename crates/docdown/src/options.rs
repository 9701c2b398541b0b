//! Configuration options for Markdown rendering

/// Options for [`Renderer`](crate::Renderer)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct RenderOptions {
    /// Inline line-break marker, used where a newline cannot appear
    /// (headings, table cells, list items)
    pub line_break: String,

    /// Markdown for a LineBreak node
    pub hard_break: String,

    /// Bullet list marker
    pub bullet_marker: String,

    /// Indentation of list item continuation lines
    pub list_indent: usize,

    /// Minimum table column width
    pub min_column_width: usize,

    /// Character for fenced code blocks
    pub fence_char: char,

    /// Minimum fence length; longer when the code contains a fence
    pub min_fence_len: usize,

    /// Rewrite links into rendered documents relative to the linking document
    pub relative_links: bool,

    /// Output key for top-level documents without a path; `None` skips them
    pub missing_path_key: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_break: "<br>".to_string(),
            hard_break: "  \n".to_string(),
            bullet_marker: "-".to_string(),
            list_indent: 2,
            min_column_width: 3,
            fence_char: '`',
            min_fence_len: 3,
            relative_links: true,
            missing_path_key: None,
        }
    }
}
