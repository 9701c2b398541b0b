//! Shared helpers for Markdown rendering.

/// Segments of a `/`-separated path, with empty and `.` segments dropped
/// and `..` applied to the segment before it
fn segments(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            _ => out.push(segment),
        }
    }
    out
}

/// Path of document `to` as seen from document `from`.
///
/// The last segment of `from` names the document itself, so the result is
/// relative to its directory. `.` and `..` segments in either path are
/// resolved first.
///
/// # Examples
///
/// ```
/// use docdown::relative_path;
///
/// assert_eq!(relative_path("api/index.md", "api/render.md"), "render.md");
/// assert_eq!(relative_path("api/index.md", "guide.md"), "../guide.md");
/// assert_eq!(relative_path("guide.md", "api/index.md"), "api/index.md");
/// assert_eq!(relative_path("api/v1/../index.md", "./api/guide.md"), "guide.md");
/// ```
pub fn relative_path(from: &str, to: &str) -> String {
    let mut base = segments(from);
    if !from.ends_with('/') {
        base.pop();
    }
    let target = segments(to);

    let shared = base
        .iter()
        .zip(&target)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| base.len().min(target.len()));

    let mut parts = vec![".."; base.len() - shared];
    parts.extend_from_slice(&target[shared..]);
    if parts.is_empty() {
        "./".to_string()
    } else {
        parts.join("/")
    }
}

/// Fence for a code block: `min_len` fence characters, or one more than the
/// longest run of them inside `code`.
pub(crate) fn fence_for(code: &str, fence_char: char, min_len: usize) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == fence_char {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    fence_char.to_string().repeat(min_len.max(longest + 1))
}

/// Wrap text in an inline code span, widening the delimiter when the text
/// itself contains backticks.
pub(crate) fn code_span(code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let delimiter = "`".repeat(longest + 1);
    let space = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{delimiter}{space}{code}{space}{delimiter}")
}

/// Split text into (leading whitespace, core, trailing whitespace)
pub(crate) fn split_whitespace_edges(text: &str) -> (&str, &str, &str) {
    let core = text.trim();
    if core.is_empty() {
        return (text, "", "");
    }
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();
    (&text[..start], core, &text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_siblings() {
        assert_eq!(relative_path("a/b.md", "a/c.md"), "c.md");
    }

    #[test]
    fn test_relative_path_deep_to_shallow() {
        assert_eq!(relative_path("a/b/c.md", "d.md"), "../../d.md");
    }

    #[test]
    fn test_relative_path_same_document() {
        assert_eq!(relative_path("guide.md", "guide.md"), "guide.md");
    }

    #[test]
    fn test_relative_path_both_empty() {
        assert_eq!(relative_path("", ""), "./");
    }

    #[test]
    fn test_relative_path_dot_segments() {
        assert_eq!(relative_path("a/./b/../c.md", "a/d.md"), "d.md");
        assert_eq!(relative_path("a/b.md", "a/../c.md"), "../c.md");
        assert_eq!(relative_path("a//b/c.md", "a/d.md"), "../d.md");
        assert_eq!(relative_path("a/b/c.md", "a"), "..");
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("./a//b/../c"), ["a", "c"]);
        assert_eq!(segments("../a"), ["a"]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_fence_for() {
        assert_eq!(fence_for("let x = 1;", '`', 3), "```");
        assert_eq!(fence_for("```rust\n```", '`', 3), "````");
        assert_eq!(fence_for("~~~~~", '~', 3), "~~~~~~");
    }

    #[test]
    fn test_code_span() {
        assert_eq!(code_span("code"), "`code`");
        assert_eq!(code_span("a`b"), "``a`b``");
        assert_eq!(code_span("`tick"), "`` `tick ``");
    }

    #[test]
    fn test_split_whitespace_edges() {
        assert_eq!(split_whitespace_edges("  bold "), ("  ", "bold", " "));
        assert_eq!(split_whitespace_edges("x"), ("", "x", ""));
        assert_eq!(split_whitespace_edges("   "), ("   ", "", ""));
    }
}
