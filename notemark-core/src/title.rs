//! Deriving a short display title from a note body.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_TITLE_CHARS: usize = 80;

static LEADING_MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[# \n\t*`-]*").expect("valid markup regex"));

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!?\[([^\]]+?)\]\(.+?\)").expect("valid link regex"));

static EMPTY_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!?\[\]\((.+?)\)").expect("valid empty link regex"));

/// Title for a note: the first non-empty line with heading/list/emphasis
/// markers stripped, links reduced to their label (or URL when the label is
/// empty), cut to [`MAX_TITLE_CHARS`] characters.
pub fn title_from_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let first_line = trimmed.lines().next().unwrap_or_default().trim();
    let stripped = LEADING_MARKUP_RE.replace(first_line, "");
    let labelled = LINK_RE.replace_all(&stripped, "$1");
    let collapsed = EMPTY_LINK_RE.replace_all(&labelled, "$1");

    collapsed.chars().take(MAX_TITLE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_with_link() {
        assert_eq!(
            title_from_body("# Hello [world](http://x)\nmore text"),
            "Hello world"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(title_from_body(""), "");
        assert_eq!(title_from_body("  \n\t\n"), "");
    }

    #[test]
    fn test_skips_leading_blank_lines() {
        assert_eq!(title_from_body("\n\n  Shopping list  \n- eggs"), "Shopping list");
    }

    #[test]
    fn test_strips_list_and_emphasis_markers() {
        assert_eq!(title_from_body("- **Buy milk**"), "Buy milk**");
        assert_eq!(title_from_body("* `code` thing"), "code` thing");
        assert_eq!(title_from_body("### \t Deep heading"), "Deep heading");
    }

    #[test]
    fn test_image_and_empty_label_links() {
        assert_eq!(title_from_body("![diagram](:/abc) overview"), "diagram overview");
        assert_eq!(
            title_from_body("[](https://example.com/page)"),
            "https://example.com/page"
        );
        // Unlabelled images collapse to their URL as well
        assert_eq!(title_from_body("![](:/abc) caption"), ":/abc caption");
    }

    #[test]
    fn test_truncates_after_collapsing_links() {
        let label = "a".repeat(70);
        let body = format!("[{label}](https://example.com/{})", "b".repeat(50));
        // The raw line is longer than the limit but the label is not
        assert_eq!(title_from_body(&body), label);

        let long = "é".repeat(100);
        assert_eq!(title_from_body(&long).chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(title_from_body("Title line\r\nBody"), "Title line");
    }
}
