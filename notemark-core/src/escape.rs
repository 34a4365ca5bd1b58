//! Character-level escaping for link titles, link URLs, table cells and
//! inline code.

/// Escape `[` and `]` so the text can sit inside a link label.
pub fn escape_title_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Percent-encode the characters that would end a markdown link target.
///
/// Each substitution runs as its own pass so later passes never see the
/// output of earlier ones as input to re-match.
pub fn escape_link_url(url: &str) -> String {
    url.replace('(', "%28")
        .replace(')', "%29")
        .replace(' ', "%20")
}

/// Inverse of [`escape_link_url`].
pub fn unescape_link_url(url: &str) -> String {
    url.replace("%28", "(")
        .replace("%29", ")")
        .replace("%20", " ")
}

/// Make arbitrary text safe to place in a single GFM table cell.
///
/// Angle brackets are escaped before newlines become `<br/>`, otherwise the
/// inserted markers would be escaped too.
pub fn escape_table_cell(text: &str) -> String {
    text.replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", "<br/>")
        .replace('\n', "<br/>")
        .replace('|', "\\|")
}

/// Double every backtick so the text survives inside a code span.
pub fn escape_inline_code(text: &str) -> String {
    text.replace('`', "``")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_title_text() {
        assert_eq!(escape_title_text("[a]"), "\\[a\\]");
        assert_eq!(escape_title_text("plain title"), "plain title");
        assert_eq!(escape_title_text("a [b] (c)"), "a \\[b\\] (c)");
    }

    #[test]
    fn test_escape_link_url() {
        assert_eq!(
            escape_link_url("https://example.com/a b (1).png"),
            "https://example.com/a%20b%20%281%29.png"
        );
        assert_eq!(escape_link_url(":/0123abcd"), ":/0123abcd");
    }

    #[test]
    fn test_unescape_link_url() {
        assert_eq!(unescape_link_url("my%20file%28v2%29.pdf"), "my file(v2).pdf");
        // Other escapes are left alone
        assert_eq!(unescape_link_url("a%2Fb"), "a%2Fb");
    }

    #[test]
    fn test_escape_table_cell() {
        assert_eq!(escape_table_cell("a|b"), "a\\|b");
        assert_eq!(escape_table_cell("line1\nline2"), "line1<br/>line2");
        assert_eq!(escape_table_cell("line1\r\nline2"), "line1<br/>line2");
        assert_eq!(escape_table_cell("<b>bold</b>"), "&lt;b&gt;bold&lt;/b&gt;");
        assert_eq!(escape_table_cell("x <y>\nz|"), "x &lt;y&gt;<br/>z\\|");
    }

    #[test]
    fn test_escape_table_cell_is_single_application() {
        let once = escape_table_cell("a|b");
        assert_eq!(once, "a\\|b");
        // A second pass escapes the pipe again; callers must escape exactly once.
        assert_eq!(escape_table_cell(&once), "a\\\\|b");
    }

    #[test]
    fn test_escape_inline_code() {
        assert_eq!(escape_inline_code("a`b"), "a``b");
        assert_eq!(escape_inline_code("``"), "````");
        assert_eq!(escape_inline_code("none"), "none");
    }

    proptest! {
        #[test]
        fn prop_link_url_round_trips(url in "[a-zA-Z0-9:/._ ()-]{0,40}") {
            prop_assert_eq!(unescape_link_url(&escape_link_url(&url)), url);
        }

        #[test]
        fn prop_table_cell_has_no_newline_or_bare_pipe(text in "[a-z|<>\n ]{0,40}") {
            let escaped = escape_table_cell(&text);
            prop_assert!(!escaped.contains('\n'));
            let bytes = escaped.as_bytes();
            for (i, b) in bytes.iter().enumerate() {
                if *b == b'|' {
                    prop_assert!(i > 0 && bytes[i - 1] == b'\\');
                }
            }
        }
    }
}
