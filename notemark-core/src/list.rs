//! Recognizing lines that open a markdown list item.
//!
//! A list line is leading whitespace, a bullet token, then whitespace. The
//! bullet token is one of `*`, `+`, `-`, a task checkbox (`- [ ]`, `* [x]`,
//! ...) or a decimal ordinal followed by `.` or `)`. The token always
//! includes the single whitespace character that terminates it.

use notemark_types::ListMatch;
use once_cell::sync::Lazy;
use regex::Regex;

static LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([*+-] \[[x ]\]\s|[*+-]\s|(\d+)[.)]\s)(\s*)")
        .expect("valid list item regex")
});

static EMPTY_LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*)([*+-] \[[x ]\]|[*+-]|(\d+)[.)])(\s+)$")
        .expect("valid empty list item regex")
});

/// Split a list line into its leading whitespace, token, ordinal and the
/// whitespace that follows the token.
pub fn match_list_line(line: &str) -> Option<ListMatch> {
    let caps = LIST_RE.captures(line)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

    Some(ListMatch {
        leading_whitespace: group(1).to_string(),
        token: group(2).to_string(),
        // Digits only, so parsing fails only on overflow
        ordinal: caps
            .get(3)
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX)),
        trailing_whitespace: group(4).to_string(),
    })
}

pub fn is_list_item(line: &str) -> bool {
    LIST_RE.is_match(line)
}

/// True when the line holds a bullet token and nothing but whitespace after
/// it, e.g. `"- "` or `"  3. "`.
pub fn is_empty_list_item(line: &str) -> bool {
    EMPTY_LIST_RE.is_match(line)
}

/// The bullet token exactly as written (`"- "`, `"3. "`, `"* [x] "`), or an
/// empty string when the line is not a list item.
pub fn extract_list_token(line: &str) -> String {
    match_list_line(line)
        .map(|m| m.token)
        .unwrap_or_default()
}

/// Ordinal of an ordered list line, `0` otherwise.
///
/// `0` is also a legal ordinal; use [`match_list_line`] when the difference
/// matters. Ordinals too large for a `u64` saturate at `u64::MAX`.
pub fn ol_line_number(line: &str) -> u64 {
    match_list_line(line)
        .and_then(|m| m.ordinal)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_list_item() {
        assert!(is_list_item("- item"));
        assert!(is_list_item("* item"));
        assert!(is_list_item("+ item"));
        assert!(is_list_item("1. item"));
        assert!(is_list_item("12) item"));
        assert!(is_list_item("    - nested"));
        assert!(is_list_item("- [ ] todo"));
        assert!(is_list_item("- [x] done"));
        assert!(!is_list_item("item"));
        assert!(!is_list_item("-item"));
        assert!(!is_list_item("1.item"));
        assert!(!is_list_item("# heading"));
        assert!(!is_list_item(""));
    }

    #[test]
    fn test_is_empty_list_item() {
        assert!(is_empty_list_item("- "));
        assert!(is_empty_list_item("  * "));
        assert!(is_empty_list_item("3. "));
        assert!(is_empty_list_item("- [ ] "));
        assert!(is_empty_list_item("- [x]  "));
        assert!(!is_empty_list_item("- x"));
        assert!(!is_empty_list_item("-"));
        assert!(!is_empty_list_item("1. one"));
        assert!(!is_empty_list_item(""));
    }

    #[test]
    fn test_extract_list_token() {
        assert_eq!(extract_list_token("- item"), "- ");
        assert_eq!(extract_list_token("3. item"), "3. ");
        assert_eq!(extract_list_token("4) item"), "4) ");
        assert_eq!(extract_list_token("* [x] done"), "* [x] ");
        assert_eq!(extract_list_token("  + [ ] todo"), "+ [ ] ");
        assert_eq!(extract_list_token("not a list"), "");
    }

    #[test]
    fn test_ol_line_number() {
        assert_eq!(ol_line_number("1. item"), 1);
        assert_eq!(ol_line_number("  42) item"), 42);
        assert_eq!(ol_line_number("- item"), 0);
        assert_eq!(ol_line_number("text"), 0);
        assert_eq!(ol_line_number("0. zero"), 0);
    }

    #[test]
    fn test_match_list_line_fields() {
        let m = match_list_line("  7.   seven").expect("ordered item");
        assert_eq!(m.leading_whitespace, "  ");
        assert_eq!(m.token, "7. ");
        assert_eq!(m.ordinal, Some(7));
        assert_eq!(m.trailing_whitespace, "  ");
        assert!(m.is_ordered());

        let m = match_list_line("- [ ] task").expect("task item");
        assert_eq!(m.ordinal, None);
        assert!(m.is_task());

        // Ordinal zero is distinguishable here, unlike ol_line_number
        let m = match_list_line("0. zero").expect("ordered item");
        assert_eq!(m.ordinal, Some(0));

        assert!(match_list_line("plain").is_none());
    }

    #[test]
    fn test_long_ordinals() {
        assert!(is_list_item("1234567890. ten digits"));
        assert!(is_empty_list_item("1234567890. "));
        assert_eq!(extract_list_token("1234567890. ten digits"), "1234567890. ");
        assert_eq!(ol_line_number("1234567890. ten digits"), 1_234_567_890);

        let huge = "1234567890123456789012345. x";
        assert!(is_list_item(huge));
        assert_eq!(ol_line_number(huge), u64::MAX);
        assert_eq!(
            match_list_line(huge).and_then(|m| m.ordinal),
            Some(u64::MAX)
        );
    }
}
