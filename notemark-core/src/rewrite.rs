//! Rewriting link targets inside markdown source.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

static LINK_TARGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\]\()([^\s)]+)(.*?\))").expect("valid link target regex"));

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*:)").expect("valid scheme regex"));

static ORIGIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^/?#]*").expect("valid origin regex")
});

/// Replace `target_url` with the internal reference `:/<id>` wherever it is
/// the target of a markdown link or image.
///
/// A match must directly follow `](` (optionally inside `<...>`) and be
/// followed by a `)` later on the same line. The URL is matched literally.
pub fn replace_resource_url(markdown: &str, target_url: &str, id: &str) -> String {
    if target_url.is_empty() {
        return markdown.to_string();
    }

    let pattern = format!(r"\]\((<)?{}", regex::escape(target_url));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(err) => {
            warn!("Cannot build pattern for '{}': {}", target_url, err);
            return markdown.to_string();
        }
    };

    let replacement = format!(":/{id}");
    let mut output = String::with_capacity(markdown.len());
    let mut last = 0;
    let mut replaced = 0;

    for caps in re.captures_iter(markdown) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let rest = &markdown[whole.end()..];
        let rest_of_line = rest.split('\n').next().unwrap_or_default();
        if !rest_of_line.contains(')') {
            continue;
        }

        let mut end = whole.end();
        if caps.get(1).is_some() && rest.starts_with('>') {
            end += 1;
        }

        // Keep the `](` prefix
        output.push_str(&markdown[last..whole.start() + 2]);
        output.push_str(&replacement);
        last = end;
        replaced += 1;
    }
    output.push_str(&markdown[last..]);

    debug!("Replaced {} occurrences of '{}'", replaced, target_url);
    output
}

/// Resolve every markdown link target against `base_url` using
/// [`resolve_against_base`].
pub fn prepend_base_url(markdown: &str, base_url: &str) -> String {
    prepend_base_url_with(markdown, base_url, resolve_against_base)
}

/// Pass every markdown link target through `resolve`. The target is taken to
/// run from `](` up to the first whitespace or `)`.
pub fn prepend_base_url_with<F>(markdown: &str, base_url: &str, resolve: F) -> String
where
    F: Fn(&str, &str) -> String,
{
    LINK_TARGET_RE
        .replace_all(markdown, |caps: &Captures| {
            format!("{}{}{}", &caps[1], resolve(&caps[2], base_url), &caps[3])
        })
        .into_owned()
}

/// Make a possibly relative URL absolute against `base_url`.
///
/// Anchors (`#...`) and URLs with a scheme are returned unchanged, as is
/// everything when the base is empty. `//host/...` borrows the base's
/// scheme and `/path` is joined to the base's origin.
pub fn resolve_against_base(url: &str, base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let url = url.trim();

    if base.is_empty() || url.is_empty() || url.starts_with('#') || SCHEME_RE.is_match(url) {
        return url.to_string();
    }

    if url.starts_with("//") {
        return match SCHEME_RE.captures(base) {
            Some(caps) => format!("{}{}", &caps[1], url),
            None => url.to_string(),
        };
    }

    if url.starts_with('/') {
        let origin = ORIGIN_RE.find(base).map(|m| m.as_str()).unwrap_or(base);
        return format!("{origin}{url}");
    }

    format!("{base}/{url}")
}
