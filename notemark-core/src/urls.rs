//! Collecting image and link URLs from a markdown document.
//!
//! Markdown links and images are read from the attributes of the token tree.
//! Raw HTML is not decomposed into attributes by the tokenizer, so
//! `html_block`/`html_inline` content is scanned separately for `<img src>`
//! and `<a href>`.

use crate::tokens::{AcceptAll, TokenId, TokenKind, TokenTree, Tokenizer};
use notemark_types::{ExtractedUrl, UrlKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Tag bodies may contain `>` inside quoted attribute values.
static HTML_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<img(\s(?:[^>"']|"[^"]*"|'[^']*')*?)src=["']([^"']+?)["']((?:[^>"']|"[^"]*"|'[^']*')*?)>"#,
    )
    .expect("valid html image regex")
});

static HTML_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<a(\s(?:[^>"']|"[^"]*"|'[^']*')*?)href=["']([^"']+?)["']((?:[^>"']|"[^"]*"|'[^']*')*?)>"#,
    )
    .expect("valid html anchor regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub include_images: bool,
    pub include_anchors: bool,
    /// Return `{url, kind}` records instead of bare URLs
    pub detailed_results: bool,
    /// Tokenize raw HTML as HTML rather than plain text
    pub html: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_images: true,
            include_anchors: true,
            detailed_results: false,
            html: false,
        }
    }
}

impl ExtractOptions {
    pub fn images_only() -> Self {
        Self {
            include_anchors: false,
            ..Self::default()
        }
    }
}

/// Result of [`extract_file_urls`], shaped by `detailed_results`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileUrls {
    Plain(Vec<String>),
    Detailed(Vec<ExtractedUrl>),
}

impl FileUrls {
    pub fn len(&self) -> usize {
        match self {
            FileUrls::Plain(urls) => urls.len(),
            FileUrls::Detailed(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The URLs alone, whichever shape was produced
    pub fn into_urls(self) -> Vec<String> {
        match self {
            FileUrls::Plain(urls) => urls,
            FileUrls::Detailed(urls) => urls.into_iter().map(|u| u.url).collect(),
        }
    }
}

/// Extract anchor and image URLs in document order, duplicates included.
pub fn extract_file_urls(markdown: &str, options: &ExtractOptions) -> FileUrls {
    let found = collect_file_urls(markdown, options);
    if options.detailed_results {
        FileUrls::Detailed(found)
    } else {
        FileUrls::Plain(found.into_iter().map(|u| u.url).collect())
    }
}

/// Like [`extract_file_urls`] but always returns `{url, kind}` records.
pub fn collect_file_urls(markdown: &str, options: &ExtractOptions) -> Vec<ExtractedUrl> {
    // Application schemes such as `:/id` must survive tokenization.
    let tree = Tokenizer::new()
        .with_validator(AcceptAll)
        .html(options.html)
        .parse(markdown);

    let mut collector = UrlCollector {
        tree: &tree,
        options,
        found: Vec::new(),
        from_html: 0,
    };
    for root in tree.roots() {
        collector.visit(*root);
    }

    debug!(
        "Extracted {} URLs ({} from raw HTML)",
        collector.found.len(),
        collector.from_html
    );
    collector.found
}

pub fn extract_image_urls(markdown: &str) -> Vec<String> {
    extract_file_urls(markdown, &ExtractOptions::images_only()).into_urls()
}

struct UrlCollector<'a> {
    tree: &'a TokenTree,
    options: &'a ExtractOptions,
    found: Vec<ExtractedUrl>,
    from_html: usize,
}

impl UrlCollector<'_> {
    fn visit(&mut self, id: TokenId) {
        let token = self.tree.get(id);

        match token.kind {
            TokenKind::Image if self.options.include_images => {
                self.record_attrs(id, UrlKind::Image)
            }
            TokenKind::Link if self.options.include_anchors => {
                self.record_attrs(id, UrlKind::Anchor)
            }
            TokenKind::HtmlBlock | TokenKind::HtmlInline => self.scan_html(&token.content),
            _ => {}
        }

        for child in &token.children {
            self.visit(*child);
        }
    }

    fn record_attrs(&mut self, id: TokenId, kind: UrlKind) {
        let token = self.tree.get(id);
        for (name, value) in &token.attrs {
            if (name == "src" || name == "href") && !value.is_empty() {
                self.found.push(ExtractedUrl::new(value.clone(), kind));
            }
        }
    }

    fn scan_html(&mut self, html: &str) {
        let before = self.found.len();

        if self.options.include_images {
            for caps in HTML_IMAGE_RE.captures_iter(html) {
                if let Some(url) = caps.get(2) {
                    self.found.push(ExtractedUrl::image(url.as_str()));
                }
            }
        }

        if self.options.include_anchors {
            for caps in HTML_ANCHOR_RE.captures_iter(html) {
                if let Some(url) = caps.get(2) {
                    self.found.push(ExtractedUrl::anchor(url.as_str()));
                }
            }
        }

        self.from_html += self.found.len() - before;
    }
}
