//! Token tree built from the pulldown-cmark event stream.
//!
//! pulldown-cmark reports a flat sequence of start/end events. The URL
//! extractor wants a tree it can walk (typed tokens with attributes, text
//! content and children), so [`Tokenizer::parse`] folds the events into an
//! arena owned by a single [`TokenTree`]. Tokens refer to their children by
//! [`TokenId`]; nothing in the tree is mutated after parsing.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::ops::Index;
use tracing::debug;

/// Characters left untouched when normalizing a link destination. Everything
/// else outside `[A-Za-z0-9]` is percent-encoded.
const LINK_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b',')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

static BAD_PROTO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(vbscript|javascript|file|data):").expect("valid protocol regex")
});

static GOOD_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^data:image/(gif|png|jpeg|webp);").expect("valid data url regex")
});

/// Decides whether a link or image destination is kept as a link.
pub trait LinkValidator {
    fn validate(&self, url: &str) -> bool;
}

impl<F> LinkValidator for F
where
    F: Fn(&str) -> bool,
{
    fn validate(&self, url: &str) -> bool {
        self(url)
    }
}

/// Rejects script-capable and local-file schemes; inline images in common
/// raster formats are allowed through.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLinkValidator;

impl LinkValidator for DefaultLinkValidator {
    fn validate(&self, url: &str) -> bool {
        let url = url.trim();
        !BAD_PROTO_RE.is_match(url) || GOOD_DATA_RE.is_match(url)
    }
}

/// Accepts every destination, including application schemes like `:/id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl LinkValidator for AcceptAll {
    fn validate(&self, _url: &str) -> bool {
        true
    }
}

/// Index of a token inside its [`TokenTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Paragraph,
    Heading(u8),
    BlockQuote,
    CodeBlock,
    List { ordered: bool },
    ListItem,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    FootnoteDefinition,
    Link,
    Image,
    HtmlBlock,
    HtmlInline,
    Text,
    Code,
    Math,
    FootnoteReference,
    TaskListMarker(bool),
    SoftBreak,
    HardBreak,
    Rule,
    Other,
}

impl TokenKind {
    /// markdown-it style name for the token type
    pub fn type_name(self) -> &'static str {
        match self {
            TokenKind::Paragraph => "paragraph_open",
            TokenKind::Heading(_) => "heading_open",
            TokenKind::BlockQuote => "blockquote_open",
            TokenKind::CodeBlock => "fence",
            TokenKind::List { ordered: true } => "ordered_list_open",
            TokenKind::List { ordered: false } => "bullet_list_open",
            TokenKind::ListItem => "list_item_open",
            TokenKind::Table => "table_open",
            TokenKind::TableHead => "thead_open",
            TokenKind::TableRow => "tr_open",
            TokenKind::TableCell => "td_open",
            TokenKind::Emphasis => "em_open",
            TokenKind::Strong => "strong_open",
            TokenKind::Strikethrough => "s_open",
            TokenKind::FootnoteDefinition => "footnote_open",
            TokenKind::Link => "link_open",
            TokenKind::Image => "image",
            TokenKind::HtmlBlock => "html_block",
            TokenKind::HtmlInline => "html_inline",
            TokenKind::Text => "text",
            TokenKind::Code => "code_inline",
            TokenKind::Math => "math",
            TokenKind::FootnoteReference => "footnote_ref",
            TokenKind::TaskListMarker(_) => "task_marker",
            TokenKind::SoftBreak => "softbreak",
            TokenKind::HardBreak => "hardbreak",
            TokenKind::Rule => "hr",
            TokenKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub attrs: Vec<(String, String)>,
    pub content: String,
    pub children: Vec<TokenId>,
}

impl Token {
    fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            content: String::new(),
            children: Vec::new(),
        }
    }

    /// First value of the named attribute
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Read-only token tree produced by one [`Tokenizer::parse`] call
#[derive(Debug, Clone, Default)]
pub struct TokenTree {
    tokens: Vec<Token>,
    roots: Vec<TokenId>,
}

impl TokenTree {
    pub fn roots(&self) -> &[TokenId] {
        &self.roots
    }

    pub fn get(&self, id: TokenId) -> &Token {
        &self.tokens[id.0]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in pre-order: each token before its children, siblings left to
    /// right.
    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        let mut stack: Vec<TokenId> = self.roots.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let token = self.get(id);
            stack.extend(token.children.iter().rev().copied());
            Some(token)
        })
    }

    /// Concatenated text and code content below `id`
    pub fn text_content(&self, id: TokenId) -> String {
        let mut out = String::new();
        collect_text(&self.tokens, id, &mut out);
        out
    }
}

impl Index<TokenId> for TokenTree {
    type Output = Token;

    fn index(&self, id: TokenId) -> &Token {
        self.get(id)
    }
}

fn collect_text(tokens: &[Token], id: TokenId, out: &mut String) {
    let token = &tokens[id.0];
    match token.kind {
        TokenKind::Text | TokenKind::Code | TokenKind::Math => out.push_str(&token.content),
        _ => {}
    }
    for child in &token.children {
        collect_text(tokens, *child, out);
    }
}

/// Incremental arena construction. Each open frame is either a real token or
/// `None` for a link whose destination was rejected; children of a rejected
/// link attach to the nearest real ancestor.
#[derive(Default)]
struct TreeBuilder {
    tokens: Vec<Token>,
    roots: Vec<TokenId>,
    stack: Vec<Option<TokenId>>,
}

impl TreeBuilder {
    fn push(&mut self, token: Token) -> TokenId {
        let id = TokenId(self.tokens.len());
        self.tokens.push(token);
        match self.stack.iter().rev().find_map(|frame| *frame) {
            Some(parent) => self.tokens[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn open(&mut self, token: Token) {
        let id = self.push(token);
        self.stack.push(Some(id));
    }

    fn open_transparent(&mut self) {
        self.stack.push(None);
    }

    fn leaf(&mut self, kind: TokenKind, content: &str) {
        let mut token = Token::new(kind);
        token.content.push_str(content);
        self.push(token);
    }

    fn append_content(&mut self, text: &str) {
        match self.stack.last().copied().flatten() {
            Some(id) => self.tokens[id.0].content.push_str(text),
            None => self.leaf(TokenKind::Text, text),
        }
    }

    fn close(&mut self) {
        let Some(Some(id)) = self.stack.pop() else {
            return;
        };
        if self.tokens[id.0].kind == TokenKind::Image {
            let mut alt = String::new();
            for child in self.tokens[id.0].children.clone() {
                collect_text(&self.tokens, child, &mut alt);
            }
            self.tokens[id.0].attrs.insert(1, ("alt".to_string(), alt));
        }
    }

    /// Copy every token of `tree` under the current parent.
    fn graft(&mut self, tree: &TokenTree) {
        for root in tree.roots() {
            self.graft_token(tree, *root);
        }
    }

    fn graft_token(&mut self, tree: &TokenTree, id: TokenId) {
        let token = tree.get(id);
        let id = self.push(Token {
            kind: token.kind,
            attrs: token.attrs.clone(),
            content: token.content.clone(),
            children: Vec::new(),
        });
        self.stack.push(Some(id));
        for child in &token.children {
            self.graft_token(tree, *child);
        }
        self.stack.pop();
    }

    fn finish(self) -> TokenTree {
        TokenTree {
            tokens: self.tokens,
            roots: self.roots,
        }
    }
}

/// Markdown tokenizer backed by pulldown-cmark
pub struct Tokenizer<V = DefaultLinkValidator> {
    options: Options,
    html: bool,
    validator: V,
}

impl Tokenizer<DefaultLinkValidator> {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self {
            options,
            html: false,
            validator: DefaultLinkValidator,
        }
    }
}

impl Default for Tokenizer<DefaultLinkValidator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: LinkValidator> Tokenizer<V> {
    /// Replace the link validation policy
    pub fn with_validator<W: LinkValidator>(self, validator: W) -> Tokenizer<W> {
        Tokenizer {
            options: self.options,
            html: self.html,
            validator,
        }
    }

    /// Keep raw HTML as `html_block`/`html_inline` tokens. When disabled,
    /// raw HTML is reported as plain text and markdown inside HTML blocks is
    /// still tokenized.
    pub fn html(mut self, enabled: bool) -> Self {
        self.html = enabled;
        self
    }

    pub fn parse(&self, text: &str) -> TokenTree {
        let mut builder = TreeBuilder::default();
        let mut in_html_block = false;
        // Raw HTML block text collected for re-tokenizing when HTML is off
        let mut raw_html: Option<String> = None;

        for event in Parser::new_ext(text, self.options) {
            match event {
                Event::Start(Tag::HtmlBlock) => {
                    in_html_block = true;
                    if self.html {
                        builder.open(Token::new(TokenKind::HtmlBlock));
                    } else {
                        raw_html = Some(String::new());
                    }
                }
                Event::End(TagEnd::HtmlBlock) => {
                    in_html_block = false;
                    match raw_html.take() {
                        Some(raw) => builder.graft(&self.parse(&neutralize_html_lines(&raw))),
                        None => builder.close(),
                    }
                }
                Event::Start(tag) => self.open(&mut builder, tag),
                Event::End(_) => builder.close(),
                Event::Html(html) if in_html_block => match raw_html.as_mut() {
                    Some(raw) => raw.push_str(&html),
                    None => builder.append_content(&html),
                },
                Event::Html(html) | Event::InlineHtml(html) => {
                    let kind = if self.html {
                        TokenKind::HtmlInline
                    } else {
                        TokenKind::Text
                    };
                    builder.leaf(kind, &html);
                }
                Event::Text(text) => builder.leaf(TokenKind::Text, &text),
                Event::Code(code) => builder.leaf(TokenKind::Code, &code),
                Event::InlineMath(math) | Event::DisplayMath(math) => {
                    builder.leaf(TokenKind::Math, &math)
                }
                Event::FootnoteReference(label) => {
                    builder.leaf(TokenKind::FootnoteReference, &label)
                }
                Event::TaskListMarker(checked) => {
                    builder.leaf(TokenKind::TaskListMarker(checked), "")
                }
                Event::SoftBreak => builder.leaf(TokenKind::SoftBreak, ""),
                Event::HardBreak => builder.leaf(TokenKind::HardBreak, ""),
                Event::Rule => builder.leaf(TokenKind::Rule, ""),
            }
        }

        builder.finish()
    }

    fn open(&self, builder: &mut TreeBuilder, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let dest = match link_type {
                    LinkType::Email => format!("mailto:{}", &*dest_url),
                    _ => dest_url.to_string(),
                };
                self.open_link(builder, TokenKind::Link, "href", &dest, &title);
                return;
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.open_link(builder, TokenKind::Image, "src", &dest_url, &title);
                return;
            }
            Tag::Paragraph => TokenKind::Paragraph,
            Tag::Heading { level, .. } => TokenKind::Heading(level as u8),
            Tag::BlockQuote(_) => TokenKind::BlockQuote,
            Tag::CodeBlock(_) => TokenKind::CodeBlock,
            Tag::List(start) => TokenKind::List {
                ordered: start.is_some(),
            },
            Tag::Item => TokenKind::ListItem,
            Tag::Table(_) => TokenKind::Table,
            Tag::TableHead => TokenKind::TableHead,
            Tag::TableRow => TokenKind::TableRow,
            Tag::TableCell => TokenKind::TableCell,
            Tag::Emphasis => TokenKind::Emphasis,
            Tag::Strong => TokenKind::Strong,
            Tag::Strikethrough => TokenKind::Strikethrough,
            Tag::FootnoteDefinition(_) => TokenKind::FootnoteDefinition,
            _ => TokenKind::Other,
        };
        builder.open(Token::new(kind));
    }

    fn open_link(
        &self,
        builder: &mut TreeBuilder,
        kind: TokenKind,
        attr: &str,
        dest: &str,
        title: &str,
    ) {
        let url = normalize_link(dest);
        if !self.validator.validate(&url) {
            debug!("Rejected {} destination '{}'", kind.type_name(), url);
            builder.open_transparent();
            return;
        }

        let mut token = Token::new(kind);
        token.attrs.push((attr.to_string(), url));
        if !title.is_empty() {
            token.attrs.push(("title".to_string(), title.to_string()));
        }
        builder.open(token);
    }
}

/// Escape the `<` opening each line so the text no longer starts an HTML
/// block and parses as ordinary markdown.
fn neutralize_html_lines(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + 8);
    for line in html.split_inclusive('\n') {
        let body = line.trim_start_matches(|c: char| c == ' ' || c == '\t');
        let indent = line.len() - body.len();
        out.push_str(&line[..indent]);
        if body.starts_with('<') {
            out.push('\\');
        }
        out.push_str(body);
    }
    out
}

/// Percent-encode a link destination, keeping URL punctuation and any
/// `%XX` escapes already present.
pub fn normalize_link(url: &str) -> String {
    let bytes = url.as_bytes();
    let mut out = String::with_capacity(url.len());
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.extend(utf8_percent_encode(&url[start..i], LINK_SAFE));
            out.push_str(&url[i..i + 3]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }
    out.extend(utf8_percent_encode(&url[start..], LINK_SAFE));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tree: &TokenTree) -> Vec<&'static str> {
        tree.iter().map(|t| t.kind.type_name()).collect()
    }

    #[test]
    fn test_link_tree_shape() {
        let tree = Tokenizer::new().parse("[text](http://x.com)");
        assert_eq!(kinds(&tree), vec!["paragraph_open", "link_open", "text"]);

        let link = tree.iter().find(|t| t.kind == TokenKind::Link).unwrap();
        assert_eq!(link.attr("href"), Some("http://x.com"));
        assert_eq!(link.attr("title"), None);
        assert_eq!(tree[link.children[0]].content, "text");
    }

    #[test]
    fn test_image_attrs() {
        let tree = Tokenizer::new().parse("![a *b*](pic.png \"Title\")");
        let image = tree.iter().find(|t| t.kind == TokenKind::Image).unwrap();
        assert_eq!(
            image.attrs,
            vec![
                ("src".to_string(), "pic.png".to_string()),
                ("alt".to_string(), "a b".to_string()),
                ("title".to_string(), "Title".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_validator_drops_script_links() {
        let tree = Tokenizer::new().parse("[click](javascript:alert(1))");
        assert!(tree.iter().all(|t| t.kind != TokenKind::Link));
        // Link text is kept under the paragraph
        let para = &tree[tree.roots()[0]];
        assert_eq!(para.kind, TokenKind::Paragraph);
        assert_eq!(tree.text_content(tree.roots()[0]), "click");
    }

    #[test]
    fn test_default_validator_policy() {
        let v = DefaultLinkValidator;
        assert!(v.validate("https://example.com"));
        assert!(v.validate(":/0123456789abcdef"));
        assert!(v.validate("data:image/png;base64,AAAA"));
        assert!(!v.validate("javascript:alert(1)"));
        assert!(!v.validate("file:///etc/passwd"));
        assert!(!v.validate("data:text/html;base64,AAAA"));
    }

    #[test]
    fn test_closure_validator() {
        let tokenizer = Tokenizer::new().with_validator(|url: &str| url.starts_with("https:"));
        let tree = tokenizer.parse("[a](http://a.com) [b](https://b.com)");
        let hrefs: Vec<_> = tree.iter().filter_map(|t| t.attr("href")).collect();
        assert_eq!(hrefs, vec!["https://b.com"]);
    }

    #[test]
    fn test_html_flag() {
        let source = "<div>\n<img src=\"a.png\">\n</div>\n\ntext <b>bold</b>";

        let tree = Tokenizer::new().html(true).parse(source);
        let names = kinds(&tree);
        assert!(names.contains(&"html_block"));
        assert!(names.contains(&"html_inline"));
        let block = tree.iter().find(|t| t.kind == TokenKind::HtmlBlock).unwrap();
        assert!(block.content.contains("<img src=\"a.png\">"));

        let tree = Tokenizer::new().html(false).parse(source);
        let names = kinds(&tree);
        assert!(!names.contains(&"html_block"));
        assert!(!names.contains(&"html_inline"));
    }

    #[test]
    fn test_html_block_text_is_tokenized_when_html_is_off() {
        let tree = Tokenizer::new().parse("<div>\n![img](a.png) and [doc](b.pdf)\n</div>\n");
        let names = kinds(&tree);
        assert_eq!(names[0], "paragraph_open");
        assert!(names.contains(&"image"));
        assert!(names.contains(&"link_open"));
        assert!(!names.contains(&"html_block"));
        assert_eq!(tree.text_content(tree.roots()[0]), "<div>img and doc</div>");
    }

    #[test]
    fn test_neutralize_html_lines() {
        assert_eq!(
            neutralize_html_lines("<div>\n  <p>x</p>\ntext\n"),
            "\\<div>\n  \\<p>x</p>\ntext\n"
        );
    }

    #[test]
    fn test_email_autolink_gets_mailto() {
        let tree = Tokenizer::new().parse("<me@example.com>");
        let hrefs: Vec<_> = tree.iter().filter_map(|t| t.attr("href")).collect();
        assert_eq!(hrefs, vec!["mailto:me@example.com"]);
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("image.png"), "image.png");
        assert_eq!(normalize_link("my file.png"), "my%20file.png");
        assert_eq!(normalize_link("a%20b"), "a%20b");
        assert_eq!(normalize_link("100%"), "100%25");
        assert_eq!(normalize_link("caf\u{e9}"), "caf%C3%A9");
        assert_eq!(normalize_link("https://x.com/a?b=c&d=(e)#f"), "https://x.com/a?b=c&d=(e)#f");
        assert_eq!(normalize_link(":/0123abcd"), ":/0123abcd");
    }
}
