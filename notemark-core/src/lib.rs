//! # notemark-core
//!
//! Markdown utilities for a note-taking application.
//!
//! This crate extracts file, image and link URLs from markdown (including
//! raw HTML), rewrites and escapes link targets, builds and measures GFM
//! tables, recognizes list lines and derives note titles. Every operation is
//! a pure function over its inputs.

pub mod config;
pub mod escape;
pub mod list;
pub mod rewrite;
pub mod table;
pub mod title;
pub mod tokens;
pub mod urls;

pub use config::{Config, ConfigError, TableLayout};
pub use escape::{
    escape_inline_code, escape_link_url, escape_table_cell, escape_title_text, unescape_link_url,
};
pub use list::{
    extract_list_token, is_empty_list_item, is_list_item, match_list_line, ol_line_number,
};
pub use notemark_types::{ExtractedUrl, Justify, ListMatch, UrlKind};
pub use rewrite::{prepend_base_url, prepend_base_url_with, replace_resource_url};
pub use table::{
    count_table_columns, create_markdown_table, matching_table_divider, TableHeader, TableRow,
};
pub use title::title_from_body;
pub use tokens::{LinkValidator, TokenTree, Tokenizer};
pub use urls::{collect_file_urls, extract_file_urls, extract_image_urls, ExtractOptions, FileUrls};
