//! Shared types for notemark
//!
//! This crate provides the plain data shapes produced and consumed by the
//! markdown utilities: extracted URLs, list-line matches and table column
//! justification.

use serde::{Deserialize, Serialize};

/// Where an extracted URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
    /// `href` of a markdown link or an `<a>` tag
    Anchor,
    /// `src` of a markdown image or an `<img>` tag
    Image,
}

/// A URL found in a markdown document, in its encoded form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedUrl {
    pub url: String,
    pub kind: UrlKind,
}

impl ExtractedUrl {
    pub fn new(url: impl Into<String>, kind: UrlKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn anchor(url: impl Into<String>) -> Self {
        Self::new(url, UrlKind::Anchor)
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::new(url, UrlKind::Image)
    }
}

/// Column alignment declared by a table divider cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

impl Justify {
    /// Divider cell text for this alignment
    pub fn divider(self) -> &'static str {
        match self {
            Justify::Left => "-----",
            Justify::Center => ":---:",
            Justify::Right => "----:",
        }
    }
}

/// The pieces of a line that opens a list item
///
/// `token` is never empty. `ordinal` is set only for ordered items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMatch {
    pub leading_whitespace: String,
    pub token: String,
    pub ordinal: Option<u64>,
    pub trailing_whitespace: String,
}

impl ListMatch {
    pub fn is_ordered(&self) -> bool {
        self.ordinal.is_some()
    }

    pub fn is_task(&self) -> bool {
        self.token.contains("[ ]") || self.token.contains("[x]")
    }
}
