//! List URLs referenced by a markdown document.

use super::input::read_markdown;
use anyhow::Result;
use notemark_core::{extract_file_urls, Config, ExtractOptions, FileUrls};
use std::path::Path;

/// Command-line overrides applied on top of the configured extract options
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFilters {
    pub images_only: bool,
    pub no_images: bool,
    pub no_anchors: bool,
    pub html: bool,
    pub json: bool,
}

impl UrlFilters {
    fn apply(&self, base: ExtractOptions) -> ExtractOptions {
        let mut options = base;
        if self.images_only || self.no_anchors {
            options.include_anchors = false;
        }
        if self.no_images {
            options.include_images = false;
        }
        if self.html {
            options.html = true;
        }
        options.detailed_results = self.json;
        options
    }
}

pub fn list_urls(config: &Config, file: Option<&Path>, filters: UrlFilters) -> Result<()> {
    let markdown = read_markdown(file)?;
    let options = filters.apply(config.extract);

    match extract_file_urls(&markdown, &options) {
        FileUrls::Detailed(found) => {
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        FileUrls::Plain(urls) => {
            for url in urls {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_override_config() {
        let config = ExtractOptions {
            html: false,
            ..Default::default()
        };
        let filters = UrlFilters {
            images_only: true,
            html: true,
            json: true,
            ..Default::default()
        };
        let options = filters.apply(config);
        assert!(options.include_images);
        assert!(!options.include_anchors);
        assert!(options.html);
        assert!(options.detailed_results);
    }

    #[test]
    fn test_no_filters_keep_config() {
        let config = ExtractOptions {
            include_anchors: false,
            html: true,
            ..Default::default()
        };
        let options = UrlFilters::default().apply(config);
        assert_eq!(options, config);
    }
}
