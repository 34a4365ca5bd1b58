//! Link target rewriting commands.

use super::input::read_markdown;
use anyhow::{bail, Result};
use notemark_core::{prepend_base_url, replace_resource_url, Config};
use std::path::Path;

/// Replace links to `url` with the internal reference `:/<id>`
pub fn rewrite_resource(file: Option<&Path>, url: &str, id: &str) -> Result<()> {
    let markdown = read_markdown(file)?;
    print!("{}", replace_resource_url(&markdown, url, id));
    Ok(())
}

/// Resolve relative link targets against the given or configured base URL
pub fn prepend_base(config: &Config, file: Option<&Path>, base: Option<&str>) -> Result<()> {
    let Some(base) = base.or(config.base_url.as_deref()) else {
        bail!("No base URL given; pass --base or set base_url in the config");
    };

    let markdown = read_markdown(file)?;
    tracing::debug!("Resolving links against {}", base);
    print!("{}", prepend_base_url(&markdown, base));
    Ok(())
}
