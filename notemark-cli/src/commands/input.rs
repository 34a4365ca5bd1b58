use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a markdown document from `path`, or stdin when absent or `-`.
pub fn read_markdown(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path)),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
