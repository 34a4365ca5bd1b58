use super::input::read_markdown;
use anyhow::Result;
use notemark_core::title_from_body;
use std::path::Path;

pub fn show_title(file: Option<&Path>) -> Result<()> {
    let body = read_markdown(file)?;
    println!("{}", title_from_body(&body));
    Ok(())
}
