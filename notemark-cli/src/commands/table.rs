use anyhow::{Context, Result};
use notemark_core::config::load_rows;
use notemark_core::{create_markdown_table, TableLayout};
use std::path::Path;

/// Render rows from a JSON file using the columns of a YAML layout
pub fn render_table(layout_path: &Path, rows_path: &Path) -> Result<()> {
    let layout = TableLayout::from_file(layout_path)
        .with_context(|| format!("Failed to load table layout {:?}", layout_path))?;
    let rows =
        load_rows(rows_path).with_context(|| format!("Failed to load rows {:?}", rows_path))?;

    tracing::info!(
        "Rendering {} rows across {} columns",
        rows.len(),
        layout.columns.len()
    );
    println!("{}", create_markdown_table(&layout.headers(), &rows));
    Ok(())
}
