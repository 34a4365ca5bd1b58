//! Single-line inspection helpers for editor integrations.

use anyhow::Result;
use notemark_core::{
    count_table_columns, is_empty_list_item, match_list_line, matching_table_divider,
};
use notemark_types::ListMatch;
use serde::Serialize;

#[derive(Serialize)]
struct ListItemReport {
    is_list_item: bool,
    is_empty: bool,
    #[serde(flatten)]
    parts: Option<ListMatch>,
}

#[derive(Serialize)]
struct TableCheckReport {
    header_columns: usize,
    divider_columns: usize,
    matches: bool,
}

pub fn inspect_list_item(line: &str) -> Result<()> {
    let parts = match_list_line(line);
    let report = ListItemReport {
        is_list_item: parts.is_some(),
        is_empty: is_empty_list_item(line),
        parts,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn check_table(header: &str, divider: &str) -> Result<()> {
    let report = TableCheckReport {
        header_columns: count_table_columns(header),
        divider_columns: count_table_columns(divider),
        matches: matching_table_divider(header, divider),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
