//! GitHub-Flavored-Markdown table generation and measurement.

use crate::escape::escape_table_cell;
use notemark_types::Justify;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

const MIN_CELL_WIDTH: usize = 5;

static DIVIDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s\-:|]*$").expect("valid divider regex"));

/// Transform applied to a raw cell value before escaping
pub type CellFilter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// One output column: which row key to read and how to present it
#[derive(Clone)]
pub struct TableHeader {
    pub name: String,
    pub label: String,
    pub justify: Justify,
    pub disable_escape: bool,
    pub filter: Option<CellFilter>,
}

impl TableHeader {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            justify: Justify::Left,
            disable_escape: false,
            filter: None,
        }
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    /// Emit cell values verbatim. The caller is then responsible for keeping
    /// newlines and pipes out of them.
    pub fn disable_escape(mut self) -> Self {
        self.disable_escape = true;
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    fn cell(&self, row: &TableRow) -> String {
        let raw = row.get(&self.name).unwrap_or_default();
        let value = match &self.filter {
            Some(filter) => filter(raw),
            None => raw.to_string(),
        };
        if self.disable_escape {
            value
        } else {
            escape_table_cell(&value)
        }
    }
}

impl fmt::Debug for TableHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHeader")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("justify", &self.justify)
            .field("disable_escape", &self.disable_escape)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Cell values keyed by header name, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<(String, String)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, replacing any earlier value for the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TableRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = TableRow::new();
        for (key, value) in iter {
            row.set(key, value);
        }
        row
    }
}

fn render_line<I>(cells: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let padded: Vec<String> = cells
        .into_iter()
        .map(|cell| format!("{:<width$}", cell, width = MIN_CELL_WIDTH))
        .collect();
    format!("| {} |", padded.join(" | "))
}

/// Render a markdown table: header row, divider row, then one line per row.
///
/// Every line has exactly one cell per header. Missing keys render as empty
/// cells.
pub fn create_markdown_table(headers: &[TableHeader], rows: &[TableRow]) -> String {
    let mut output = Vec::with_capacity(rows.len() + 2);

    output.push(render_line(headers.iter().map(|h| h.label.clone())));
    output.push(render_line(
        headers.iter().map(|h| h.justify.divider().to_string()),
    ));

    for row in rows {
        output.push(render_line(headers.iter().map(|h| h.cell(row))));
    }

    output.join("\n")
}

/// Number of cells in a table line. Leading and trailing pipes are
/// decoration and do not separate cells.
pub fn count_table_columns(line: &str) -> usize {
    if line.is_empty() {
        return 0;
    }

    let trimmed = line.trim();
    let mut separators = line.matches('|').count() as isize;
    if trimmed.starts_with('|') {
        separators -= 1;
    }
    if trimmed.ends_with('|') {
        separators -= 1;
    }

    (separators + 1).max(0) as usize
}

/// Whether `divider_line` is a valid divider row for `header_line`: only
/// whitespace, `-`, `:` and `|`, declaring at least as many columns as the
/// header.
pub fn matching_table_divider(header_line: &str, divider_line: &str) -> bool {
    if header_line.is_empty() || divider_line.is_empty() {
        return false;
    }
    if !DIVIDER_RE.is_match(divider_line) {
        return false;
    }

    let header_columns = count_table_columns(header_line);
    let divider_columns = count_table_columns(divider_line);
    divider_columns > 0 && divider_columns >= header_columns
}
