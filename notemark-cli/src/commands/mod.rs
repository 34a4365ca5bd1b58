//! CLI command implementations.

pub mod inspect;
pub mod rewrite;
pub mod table;
pub mod title;
pub mod urls;

mod input;

pub use inspect::{check_table, inspect_list_item};
pub use rewrite::{prepend_base, rewrite_resource};
pub use table::render_table;
pub use title::show_title;
pub use urls::{list_urls, UrlFilters};
