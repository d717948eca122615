//! CLI presentation: text and json formatters per command family.

mod tree;
mod values;

pub use tree::{format_tree_json, format_tree_text};
pub use values::{format_entries_json, format_entries_text};
