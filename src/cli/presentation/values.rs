//! Value listings: comfy-table for terminals, JSON for scripts.

use crate::error::ApiError;
use crate::types::StoreEntry;
use comfy_table::Table;
use serde_json::json;

const DEFAULT_VALUE_NAME: &str = "(Default)";

pub fn format_entries_text(key: &str, entries: &[StoreEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n  (no values)", key);
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Name", "Type", "Data"]);
    for entry in entries {
        let name = if entry.name.is_empty() {
            DEFAULT_VALUE_NAME
        } else {
            entry.name.as_str()
        };
        table.add_row(vec![
            name.to_string(),
            entry.entry_type.name().to_string(),
            entry.display_data(),
        ]);
    }
    format!("{}\n{}", key, table)
}

pub fn format_entries_json(key: &str, entries: &[StoreEntry]) -> Result<String, ApiError> {
    let values: Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            json!({
                "name": e.name,
                "type": e.entry_type.name(),
                "data": e.display_data(),
                "raw": hex::encode(&e.data),
            })
        })
        .collect();
    let out = json!({ "key": key, "values": values });
    Ok(serde_json::to_string_pretty(&out)?)
}
