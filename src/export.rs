//! Textual export and import of keys in the `.reg` file format.

use crate::error::StoreError;
use crate::store::{AccessMode, Disposition, HierarchicalStore};
use crate::tree::path::{parse_qualified, qualified, KeyPath};
use crate::types::{EntryType, RootKey, StoreEntry};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// First line of every export
pub const HEADER: &str = "Windows Registry Editor Version 5.00";

/// Counts of what an import changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub keys_created: usize,
    pub keys_opened: usize,
    pub keys_deleted: usize,
    pub values_set: usize,
    pub values_deleted: usize,
}

/// Export one key (and, if `recursive`, every key below it).
#[instrument(skip(store), fields(key = %qualified(root, path)))]
pub fn export_key<S: HierarchicalStore + ?Sized>(
    store: &S,
    root: RootKey,
    path: &KeyPath,
    recursive: bool,
) -> Result<String, StoreError> {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n\n");

    let mut pending = vec![path.clone()];
    let mut sections = 0usize;
    while let Some(current) = pending.pop() {
        let handle = store.open_node(root, &current, AccessMode::Read)?;
        out.push_str(&format!("[{}]\n", qualified(root, &current)));
        for entry in store.entries(&handle)? {
            out.push_str(&format_entry(&entry));
            out.push('\n');
        }
        out.push('\n');
        sections += 1;

        if recursive {
            let children = store.child_names(&handle)?;
            for name in children.iter().rev() {
                pending.push(current.join(name)?);
            }
        }
    }
    info!(sections, "Exported key");
    Ok(out)
}

/// Render one `"name"=value` line.
///
/// Text containing control characters is written as `hex(1):` so every
/// value stays on one line.
pub fn format_entry(entry: &StoreEntry) -> String {
    let name = if entry.name.is_empty() {
        "@".to_string()
    } else {
        format!("\"{}\"", escape(&entry.name))
    };
    let value = match entry.entry_type {
        EntryType::Text => match entry.as_text() {
            Some(text) if !text.chars().any(char::is_control) => format!("\"{}\"", escape(&text)),
            _ => format!("hex(1):{}", hex_list(&entry.data)),
        },
        EntryType::Dword => match entry.as_dword() {
            Some(v) => format!("dword:{:08x}", v),
            None => format!("hex(4):{}", hex_list(&entry.data)),
        },
        EntryType::Binary => format!("hex:{}", hex_list(&entry.data)),
        EntryType::ExpandableText => format!("hex(2):{}", hex_list(&entry.data)),
        EntryType::MultiText => format!("hex(7):{}", hex_list(&entry.data)),
    };
    format!("{}={}", name, value)
}

fn hex_list(data: &[u8]) -> String {
    data.iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Apply an export to the store.
///
/// Supports `[ROOT\path]` sections, `[-ROOT\path]` key deletions, and
/// string, `dword:`, `hex:`, `hex(N):` and `-` (delete) values.
#[instrument(skip(store, text))]
pub fn import<S: HierarchicalStore + ?Sized>(
    store: &S,
    text: &str,
) -> Result<ImportSummary, StoreError> {
    let mut summary = ImportSummary::default();
    let mut lines = logical_lines(text).into_iter();

    match lines.find(|(_, l)| !l.is_empty()) {
        Some((_, first)) if first.starts_with(HEADER) => {}
        _ => {
            return Err(StoreError::InvalidArgument(
                "Invalid registry file format: missing header".to_string(),
            ))
        }
    }

    let mut section: Option<(RootKey, KeyPath)> = None;
    for (line_no, line) in lines {
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        if let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if let Some(target) = inner.strip_prefix('-') {
                let (root, path) = parse_qualified(target)?;
                match store.delete_node(root, &path) {
                    Ok(()) => summary.keys_deleted += 1,
                    Err(StoreError::NotFound(_)) => {}
                    Err(e) => return Err(e),
                }
                section = None;
                continue;
            }
            let (root, path) = parse_qualified(inner)?;
            let (_, disposition) = store.create_node(root, &path)?;
            match disposition {
                Disposition::CreatedNew => summary.keys_created += 1,
                Disposition::OpenedExisting => summary.keys_opened += 1,
            }
            section = Some((root, path));
            continue;
        }

        let (root, path) = section.as_ref().ok_or_else(|| {
            StoreError::InvalidArgument(format!("line {}: value outside of a key section", line_no))
        })?;
        let (name, value) = parse_value_line(&line)
            .map_err(|e| StoreError::InvalidArgument(format!("line {}: {}", line_no, e)))?;
        let handle = store.open_node(*root, path, AccessMode::Write)?;
        match value {
            Some((entry_type, data)) => {
                store.set_entry(&handle, &name, entry_type, &data)?;
                summary.values_set += 1;
            }
            None => match store.delete_entry(&handle, &name) {
                Ok(()) => summary.values_deleted += 1,
                Err(StoreError::NotFound(_)) => {}
                Err(e) => return Err(e),
            },
        }
    }

    info!(?summary, "Import completed");
    Ok(summary)
}

/// Trimmed lines with `\` continuations joined, numbered from 1.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let (start, mut acc) = pending.take().unwrap_or((idx + 1, String::new()));
        if let Some(head) = line.strip_suffix('\\') {
            acc.push_str(head);
            pending = Some((start, acc));
        } else {
            acc.push_str(line);
            out.push((start, acc));
        }
    }
    if let Some(last) = pending {
        out.push(last);
    }
    out
}

type ParsedValue = Option<(EntryType, Vec<u8>)>;

/// Parse `"name"=value`; a `None` value means delete.
fn parse_value_line(line: &str) -> Result<(String, ParsedValue), String> {
    let (name, rest) = if let Some(rest) = line.strip_prefix('@') {
        (String::new(), rest)
    } else if line.starts_with('"') {
        let (name, consumed) = parse_quoted(line)?;
        (name, &line[consumed..])
    } else {
        return Err(format!("expected a quoted value name: {}", line));
    };
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(|| "expected '=' after value name".to_string())?
        .trim();
    debug!(name = %name, "Parsing value");

    if value == "-" {
        return Ok((name, None));
    }
    if value.starts_with('"') {
        let (text, _) = parse_quoted(value)?;
        return Ok((name, Some((EntryType::Text, crate::types::encode_text(&text)))));
    }
    if let Some(hex_digits) = value.strip_prefix("dword:") {
        let v = u32::from_str_radix(hex_digits.trim(), 16)
            .map_err(|e| format!("invalid dword '{}': {}", hex_digits, e))?;
        return Ok((name, Some((EntryType::Dword, v.to_le_bytes().to_vec()))));
    }
    if let Some(list) = value.strip_prefix("hex:") {
        return Ok((name, Some((EntryType::Binary, parse_hex_list(list)?))));
    }
    if let Some(rest) = value.strip_prefix("hex(") {
        let (kind, list) = rest
            .split_once("):")
            .ok_or_else(|| format!("malformed hex value: {}", value))?;
        let entry_type = match kind {
            "1" => EntryType::Text,
            "2" => EntryType::ExpandableText,
            "4" => EntryType::Dword,
            "7" => EntryType::MultiText,
            "0" | "3" => EntryType::Binary,
            other => return Err(format!("unsupported value type hex({})", other)),
        };
        return Ok((name, Some((entry_type, parse_hex_list(list)?))));
    }
    Err(format!("unrecognized value: {}", value))
}

/// Parse a leading quoted string; returns the unescaped text and the number
/// of bytes consumed including both quotes.
fn parse_quoted(s: &str) -> Result<(String, usize), String> {
    let mut out = String::new();
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => return Err("expected '\"'".to_string()),
    }
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            '"' => return Ok((out, idx + 1)),
            other => out.push(other),
        }
    }
    Err(format!("unterminated string: {}", s))
}

fn parse_hex_list(list: &str) -> Result<Vec<u8>, String> {
    let digits: String = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| if s.len() == 1 { format!("0{}", s) } else { s.to_string() })
        .collect();
    hex::decode(&digits).map_err(|e| format!("invalid hex data: {}", e))
}
