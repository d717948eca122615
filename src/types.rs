//! Core types for the regtree store browser and editor.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed top-level namespaces of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RootKey {
    CurrentUser,
    LocalMachine,
    ClassesRoot,
    Users,
    CurrentConfig,
}

impl RootKey {
    /// All roots in the order they are presented when browsing.
    pub const ALL: [RootKey; 5] = [
        RootKey::CurrentUser,
        RootKey::LocalMachine,
        RootKey::ClassesRoot,
        RootKey::Users,
        RootKey::CurrentConfig,
    ];

    /// Canonical name, e.g. `HKEY_CURRENT_USER`
    pub fn name(&self) -> &'static str {
        match self {
            RootKey::CurrentUser => "HKEY_CURRENT_USER",
            RootKey::LocalMachine => "HKEY_LOCAL_MACHINE",
            RootKey::ClassesRoot => "HKEY_CLASSES_ROOT",
            RootKey::Users => "HKEY_USERS",
            RootKey::CurrentConfig => "HKEY_CURRENT_CONFIG",
        }
    }

    /// Short alias, e.g. `HKCU`
    pub fn short_name(&self) -> &'static str {
        match self {
            RootKey::CurrentUser => "HKCU",
            RootKey::LocalMachine => "HKLM",
            RootKey::ClassesRoot => "HKCR",
            RootKey::Users => "HKU",
            RootKey::CurrentConfig => "HKCC",
        }
    }

    /// Single-byte tag used in persistent key layouts.
    pub(crate) fn tag(&self) -> u8 {
        match self {
            RootKey::CurrentUser => b'U',
            RootKey::LocalMachine => b'M',
            RootKey::ClassesRoot => b'C',
            RootKey::Users => b'S',
            RootKey::CurrentConfig => b'G',
        }
    }

    /// Default `(root, label)` pairs used to populate a full tree.
    pub fn default_roots() -> Vec<(RootKey, String)> {
        Self::ALL
            .iter()
            .map(|r| (*r, r.name().to_string()))
            .collect()
    }
}

impl fmt::Display for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RootKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RootKey::ALL
            .iter()
            .copied()
            .find(|r| {
                r.name().eq_ignore_ascii_case(wanted) || r.short_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| StoreError::InvalidArgument(format!("Unknown root key: {}", s)))
    }
}

impl TryFrom<String> for RootKey {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RootKey> for String {
    fn from(root: RootKey) -> Self {
        root.name().to_string()
    }
}

/// Type tag of a stored value (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    Text,
    ExpandableText,
    Dword,
    Binary,
    MultiText,
}

impl EntryType {
    pub fn name(&self) -> &'static str {
        match self {
            EntryType::Text => "REG_SZ",
            EntryType::ExpandableText => "REG_EXPAND_SZ",
            EntryType::Dword => "REG_DWORD",
            EntryType::Binary => "REG_BINARY",
            EntryType::MultiText => "REG_MULTI_SZ",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, typed value attached to a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub name: String,
    pub entry_type: EntryType,
    pub data: Vec<u8>,
}

impl StoreEntry {
    pub fn new(name: impl Into<String>, entry_type: EntryType, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            entry_type,
            data,
        }
    }

    /// Text value, stored NUL-terminated.
    pub fn text(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, EntryType::Text, encode_text(value))
    }

    /// 32-bit little-endian integer value.
    pub fn dword(name: impl Into<String>, value: u32) -> Self {
        Self::new(name, EntryType::Dword, value.to_le_bytes().to_vec())
    }

    /// Multi-string value: every item NUL-terminated, plus a final NUL.
    pub fn multi_text(name: impl Into<String>, items: &[&str]) -> Self {
        let mut data = Vec::new();
        for item in items {
            data.extend_from_slice(item.as_bytes());
            data.push(0);
        }
        data.push(0);
        Self::new(name, EntryType::MultiText, data)
    }

    /// Decoded text for the text kinds; `None` for the others.
    pub fn as_text(&self) -> Option<String> {
        match self.entry_type {
            EntryType::Text | EntryType::ExpandableText => Some(decode_text(&self.data)),
            _ => None,
        }
    }

    /// Decoded integer for dword values with at least four bytes of data.
    pub fn as_dword(&self) -> Option<u32> {
        if self.entry_type != EntryType::Dword || self.data.len() < 4 {
            return None;
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[..4]);
        Some(u32::from_le_bytes(bytes))
    }

    /// Items of a multi-string value.
    pub fn as_multi_text(&self) -> Option<Vec<String>> {
        if self.entry_type != EntryType::MultiText {
            return None;
        }
        Some(
            self.data
                .split(|b| *b == 0)
                .filter(|s| !s.is_empty())
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .collect(),
        )
    }

    /// Rendering used by the value list.
    pub fn display_data(&self) -> String {
        match self.entry_type {
            EntryType::Text | EntryType::ExpandableText => self.as_text().unwrap_or_default(),
            EntryType::Dword => self
                .as_dword()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "[Invalid DWORD]".to_string()),
            EntryType::MultiText => self.as_multi_text().unwrap_or_default().join("; "),
            EntryType::Binary => "[Binary Data]".to_string(),
        }
    }
}

/// Encode a string the way text values are stored (UTF-8 plus NUL).
pub fn encode_text(value: &str) -> Vec<u8> {
    let mut data = value.as_bytes().to_vec();
    data.push(0);
    data
}

/// Decode stored text up to the first NUL.
pub fn decode_text(data: &[u8]) -> String {
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}
