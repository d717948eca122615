//! Key path composition, normalization, and selection-to-path resolution

use crate::error::StoreError;
use crate::tree::node::{TreeNodeId, TreeView};
use crate::types::RootKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Separator between key path segments
pub const SEPARATOR: char = '\\';

/// Relative path of a key below its root
///
/// Segments are never empty and never contain [`SEPARATOR`]. The empty path
/// addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path (the root itself)
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from explicit segments, validating each one.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = Self::root();
        for segment in segments {
            path = path.join(segment.as_ref())?;
        }
        Ok(path)
    }

    /// Parse a path string.
    ///
    /// Segments are separated by `\` only; `/` is an ordinary name
    /// character. Empty segments from leading, trailing or doubled
    /// separators are dropped.
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(normalize_segment)
            .collect();
        Self { segments }
    }

    /// Append one segment.
    pub fn join(&self, segment: &str) -> Result<Self, StoreError> {
        validate_segment(segment)?;
        let mut segments = self.segments.clone();
        segments.push(normalize_segment(segment));
        Ok(Self { segments })
    }

    /// Path of the parent key; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Number of segments, equal to the key's depth below its root.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn starts_with(&self, prefix: &KeyPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

/// Check that a single segment is addressable.
pub fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() {
        return Err(StoreError::InvalidArgument(
            "Key name cannot be empty".to_string(),
        ));
    }
    if segment.contains(SEPARATOR) {
        return Err(StoreError::InvalidArgument(format!(
            "Key name cannot contain '{}': {}",
            SEPARATOR, segment
        )));
    }
    Ok(())
}

/// Normalize a segment to NFC so equal names compare equal.
pub fn normalize_segment(segment: &str) -> String {
    segment.nfc().collect()
}

/// Parse a fully qualified path such as `HKCU\Software\Demo`.
///
/// The first segment names the root; the rest form the relative path.
pub fn parse_qualified(qualified: &str) -> Result<(RootKey, KeyPath), StoreError> {
    let trimmed = qualified.trim().trim_start_matches(SEPARATOR);
    let (root_part, rest) = match trimmed.find(SEPARATOR) {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => (trimmed, ""),
    };
    if root_part.is_empty() {
        return Err(StoreError::InvalidArgument(
            "Key path must start with a root key".to_string(),
        ));
    }
    let root: RootKey = root_part.parse()?;
    Ok((root, KeyPath::parse(rest)))
}

/// Render `ROOT\path` (or just `ROOT` for the empty path).
pub fn qualified(root: RootKey, path: &KeyPath) -> String {
    if path.is_empty() {
        root.name().to_string()
    } else {
        format!("{}{}{}", root.name(), SEPARATOR, path)
    }
}

/// Resolve a tree node back to the store address it mirrors.
///
/// Walks parent links up to the root node and collects labels in
/// root-to-leaf order. The root's own label only selects the root; it is
/// not part of the relative path.
pub fn resolve_path(tree: &TreeView, node_id: TreeNodeId) -> Option<(RootKey, KeyPath)> {
    let mut labels = Vec::new();
    let mut current = tree.get(node_id)?;
    while let Some(parent_id) = current.parent {
        labels.push(current.label.clone());
        current = tree.get(parent_id)?;
    }
    labels.reverse();
    let root = current.node.root;
    let path = KeyPath::from_segments(labels).ok()?;
    Some((root, path))
}
