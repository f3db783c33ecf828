/*!
 * Core types and data structures for clipnav
 */

use std::path::PathBuf;

use strum::Display;

/// Classification of a collected file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    /// No null byte in the sniffed prefix
    #[strum(serialize = "txt")]
    Text,
    /// Null byte found in the sniffed prefix
    #[strum(serialize = "bin")]
    Binary,
}

/// Which of the two paths of an entry is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStyle {
    /// Absolute, canonicalized path
    Absolute,
    /// Path with the common input prefix removed
    Relative,
}

/// One file discovered during collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// On-disk path, used for every read
    pub path: PathBuf,
    /// Absolute path using `/` separators, for display only
    pub absolute_path: String,
    /// Absolute path with the common input prefix stripped
    pub relative_path: String,
    /// Text or binary
    pub kind: EntryKind,
}

impl FileEntry {
    /// Path to display for the given style
    pub fn display_path(&self, style: PathStyle) -> &str {
        match style {
            PathStyle::Absolute => &self.absolute_path,
            PathStyle::Relative => &self.relative_path,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.kind == EntryKind::Binary
    }
}

/// Entries that survive the binary-inclusion filter, in inventory order
pub fn visible_entries(entries: &[FileEntry], include_binary: bool) -> Vec<&FileEntry> {
    entries
        .iter()
        .filter(|entry| include_binary || !entry.is_binary())
        .collect()
}
