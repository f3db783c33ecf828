/*!
 * Continuous stream of all visible files, cached between key presses
 */

use std::fs;

use log::{debug, warn};

use crate::control::{ControlState, ViewMode};
use crate::render::{render_inventory, Frame, StreamKind};
use crate::types::{visible_entries, FileEntry, PathStyle};

/// Name used to frame the continuous stream
pub const STREAM_NAME: &str = "Continuous file stream.";

fn separator() -> String {
    format!("\n{}\n", "=".repeat(30))
}

/// Option values that shape the stream text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamSnapshot {
    /// Bumped on every collection pass
    pub inventory_generation: u64,
    pub include_binary: bool,
    pub recursive: bool,
    pub view_mode: ViewMode,
    pub path_style: PathStyle,
    pub simple_header_footer: bool,
}

impl StreamSnapshot {
    pub fn capture(state: &ControlState, inventory_generation: u64) -> Self {
        Self {
            inventory_generation,
            include_binary: state.include_binary(),
            recursive: state.recursive(),
            view_mode: state.view_mode(),
            path_style: state.path_style(),
            simple_header_footer: state.simple_header_footer(),
        }
    }
}

/// Memoized stream text and the snapshot that produced it
#[derive(Debug, Default)]
pub struct StreamCache {
    entry: Option<(StreamSnapshot, String)>,
    builds: usize,
}

impl StreamCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached text for `snapshot`, rebuilding it when the snapshot differs
    pub fn get_or_build<F>(&mut self, snapshot: StreamSnapshot, build: F) -> &str
    where
        F: FnOnce() -> String,
    {
        let stale = !matches!(&self.entry, Some((cached, _)) if *cached == snapshot);
        if stale {
            debug!("Rebuilding continuous stream for {:?}", snapshot);
            self.builds += 1;
            self.entry = Some((snapshot, build()));
        }
        self.entry.as_ref().map_or("", |(_, text)| text.as_str())
    }

    /// Drop the cached text
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of rebuilds so far
    pub fn builds(&self) -> usize {
        self.builds
    }
}

/// Concatenate the inventory and every visible file into one document.
///
/// Each text file is framed as a `File` without part information; binary
/// files appear as a one-line notice. Unreadable files are noted inline.
pub fn build_stream(entries: &[FileEntry], snapshot: &StreamSnapshot) -> String {
    let mut out = String::new();
    let sep = separator();

    out.push_str(&format!("{}File structure:{}", sep, sep));
    out.push_str(&render_inventory(
        entries,
        snapshot.view_mode,
        snapshot.path_style,
        snapshot.include_binary,
    ));
    out.push_str(&format!("{}File(s) Content:{}", sep, sep));

    let frame = Frame {
        kind: StreamKind::File,
        simple: snapshot.simple_header_footer,
        part: None,
    };

    for entry in visible_entries(entries, snapshot.include_binary) {
        out.push_str(&sep);
        if entry.is_binary() {
            out.push_str(&format!("[INFO] binary file: {}\n", entry.absolute_path));
            continue;
        }
        match fs::read_to_string(&entry.path) {
            Ok(content) => out.push_str(&frame.wrap(&entry.absolute_path, &content)),
            Err(e) => {
                warn!("Failed to read {} for the stream: {}", entry.absolute_path, e);
                out.push_str(&format!(
                    "[ERROR] Failed to read file {}: {}\n",
                    entry.absolute_path, e
                ));
            }
        }
    }

    out
}
