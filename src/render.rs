/*!
 * Rendering of the inventory, document framing and the legend
 *
 * Tables use the tabled library for consistent box drawing.
 */

use std::collections::HashMap;

use strum::Display;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::control::{ControlState, ViewMode};
use crate::types::{visible_entries, FileEntry, PathStyle};
use crate::utils::char_len;

/// Greeting shown once at startup
pub const WELCOME: &str = r"
   ___ _ _        _  _
  / __| (_)_ __  | \| |__ ___ __
 | (__| | | '_ \ | .` / _` \ V /
  \___|_|_| .__/ |_|\_\__,_|\_/
          |_|
  Browse files, copy them to the clipboard in chat-sized parts.
  Press a key from the legend to start, Esc to quit.
";

/// Render the inventory in the requested view mode.
///
/// Binary entries are dropped first when `include_binary` is off.
pub fn render_inventory(
    entries: &[FileEntry],
    mode: ViewMode,
    style: PathStyle,
    include_binary: bool,
) -> String {
    let visible = visible_entries(entries, include_binary);
    match mode {
        ViewMode::Tree => render_tree(&visible, style),
        ViewMode::List => render_list(&visible, style),
        ViewMode::Table => render_table(&visible, style),
    }
}

/// Node of the path-segment tree
#[derive(Debug, Default)]
struct TreeNode {
    name: String,
    /// Children in first-seen order
    children: Vec<TreeNode>,
    /// Child name to its position in `children`
    index: HashMap<String, usize>,
}

impl TreeNode {
    fn child(&mut self, name: &str) -> &mut TreeNode {
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                let position = self.children.len();
                self.children.push(TreeNode {
                    name: name.to_string(),
                    ..TreeNode::default()
                });
                self.index.insert(name.to_string(), position);
                position
            }
        };
        &mut self.children[position]
    }

    fn write(&self, prefix: &str, out: &mut String) {
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            let connector = if last { "└── " } else { "├── " };
            if child.children.is_empty() {
                out.push_str(&format!("{}{}{}\n", prefix, connector, child.name));
            } else {
                out.push_str(&format!("{}{}{}/\n", prefix, connector, child.name));
                let extension = if last { "    " } else { "│   " };
                child.write(&format!("{}{}", prefix, extension), out);
            }
        }
    }
}

fn render_tree(entries: &[&FileEntry], style: PathStyle) -> String {
    let mut root = TreeNode::default();

    for entry in entries {
        let path = entry.display_path(style);
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        // A lone file input has an empty relative path
        if segments.is_empty() {
            segments = entry
                .absolute_path
                .rsplit('/')
                .find(|s| !s.is_empty())
                .into_iter()
                .collect();
        }

        let mut node = &mut root;
        for segment in segments {
            node = node.child(segment);
        }
    }

    let mut out = String::new();
    root.write("", &mut out);
    out
}

fn render_list(entries: &[&FileEntry], style: PathStyle) -> String {
    entries
        .iter()
        .map(|entry| format!("[{}] {}\n", entry.kind, entry.display_path(style)))
        .collect()
}

fn render_table(entries: &[&FileEntry], style: PathStyle) -> String {
    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "Type")]
        kind: String,

        #[tabled(rename = "Path")]
        path: String,
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|entry| EntryRow {
            kind: entry.kind.to_string(),
            path: entry.display_path(style).to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    format!("{}\n", table)
}

/// What a framed document is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StreamKind {
    #[strum(serialize = "File")]
    File,
    #[strum(serialize = "Text Stream")]
    TextStream,
}

/// Header and footer settings for one document or part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub kind: StreamKind,
    /// Compact single-line header
    pub simple: bool,
    /// One-based part number and total, when partitioning
    pub part: Option<(usize, usize)>,
}

impl Frame {
    /// Header and footer for a document called `name`
    pub fn header_footer(&self, name: &str) -> (String, String) {
        let part = match self.part {
            Some((number, total)) => format!(" Part {}/{}", number, total),
            None => String::new(),
        };
        let kind = self.kind;

        if self.simple {
            (format!("{}: \"{}\"{}:\n\"", kind, name, part), "\"".to_string())
        } else {
            (
                format!("{}: \"{}\"\n--- Beginning of {}{} ---\n", kind, name, kind, part),
                format!("\n--- End of {}{} ---\n", kind, part),
            )
        }
    }

    /// Header plus footer length in characters
    pub fn overhead(&self, name: &str) -> usize {
        let (header, footer) = self.header_footer(name);
        char_len(&header) + char_len(&footer)
    }

    /// Wrap `body` in the header and footer
    pub fn wrap(&self, name: &str, body: &str) -> String {
        let (header, footer) = self.header_footer(name);
        format!("{}{}{}", header, body, footer)
    }
}

/// Legend with one line per cell followed by the navigation status
pub fn render_legend(state: &ControlState) -> String {
    let detailed = state.detailed_legend();
    let rule = "-".repeat(if detailed { 100 } else { 40 });
    let mut out = format!("{}\n", rule);

    for cell in state.cells() {
        out.push_str(&format!(
            "{}({}) : {}",
            cell.label(),
            cell.key_label(),
            cell.display_value()
        ));
        if detailed {
            out.push_str(&format!("  - Press '{}' {}", cell.key_label(), cell.help()));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", rule));
    let nav = &state.navigation;
    if state.continuous() {
        out.push_str(&format!("Total number of files: {}\n", nav.file_count()));
    } else {
        let current = nav.selected_file().map_or(0, |i| i + 1);
        out.push_str(&format!(
            "Current File Index: {} out of {} (left/right)\n",
            current,
            nav.file_count()
        ));
    }
    let part = if nav.total_parts() == 0 { 0 } else { nav.part_index() + 1 };
    out.push_str(&format!(
        "Current Part: {} out of {} (up/down)\n",
        part,
        nav.total_parts()
    ));
    out.push_str(&format!("{}\n", rule));
    out
}
