/*!
 * clipnav - Browse files in the terminal and copy them to the clipboard
 *
 * This library collects files from a set of input paths, renders them as a
 * tree, list or table, and splits file contents into parts that fit a
 * character limit so they can be pasted one at a time.
 */

pub mod clipboard;
pub mod config;
pub mod control;
pub mod error;
pub mod export;
pub mod keymap;
pub mod partition;
pub mod render;
pub mod sanitize;
pub mod scanner;
pub mod session;
pub mod stream;
pub mod terminal;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use clipboard::{Clipboard, SystemClipboard};
pub use config::Config;
pub use control::{CellId, ControlState, Panel, ViewMode};
pub use error::{NavError, Result};
pub use partition::partition;
pub use scanner::Collector;
pub use session::Session;
pub use types::{EntryKind, FileEntry, PathStyle};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
