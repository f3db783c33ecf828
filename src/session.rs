/*!
 * The interactive control loop
 *
 * One input event in, at most one action out. Every recognized action
 * redraws the screen and copies what was rendered to the clipboard.
 */

use std::fs;
use std::io::{self, Write};

use crossterm::event::{Event, KeyEventKind};
use indicatif::ProgressBar;
use log::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::control::{CellId, ControlState, Panel};
use crate::error::{NavError, Result};
use crate::export::write_launcher;
use crate::keymap::{action_for, Action, Cursor};
use crate::partition::partition;
use crate::render::{render_inventory, render_legend, Frame, StreamKind, WELCOME};
use crate::scanner::{progress_bar_observer, Collector};
use crate::stream::{build_stream, StreamCache, StreamSnapshot, STREAM_NAME};
use crate::terminal::{EventSource, Screen};
use crate::types::{visible_entries, FileEntry};
use crate::utils::char_len;

/// Shown instead of file content while Verbose is off
const CONTENT_PLACEHOLDER: &str = " [Text content console output only - Verbose State (OFF) ] ";

/// Shown instead of the inventory while Verbose is off
const INVENTORY_PLACEHOLDER: &str = " [Inventory copied to the clipboard - Verbose State (OFF) ] ";

/// What the loop does after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Unrecognized input, nothing to redraw
    Ignore,
    /// Only the legend changed
    LegendOnly,
    /// Full redraw and clipboard copy
    Render,
    /// Leave the loop
    Exit,
}

/// File picked by the navigation cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No visible file to show
    Empty,
    Binary(FileEntry),
    Text(FileEntry),
}

/// Text accumulated during one render pass, copied to the clipboard at its end
#[derive(Debug, Default)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    pub fn push(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Take the accumulated text, leaving the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

/// Interactive session over a fixed set of input paths
pub struct Session<C: Clipboard, W: Write> {
    config: Config,
    /// Sanitized input paths
    paths: Vec<String>,
    collector: Collector,
    state: ControlState,
    entries: Vec<FileEntry>,
    warnings: Vec<String>,
    generation: u64,
    cache: StreamCache,
    output: OutputBuffer,
    /// Screen text of the pass being rendered
    echo: String,
    /// One-shot messages for the next redraw
    notices: Vec<String>,
    clipboard: C,
    screen: Screen<W>,
    focused: bool,
}

impl<C: Clipboard, W: Write> Session<C, W> {
    /// Create a session and run the first collection pass
    pub fn new(paths: Vec<String>, config: &Config, clipboard: C, screen: Screen<W>) -> Self {
        let mut session = Self {
            config: config.clone(),
            paths,
            collector: Collector::new(config.progress_interval),
            state: ControlState::new(),
            entries: Vec::new(),
            warnings: Vec::new(),
            generation: 0,
            cache: StreamCache::new(),
            output: OutputBuffer::default(),
            echo: String::new(),
            notices: Vec::new(),
            clipboard,
            screen,
            focused: true,
        };
        session.recollect();
        session
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Warnings of the last collection pass
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn screen(&self) -> &Screen<W> {
        &self.screen
    }

    /// Number of times the continuous stream was rebuilt
    pub fn stream_builds(&self) -> usize {
        self.cache.builds()
    }

    /// Run until an exit key is pressed
    pub fn run(&mut self, events: &mut dyn EventSource) -> Result<()> {
        self.screen.clear()?;
        self.print_legend()?;
        self.screen.print(WELCOME)?;
        self.screen.flush()?;

        loop {
            let event = events.next_event()?;
            match self.handle_event(event)? {
                Flow::Ignore => continue,
                Flow::Exit => break,
                Flow::LegendOnly => {
                    self.screen.clear()?;
                    self.print_legend()?;
                    self.screen.flush()?;
                }
                Flow::Render => self.render()?,
            }
        }

        info!("Session finished");
        Ok(())
    }

    /// Map one input event to a state change
    pub fn handle_event(&mut self, event: Event) -> Result<Flow> {
        match event {
            Event::FocusGained => {
                self.focused = true;
                Ok(Flow::Ignore)
            }
            Event::FocusLost => {
                self.focused = false;
                Ok(Flow::Ignore)
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(action) = action_for(&key) else {
                    return Ok(Flow::Ignore);
                };
                if self.state.window_focus() && !self.focused && action != Action::Exit {
                    debug!("Ignoring {:?} without window focus", action);
                    return Ok(Flow::Ignore);
                }
                self.apply(action)
            }
            _ => Ok(Flow::Ignore),
        }
    }

    /// Apply a single action
    pub fn apply(&mut self, action: Action) -> Result<Flow> {
        debug!("Applying {:?}", action);
        match action {
            Action::Exit => Ok(Flow::Exit),
            Action::Advance(id) => {
                self.state.advance(id);
                Ok(self.after_change(id))
            }
            Action::Retreat(id) => {
                self.state.retreat(id);
                Ok(self.after_change(id))
            }
            Action::Move(cursor) => {
                if self.state.panel() == Panel::File {
                    let navigation = &mut self.state.navigation;
                    match cursor {
                        Cursor::NextFile => navigation.next_file(),
                        Cursor::PreviousFile => navigation.previous_file(),
                        Cursor::NextPart => navigation.next_part(),
                        Cursor::PreviousPart => navigation.previous_part(),
                    }
                }
                Ok(Flow::Render)
            }
            Action::Recompute => {
                self.recollect();
                Ok(Flow::Render)
            }
            Action::Export => {
                match write_launcher(&self.config.export_dir, &self.config.paths) {
                    Ok(path) => self
                        .notices
                        .push(format!("[INFO] Launcher written to {}", path.display())),
                    Err(e) => {
                        warn!("Export failed: {}", e);
                        self.notices.push(format!("[ERROR] Export failed: {}", e));
                    }
                }
                Ok(Flow::Render)
            }
        }
    }

    /// Follow-up work after a cell changed
    fn after_change(&mut self, id: CellId) -> Flow {
        match id {
            CellId::Recursive => self.recollect(),
            CellId::Binary => self.state.refresh_visible(),
            CellId::Continuous | CellId::Partition => self.state.navigation.reset_part(),
            CellId::Limit if !self.state.partition() => return Flow::LegendOnly,
            _ => {}
        }
        Flow::Render
    }

    /// Rebuild the inventory from disk
    fn recollect(&mut self) {
        let bar = if self.state.verbose() {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        let mut observer = progress_bar_observer(bar.clone());
        let collection = self
            .collector
            .collect(&self.paths, self.state.recursive(), &mut observer);
        bar.finish_and_clear();

        self.state
            .set_inventory(collection.text_count(), collection.binary_count());
        self.notices
            .extend(collection.warnings.iter().map(|w| format!("[WARN] {}", w)));
        self.entries = collection.entries;
        self.warnings = collection.warnings;
        self.generation += 1;
        self.cache.invalidate();
        info!(
            "Collected {} files ({} binary)",
            self.entries.len(),
            self.state.binary_files()
        );
    }

    /// Draw the legend, the notices and the active panel, then copy
    fn render(&mut self) -> Result<()> {
        match self.state.panel() {
            Panel::Directory => self.render_directory(),
            Panel::File if self.state.continuous() => self.render_stream(),
            Panel::File => self.render_selected_file(),
        }

        self.screen.clear()?;
        self.print_legend()?;
        for notice in std::mem::take(&mut self.notices) {
            self.screen.println(&notice)?;
        }
        let echo = std::mem::take(&mut self.echo);
        self.screen.print(&echo)?;

        self.flush_clipboard()?;
        self.screen.flush()?;
        Ok(())
    }

    fn print_legend(&mut self) -> io::Result<()> {
        if self.state.show_legend() {
            self.screen.print(&render_legend(&self.state))?;
        }
        Ok(())
    }

    /// Append to the clipboard buffer and echo, or echo a placeholder
    fn emit(&mut self, text: &str, placeholder: &str) {
        self.output.push(text);
        if self.state.verbose() {
            self.echo.push_str(text);
        } else {
            self.echo.push_str(placeholder);
            self.echo.push('\n');
        }
    }

    /// Screen-only line
    fn say(&mut self, line: &str) {
        self.echo.push_str(line);
        self.echo.push('\n');
    }

    fn render_directory(&mut self) {
        let inventory = render_inventory(
            &self.entries,
            self.state.view_mode(),
            self.state.path_style(),
            self.state.include_binary(),
        );
        self.emit(&inventory, INVENTORY_PLACEHOLDER);
    }

    /// File under the navigation cursor among the visible entries
    pub fn selection(&self) -> Selection {
        let visible = visible_entries(&self.entries, self.state.include_binary());
        match self
            .state
            .navigation
            .selected_file()
            .and_then(|i| visible.get(i))
        {
            None => Selection::Empty,
            Some(entry) if entry.is_binary() => Selection::Binary((*entry).clone()),
            Some(entry) => Selection::Text((*entry).clone()),
        }
    }

    fn render_selected_file(&mut self) {
        match self.selection() {
            Selection::Empty => {
                self.state.navigation.set_total_parts(0);
                self.say("[INFO] No file selected for display.");
            }
            Selection::Binary(entry) => {
                self.state.navigation.set_total_parts(0);
                self.say(&format!(
                    "[INFO] The selected file is a binary file and cannot be displayed: {}",
                    entry.absolute_path
                ));
            }
            Selection::Text(entry) => {
                let read = fs::read_to_string(&entry.path).map_err(|source| {
                    NavError::FileRead {
                        path: entry.absolute_path.clone(),
                        source,
                    }
                });
                match read {
                    Ok(content) => {
                        self.present_document(&content, &entry.absolute_path, StreamKind::File)
                    }
                    Err(e) => {
                        warn!("{}", e);
                        self.state.navigation.set_total_parts(0);
                        self.say(&format!("[ERROR] {}", e));
                    }
                }
            }
        }
    }

    fn render_stream(&mut self) {
        let snapshot = StreamSnapshot::capture(&self.state, self.generation);
        let entries = &self.entries;
        let text = self
            .cache
            .get_or_build(snapshot, || build_stream(entries, &snapshot))
            .to_string();
        self.present_document(&text, STREAM_NAME, StreamKind::TextStream);
    }

    /// Frame the selected part of a document (or all of it) and emit it
    fn present_document(&mut self, content: &str, name: &str, kind: StreamKind) {
        let simple = self.state.simple_header_footer();

        let (body, frame) = if self.state.partition() {
            let overhead = |part, total| {
                Frame {
                    kind,
                    simple,
                    part: Some((part, total)),
                }
                .overhead(name)
            };
            match partition(content, self.state.limit(), overhead) {
                Ok(mut parts) => {
                    let total = parts.len();
                    self.state.navigation.set_total_parts(total);
                    let index = self.state.navigation.part_index();
                    let frame = Frame {
                        kind,
                        simple,
                        part: Some((index + 1, total)),
                    };
                    (parts.swap_remove(index), frame)
                }
                Err(e) => {
                    warn!("Partitioning {} failed: {}", name, e);
                    self.state.navigation.set_total_parts(0);
                    self.say(&format!("[ERROR] {}", e));
                    return;
                }
            }
        } else {
            self.state.navigation.set_total_parts(1);
            let frame = Frame {
                kind,
                simple,
                part: None,
            };
            (content.to_string(), frame)
        };

        let (header, footer) = frame.header_footer(name);
        self.output.push(&header);
        self.echo.push_str(&header);
        self.emit(&body, CONTENT_PLACEHOLDER);
        self.output.push(&footer);
        self.echo.push_str(&footer);

        let total = char_len(&header) + char_len(&body) + char_len(&footer);
        self.say("");
        self.say(&format!("Total character length : {}", total));
    }

    /// Copy the buffer to the clipboard and clear it
    fn flush_clipboard(&mut self) -> io::Result<()> {
        let text = self.output.take();
        if text.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.clipboard.copy_to_clipboard(&text) {
            warn!("Clipboard copy failed: {}", e);
            self.screen.println(&format!("[WARN] Clipboard: {}", e))?;
        }
        Ok(())
    }
}
