/*!
 * File collection: recursive walk, binary sniffing and progress reporting
 */

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::types::{EntryKind, FileEntry};
use crate::utils::{common_prefix, shorten_for_display, slash_path};

/// Number of leading bytes inspected when classifying a file
pub const SNIFF_LEN: u64 = 512;

/// Default minimum time between two progress reports
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(50);

/// Progress of one recursion depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelProgress {
    /// Entries visited at this depth
    pub processed: usize,
    /// Entries discovered at this depth
    pub total: usize,
}

/// Receives throttled progress updates during a collection pass
pub trait ProgressObserver {
    /// Called with the path being processed and the progress of every open depth
    fn report(&mut self, current: &str, levels: &[LevelProgress]);
}

// Implement ProgressObserver for closures
impl<F> ProgressObserver for F
where
    F: FnMut(&str, &[LevelProgress]),
{
    fn report(&mut self, current: &str, levels: &[LevelProgress]) {
        self(current, levels)
    }
}

/// Build an observer that drives an indicatif progress bar.
///
/// The top-level depth is the bar itself; deeper depths are summarized in the
/// message.
pub fn progress_bar_observer(bar: ProgressBar) -> impl FnMut(&str, &[LevelProgress]) {
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg:.dim.white}")
    {
        bar.set_style(style);
    }
    bar.set_prefix("📂 Collecting");

    move |current: &str, levels: &[LevelProgress]| {
        if let Some(top) = levels.first() {
            bar.set_length(top.total as u64);
            bar.set_position(top.processed as u64);
        }
        let nested: Vec<String> = levels
            .iter()
            .enumerate()
            .skip(1)
            .map(|(depth, level)| format!("L{} {}/{}", depth, level.processed, level.total))
            .collect();
        bar.set_message(format!(
            "{} {}",
            nested.join(" · "),
            shorten_for_display(current, 40)
        ));
    }
}

/// Result of a collection pass
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Collected entries in discovery order
    pub entries: Vec<FileEntry>,
    /// Non-fatal problems met during the walk
    pub warnings: Vec<String>,
}

impl Collection {
    pub fn text_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_binary()).count()
    }

    pub fn binary_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_binary()).count()
    }
}

/// Walks input paths and builds the flat file inventory
#[derive(Debug, Clone)]
pub struct Collector {
    /// Minimum time between two observer calls
    interval: Duration,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

impl Collector {
    /// Create a new collector reporting progress at most once per `interval`
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Collect the entries below `paths`.
    ///
    /// Directories are only entered when `recursive` is set. Entries that
    /// cannot be read are skipped and reported in `Collection::warnings`.
    /// Overlapping inputs are each walked in full, so a file below two inputs
    /// is listed twice; only a directory already on the current descent path
    /// is skipped.
    pub fn collect<S: AsRef<str>>(
        &self,
        paths: &[S],
        recursive: bool,
        observer: &mut dyn ProgressObserver,
    ) -> Collection {
        let mut walk = Walk {
            prefix: common_prefix(paths),
            recursive,
            levels: vec![LevelProgress {
                processed: 0,
                total: paths.len(),
            }],
            throttle: Throttle::new(self.interval),
            observer,
            ancestors: HashSet::new(),
            collection: Collection::default(),
        };

        for path in paths {
            walk.visit(Path::new(path.as_ref()), 0);
        }

        debug!(
            "Collected {} entries ({} warnings)",
            walk.collection.entries.len(),
            walk.collection.warnings.len()
        );
        walk.collection
    }
}

/// Classify a file by looking for a null byte in its first 512 bytes.
///
/// This is a heuristic: UTF-16 text is reported as binary and binary formats
/// without an early null byte are reported as text.
pub fn classify(path: &Path) -> io::Result<EntryKind> {
    let mut prefix = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut prefix)?;

    if prefix.contains(&0) {
        Ok(EntryKind::Binary)
    } else {
        Ok(EntryKind::Text)
    }
}

/// Rate limiter for progress reports
struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// State of one depth-first collection pass
struct Walk<'a> {
    prefix: String,
    recursive: bool,
    levels: Vec<LevelProgress>,
    throttle: Throttle,
    observer: &'a mut dyn ProgressObserver,
    /// Canonical directories on the current descent path, guards against symlink loops
    ancestors: HashSet<PathBuf>,
    collection: Collection,
}

impl Walk<'_> {
    fn visit(&mut self, path: &Path, level: usize) {
        let display = slash_path(path);

        match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => match classify(path) {
                Ok(kind) => {
                    let relative_path = display
                        .strip_prefix(self.prefix.as_str())
                        .unwrap_or(&display)
                        .to_string();
                    self.collection.entries.push(FileEntry {
                        path: path.to_path_buf(),
                        absolute_path: display.clone(),
                        relative_path,
                        kind,
                    });
                }
                Err(e) => self.warn(format!("Cannot classify {}: {}", display, e)),
            },
            Ok(metadata) if metadata.is_dir() && self.recursive => self.descend(path, level),
            Ok(_) => {}
            Err(e) => self.warn(format!("Cannot inspect {}: {}", display, e)),
        }

        self.tick(level, &display);
    }

    fn descend(&mut self, dir: &Path, level: usize) {
        let canonical = match fs::canonicalize(dir) {
            Ok(canonical) => canonical,
            Err(e) => {
                self.warn(format!("Cannot resolve {}: {}", slash_path(dir), e));
                return;
            }
        };
        if !self.ancestors.insert(canonical.clone()) {
            debug!("Skipping directory loop at {}", dir.display());
            return;
        }

        let mut children = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => children.push(entry.into_path()),
                Err(e) => self.warn(format!("Cannot list {}: {}", slash_path(dir), e)),
            }
        }

        self.levels.push(LevelProgress {
            processed: 0,
            total: children.len(),
        });
        for child in &children {
            self.visit(child, level + 1);
        }
        self.levels.pop();
        self.ancestors.remove(&canonical);
    }

    fn tick(&mut self, level: usize, current: &str) {
        if let Some(progress) = self.levels.get_mut(level) {
            progress.processed += 1;
        }
        if self.throttle.ready() {
            self.observer.report(current, &self.levels);
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.collection.warnings.push(message);
    }
}
