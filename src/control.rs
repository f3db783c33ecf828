/*!
 * Control state: the registry of toggle cells and the navigation cursor
 */

use strum::{Display, EnumIter, FromRepr, VariantNames};

use crate::error::{NavError, Result};
use crate::types::PathStyle;

/// Identity of a control cell; discriminants follow registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum CellId {
    Panel,
    WindowFocus,
    ViewMode,
    LegendShow,
    LegendDetail,
    Verbose,
    Limit,
    Recursive,
    AbsolutePath,
    Binary,
    Continuous,
    Partition,
    SimpleHeaderFooter,
}

/// Top-level display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr, VariantNames)]
pub enum Panel {
    #[strum(serialize = "DirectoryViewPanel")]
    Directory,
    #[strum(serialize = "FileViewPanel")]
    File,
}

/// How the inventory is drawn in the directory panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr, VariantNames)]
pub enum ViewMode {
    Tree,
    List,
    Table,
}

/// Legal values of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// true / false
    Flag,
    /// Every integer in `min..=max`
    Range { min: u32, max: u32 },
    /// Index into a fixed list of option names
    Options(&'static [&'static str]),
}

/// Current value of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Flag(bool),
    Number(u32),
    Choice(usize),
}

impl Domain {
    /// Number of values in the domain
    pub fn len(&self) -> usize {
        match self {
            Self::Flag => 2,
            Self::Range { min, max } => (max - min) as usize + 1,
            Self::Options(options) => options.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `value` is a member of the domain
    pub fn contains(&self, value: Value) -> bool {
        match (self, value) {
            (Self::Flag, Value::Flag(_)) => true,
            (Self::Range { min, max }, Value::Number(n)) => (*min..=*max).contains(&n),
            (Self::Options(options), Value::Choice(i)) => i < options.len(),
            _ => false,
        }
    }

    /// Neighbour of `value`, wrapping at both ends
    fn step(&self, value: Value, forward: bool) -> Value {
        match (self, value) {
            (Self::Flag, Value::Flag(b)) => Value::Flag(!b),
            (Self::Range { min, max }, Value::Number(n)) => Value::Number(match forward {
                true if n >= *max => *min,
                true => n + 1,
                false if n <= *min => *max,
                false => n - 1,
            }),
            (Self::Options(options), Value::Choice(i)) => {
                let len = options.len();
                Value::Choice(if forward { (i + 1) % len } else { (i + len - 1) % len })
            }
            (domain, value) => invalid_state(format!("{:?} is not in {:?}", value, domain)),
        }
    }
}

/// Keys bound to a cell
#[derive(Debug, Clone, Copy)]
pub struct CellKeys {
    /// Moves the cell forward
    pub advance: char,
    /// Moves the cell backward, when the cell has its own key for it
    pub retreat: Option<char>,
}

/// Static description of a cell
#[derive(Debug)]
pub struct CellSpec {
    pub id: CellId,
    pub label: &'static str,
    pub keys: CellKeys,
    pub help: &'static str,
    pub domain: Domain,
    pub default: Value,
}

const fn key(advance: char) -> CellKeys {
    CellKeys {
        advance,
        retreat: None,
    }
}

/// Highest selectable character limit
pub const MAX_LIMIT: u32 = 4999;

/// Default character limit, sized for common chat input boxes
pub const DEFAULT_LIMIT: u32 = 4096;

/// Cell registry in legend order
pub static CELL_SPECS: [CellSpec; 13] = [
    CellSpec {
        id: CellId::Panel,
        label: "Panel View",
        keys: key('w'),
        help: "to switch between the directory and file panels",
        domain: Domain::Options(<Panel as VariantNames>::VARIANTS),
        default: Value::Choice(0),
    },
    CellSpec {
        id: CellId::WindowFocus,
        label: "Window Focus",
        keys: key('q'),
        help: "to only react to keys while the terminal has focus",
        domain: Domain::Flag,
        default: Value::Flag(false),
    },
    CellSpec {
        id: CellId::ViewMode,
        label: "Directory View Mode",
        keys: key('t'),
        help: "to change the directory view mode",
        domain: Domain::Options(<ViewMode as VariantNames>::VARIANTS),
        default: Value::Choice(0),
    },
    CellSpec {
        id: CellId::LegendShow,
        label: "Show Legend ON",
        keys: key('s'),
        help: "to show the legend in the console",
        domain: Domain::Flag,
        default: Value::Flag(true),
    },
    CellSpec {
        id: CellId::LegendDetail,
        label: "Detailed Legend ON",
        keys: key('l'),
        help: "for a detailed legend in the console",
        domain: Domain::Flag,
        default: Value::Flag(false),
    },
    CellSpec {
        id: CellId::Verbose,
        label: "Verbose Detail ON",
        keys: key('d'),
        help: "to echo copied text in the console",
        domain: Domain::Flag,
        default: Value::Flag(true),
    },
    CellSpec {
        id: CellId::Limit,
        label: "Character Limit",
        keys: CellKeys {
            advance: '+',
            retreat: Some('-'),
        },
        help: "to change the number of characters copied to the clipboard at a time",
        domain: Domain::Range {
            min: 0,
            max: MAX_LIMIT,
        },
        default: Value::Number(DEFAULT_LIMIT),
    },
    CellSpec {
        id: CellId::Recursive,
        label: "Include Recursive",
        keys: key('r'),
        help: "to toggle recursion into directories",
        domain: Domain::Flag,
        default: Value::Flag(true),
    },
    CellSpec {
        id: CellId::AbsolutePath,
        label: "Absolute Path",
        keys: key('a'),
        help: "to switch between absolute and relative paths",
        domain: Domain::Flag,
        default: Value::Flag(true),
    },
    CellSpec {
        id: CellId::Binary,
        label: "Include Binary",
        keys: key('b'),
        help: "to include binary files",
        domain: Domain::Flag,
        default: Value::Flag(true),
    },
    CellSpec {
        id: CellId::Continuous,
        label: "Continuous Unified Mode",
        keys: key('u'),
        help: "to show all files as one continuous stream",
        domain: Domain::Flag,
        default: Value::Flag(false),
    },
    CellSpec {
        id: CellId::Partition,
        label: "Partition Mode",
        keys: key('p'),
        help: "to split content into parts within the character limit",
        domain: Domain::Flag,
        default: Value::Flag(false),
    },
    CellSpec {
        id: CellId::SimpleHeaderFooter,
        label: "Simple Header & Footer",
        keys: key('h'),
        help: "to use a compact header and footer",
        domain: Domain::Flag,
        default: Value::Flag(false),
    },
];

/// Panic with an `InvalidState` error; reaching this is a transition bug
fn invalid_state(message: String) -> ! {
    panic!("{}", NavError::InvalidState(message))
}

/// A named, cyclically toggleable setting
#[derive(Debug, Clone)]
pub struct Cell {
    spec: &'static CellSpec,
    value: Value,
}

impl Cell {
    fn new(spec: &'static CellSpec) -> Self {
        Self {
            spec,
            value: spec.default,
        }
    }

    pub fn id(&self) -> CellId {
        self.spec.id
    }

    pub fn label(&self) -> &'static str {
        self.spec.label
    }

    pub fn help(&self) -> &'static str {
        self.spec.help
    }

    pub fn keys(&self) -> CellKeys {
        self.spec.keys
    }

    pub fn domain(&self) -> Domain {
        self.spec.domain
    }

    pub fn value(&self) -> Value {
        self.value
    }

    /// Move to the next value in the domain
    pub fn advance(&mut self) -> Value {
        self.value = self.spec.domain.step(self.value, true);
        self.value
    }

    /// Move to the previous value in the domain
    pub fn retreat(&mut self) -> Value {
        self.value = self.spec.domain.step(self.value, false);
        self.value
    }

    /// Set an explicit value, rejecting anything outside the domain
    pub fn set(&mut self, value: Value) -> Result<()> {
        crate::ensure!(
            self.spec.domain.contains(value),
            InvalidState,
            "{:?} is outside the domain of {}",
            value,
            self.spec.label
        );
        self.value = value;
        Ok(())
    }

    /// Key binding as shown in the legend, e.g. `W` or `+/-`
    pub fn key_label(&self) -> String {
        let keys = self.spec.keys;
        match keys.retreat {
            Some(retreat) => format!("{}/{}", keys.advance, retreat),
            None => keys.advance.to_ascii_uppercase().to_string(),
        }
    }

    /// Value as shown in the legend
    pub fn display_value(&self) -> String {
        match (self.spec.domain, self.value) {
            (Domain::Options(options), Value::Choice(i)) => options[i].to_string(),
            (_, Value::Flag(b)) => b.to_string(),
            (_, Value::Number(n)) => n.to_string(),
            (domain, value) => invalid_state(format!("{:?} is not in {:?}", value, domain)),
        }
    }
}

/// File and part cursor of the file panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    file_index: usize,
    file_count: usize,
    part_index: usize,
    total_parts: usize,
}

impl Navigator {
    /// Point at the first of `file_count` files
    pub fn reset(&mut self, file_count: usize) {
        self.file_count = file_count;
        self.file_index = 0;
        self.part_index = 0;
        self.total_parts = usize::from(file_count > 0);
    }

    /// Selected file position, `None` when there is nothing to select
    pub fn selected_file(&self) -> Option<usize> {
        (self.file_index < self.file_count).then_some(self.file_index)
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Zero-based index of the selected part
    pub fn part_index(&self) -> usize {
        self.part_index
    }

    pub fn total_parts(&self) -> usize {
        self.total_parts
    }

    pub fn next_file(&mut self) {
        if self.file_index + 1 < self.file_count {
            self.file_index += 1;
            self.part_index = 0;
        }
    }

    pub fn previous_file(&mut self) {
        if self.file_index > 0 {
            self.file_index -= 1;
            self.part_index = 0;
        }
    }

    pub fn next_part(&mut self) {
        if self.part_index + 1 < self.total_parts {
            self.part_index += 1;
        }
    }

    pub fn previous_part(&mut self) {
        self.part_index = self.part_index.saturating_sub(1);
    }

    /// Go back to the first part of the current document
    pub fn reset_part(&mut self) {
        self.part_index = 0;
    }

    /// Record the part count of the displayed document, clamping the cursor
    pub fn set_total_parts(&mut self, total: usize) {
        self.total_parts = total;
        if self.part_index >= total {
            self.part_index = total.saturating_sub(1);
        }
    }
}

/// All user-toggleable settings plus navigation state
#[derive(Debug, Clone)]
pub struct ControlState {
    cells: Vec<Cell>,
    /// Cursor over the visible files and their parts
    pub navigation: Navigator,
    text_files: usize,
    binary_files: usize,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlState {
    /// Build the registry with default values
    pub fn new() -> Self {
        Self {
            cells: CELL_SPECS.iter().map(Cell::new).collect(),
            navigation: Navigator::default(),
            text_files: 0,
            binary_files: 0,
        }
    }

    /// Cells in legend order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id as usize]
    }

    pub fn advance(&mut self, id: CellId) -> Value {
        self.cells[id as usize].advance()
    }

    pub fn retreat(&mut self, id: CellId) -> Value {
        self.cells[id as usize].retreat()
    }

    pub fn set(&mut self, id: CellId, value: Value) -> Result<()> {
        self.cells[id as usize].set(value)
    }

    fn flag(&self, id: CellId) -> bool {
        match self.cell(id).value {
            Value::Flag(b) => b,
            other => invalid_state(format!("{} holds {:?}, expected a flag", id, other)),
        }
    }

    fn choice(&self, id: CellId) -> usize {
        match self.cell(id).value {
            Value::Choice(i) => i,
            other => invalid_state(format!("{} holds {:?}, expected a choice", id, other)),
        }
    }

    pub fn panel(&self) -> Panel {
        let index = self.choice(CellId::Panel);
        Panel::from_repr(index)
            .unwrap_or_else(|| invalid_state(format!("panel index {} out of range", index)))
    }

    pub fn view_mode(&self) -> ViewMode {
        let index = self.choice(CellId::ViewMode);
        ViewMode::from_repr(index)
            .unwrap_or_else(|| invalid_state(format!("view mode index {} out of range", index)))
    }

    /// Character limit for one clipboard copy
    pub fn limit(&self) -> usize {
        match self.cell(CellId::Limit).value {
            Value::Number(n) => n as usize,
            other => invalid_state(format!("limit holds {:?}", other)),
        }
    }

    pub fn path_style(&self) -> PathStyle {
        if self.flag(CellId::AbsolutePath) {
            PathStyle::Absolute
        } else {
            PathStyle::Relative
        }
    }

    pub fn window_focus(&self) -> bool {
        self.flag(CellId::WindowFocus)
    }

    pub fn show_legend(&self) -> bool {
        self.flag(CellId::LegendShow)
    }

    pub fn detailed_legend(&self) -> bool {
        self.flag(CellId::LegendDetail)
    }

    pub fn verbose(&self) -> bool {
        self.flag(CellId::Verbose)
    }

    pub fn recursive(&self) -> bool {
        self.flag(CellId::Recursive)
    }

    pub fn include_binary(&self) -> bool {
        self.flag(CellId::Binary)
    }

    pub fn continuous(&self) -> bool {
        self.flag(CellId::Continuous)
    }

    pub fn partition(&self) -> bool {
        self.flag(CellId::Partition)
    }

    pub fn simple_header_footer(&self) -> bool {
        self.flag(CellId::SimpleHeaderFooter)
    }

    pub fn text_files(&self) -> usize {
        self.text_files
    }

    pub fn binary_files(&self) -> usize {
        self.binary_files
    }

    /// Files that pass the binary-inclusion filter
    pub fn visible_files(&self) -> usize {
        if self.include_binary() {
            self.text_files + self.binary_files
        } else {
            self.text_files
        }
    }

    /// Record the counts of a fresh inventory and reset navigation
    pub fn set_inventory(&mut self, text_files: usize, binary_files: usize) {
        self.text_files = text_files;
        self.binary_files = binary_files;
        self.refresh_visible();
    }

    /// Reset navigation after the visible file set changed
    pub fn refresh_visible(&mut self) {
        let visible = self.visible_files();
        self.navigation.reset(visible);
    }
}
