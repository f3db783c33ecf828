/*!
 * Lookup table from key identity to the single action it triggers
 */

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use once_cell::sync::Lazy;

use crate::control::{CellId, CELL_SPECS};

/// Navigation cursor movements in the file panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    NextFile,
    PreviousFile,
    NextPart,
    PreviousPart,
}

/// Everything a recognized key can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move a cell forward in its domain
    Advance(CellId),
    /// Move a cell backward in its domain
    Retreat(CellId),
    /// Move the file or part cursor
    Move(Cursor),
    /// Re-collect files from disk
    Recompute,
    /// Write a launcher script for the current paths
    Export,
    /// Leave the control loop
    Exit,
}

/// Key to write the launcher script
pub const EXPORT_KEY: char = 'e';

/// Key table built from the cell registry plus the fixed navigation keys
pub static KEYMAP: Lazy<HashMap<KeyCode, Action>> = Lazy::new(|| {
    let mut map = HashMap::new();

    for spec in &CELL_SPECS {
        map.insert(KeyCode::Char(spec.keys.advance), Action::Advance(spec.id));
        if let Some(retreat) = spec.keys.retreat {
            map.insert(KeyCode::Char(retreat), Action::Retreat(spec.id));
        }
    }

    map.insert(KeyCode::Right, Action::Move(Cursor::NextFile));
    map.insert(KeyCode::Left, Action::Move(Cursor::PreviousFile));
    map.insert(KeyCode::Down, Action::Move(Cursor::NextPart));
    map.insert(KeyCode::Up, Action::Move(Cursor::PreviousPart));
    map.insert(KeyCode::F(5), Action::Recompute);
    map.insert(KeyCode::Char(EXPORT_KEY), Action::Export);
    map.insert(KeyCode::Esc, Action::Exit);

    map
});

/// Action bound to a key press, if any.
///
/// Letters match regardless of case. Ctrl+C exits since raw mode swallows
/// the interrupt signal; other Ctrl/Alt chords are not bound.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(Action::Exit);
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    KEYMAP.get(&code).copied()
}
