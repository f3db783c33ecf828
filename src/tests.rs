/*!
 * Tests for clipnav functionality
 */

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tempfile::{tempdir, TempDir};

use crate::clipboard::{self, Clipboard};
use crate::config::Config;
use crate::control::{CellId, Panel, ViewMode};
use crate::keymap::Action;
use crate::render::render_inventory;
use crate::sanitize::{sanitize_path, sanitize_paths};
use crate::scanner::Collector;
use crate::session::{Flow, Selection, Session};
use crate::terminal::{EventSource, Screen};
use crate::types::{EntryKind, PathStyle};
use crate::utils::char_len;

// Helper function to create a test directory structure
fn setup_test_directory() -> io::Result<TempDir> {
    let temp_dir = tempdir()?;

    fs::create_dir(temp_dir.path().join("sub"))?;

    let mut text = File::create(temp_dir.path().join("a.txt"))?;
    writeln!(text, "alpha\nbeta")?;

    let mut binary = File::create(temp_dir.path().join("b.bin"))?;
    binary.write_all(&[0u8, 1u8, 2u8, 3u8])?;

    let mut nested = File::create(temp_dir.path().join("sub").join("c.txt"))?;
    writeln!(nested, "nested content")?;

    Ok(temp_dir)
}

fn sanitized(path: &Path) -> String {
    sanitize_path(&path.to_string_lossy()).unwrap()
}

fn no_progress(_: &str, _: &[crate::scanner::LevelProgress]) {}

/// Clipboard that records every copy
#[derive(Debug, Default)]
struct RecordingClipboard {
    copies: Vec<String>,
}

impl Clipboard for RecordingClipboard {
    fn copy_to_clipboard(&mut self, text: &str) -> clipboard::Result<()> {
        self.copies.push(text.to_string());
        Ok(())
    }
}

/// Replays key presses, then exits
struct ScriptedEvents {
    events: VecDeque<Event>,
}

impl ScriptedEvents {
    fn keys(codes: &[KeyCode]) -> Self {
        Self {
            events: codes
                .iter()
                .map(|code| Event::Key(KeyEvent::new(*code, KeyModifiers::NONE)))
                .collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        Ok(self
            .events
            .pop_front()
            .unwrap_or_else(|| Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))))
    }
}

type TestSession = Session<RecordingClipboard, Vec<u8>>;

fn session_for(paths: Vec<String>) -> TestSession {
    let config = Config {
        paths: paths.clone(),
        ..Config::default()
    };
    Session::new(
        paths,
        &config,
        RecordingClipboard::default(),
        Screen::new(Vec::new(), false),
    )
}

fn run_keys(session: &mut TestSession, codes: &[KeyCode]) {
    session.run(&mut ScriptedEvents::keys(codes)).unwrap();
}

fn copies(session: &TestSession) -> &[String] {
    &session.clipboard().copies
}

fn screen_text(session: &TestSession) -> String {
    String::from_utf8_lossy(session.screen().get_ref()).to_string()
}

#[test]
fn test_recursive_collects_superset() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let root = sanitized(temp_dir.path());
    let collector = Collector::default();

    let deep = collector.collect(&[root.clone()], true, &mut no_progress);
    assert_eq!(deep.entries.len(), 3);
    assert_eq!(deep.text_count(), 2);
    assert_eq!(deep.binary_count(), 1);

    // A directory input is not entered without recursion
    let shallow = collector.collect(&[root.clone()], false, &mut no_progress);
    assert!(shallow.entries.is_empty());

    // Direct file inputs are kept either way
    let file = sanitized(&temp_dir.path().join("a.txt"));
    let mixed = collector.collect(&[file, root], false, &mut no_progress);
    assert_eq!(mixed.entries.len(), 1);
    assert!(mixed.entries[0].absolute_path.ends_with("/a.txt"));
    for entry in &mixed.entries {
        assert!(deep
            .entries
            .iter()
            .any(|e| e.absolute_path == entry.absolute_path));
    }
    Ok(())
}

#[test]
fn test_binary_filter_in_every_view() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let root = sanitized(temp_dir.path());
    let collection = Collector::default().collect(&[root], true, &mut no_progress);

    let binary = collection
        .entries
        .iter()
        .find(|e| e.kind == EntryKind::Binary)
        .unwrap();
    assert!(binary.absolute_path.ends_with("/b.bin"));

    for mode in [ViewMode::Tree, ViewMode::List, ViewMode::Table] {
        let with = render_inventory(&collection.entries, mode, PathStyle::Relative, true);
        let without = render_inventory(&collection.entries, mode, PathStyle::Relative, false);
        assert!(with.contains("b.bin"), "{:?}", mode);
        assert!(!without.contains("b.bin"), "{:?}", mode);
        assert!(without.contains("a.txt"), "{:?}", mode);
    }
    Ok(())
}

#[test]
fn test_invalid_path_is_excluded() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let valid = temp_dir.path().to_string_lossy().to_string();
    let missing = temp_dir.path().join("missing").to_string_lossy().to_string();

    let (accepted, rejected) = sanitize_paths(&[valid, missing]);
    assert_eq!(accepted.len(), 1);
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0].to_string().contains("Path does not exist"));
    Ok(())
}

#[test]
fn test_relative_paths_use_literal_common_prefix() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir(temp_dir.path().join("foo"))?;
    fs::create_dir(temp_dir.path().join("foobar"))?;
    fs::write(temp_dir.path().join("foo").join("x.txt"), "x")?;
    fs::write(temp_dir.path().join("foobar").join("y.txt"), "y")?;

    let paths = vec![
        sanitized(&temp_dir.path().join("foo")),
        sanitized(&temp_dir.path().join("foobar")),
    ];
    let collection = Collector::default().collect(&paths, true, &mut no_progress);
    let relative: Vec<&str> = collection
        .entries
        .iter()
        .map(|e| e.relative_path.as_str())
        .collect();

    assert_eq!(relative, vec!["/x.txt", "bar/y.txt"]);
    Ok(())
}

#[test]
fn test_collection_warns_and_continues() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let root = sanitized(temp_dir.path());
    let gone = format!("{}/vanished", root);

    let collection = Collector::default().collect(&[root, gone], true, &mut no_progress);
    assert_eq!(collection.entries.len(), 3);
    assert_eq!(collection.warnings.len(), 1);
    Ok(())
}

#[test]
fn test_session_copies_what_is_shown() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let root = sanitized(temp_dir.path());
    let mut session = session_for(vec![root.clone()]);

    // Nothing is copied before the first key
    assert!(copies(&session).is_empty());

    // 't' switches the directory view to List, 'w' opens the first file
    run_keys(&mut session, &[KeyCode::Char('t'), KeyCode::Char('w')]);
    assert_eq!(session.state().panel(), Panel::File);
    assert_eq!(session.state().view_mode(), ViewMode::List);

    let copied = copies(&session);
    assert_eq!(copied.len(), 2);
    assert!(copied[0].contains("[txt] "));
    assert!(copied[0].contains("[bin] "));

    let file = format!("{}/a.txt", root);
    assert_eq!(
        copied[1],
        format!(
            "File: \"{}\"\n--- Beginning of File ---\nalpha\nbeta\n\n--- End of File ---\n",
            file
        )
    );
    assert!(screen_text(&session).contains("Total character length"));
    Ok(())
}

#[test]
fn test_session_partitions_within_limit() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let content: String = (0..300).map(|i| format!("line number {:03}\n", i)).collect();
    fs::write(temp_dir.path().join("long.txt"), &content)?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);

    // Lowering the limit without partitioning only redraws the legend
    for _ in 0..3596 {
        assert_eq!(
            session.apply(Action::Retreat(CellId::Limit)).unwrap(),
            Flow::LegendOnly
        );
    }
    assert_eq!(session.state().limit(), 500);

    run_keys(
        &mut session,
        &[KeyCode::Char('w'), KeyCode::Char('p'), KeyCode::Down],
    );

    let copied = copies(&session);
    assert_eq!(copied.len(), 3);
    assert!(copied[0].contains(&content));

    let total = session.state().navigation.total_parts();
    assert!(total > 1);
    assert!(copied[1].contains(&format!("Part 1/{}", total)));
    assert!(copied[2].contains(&format!("Part 2/{}", total)));
    assert!(char_len(&copied[1]) <= 500);
    assert!(char_len(&copied[2]) <= 500);
    assert_eq!(session.state().navigation.part_index(), 1);
    Ok(())
}

#[test]
fn test_session_binary_toggle_skips_binary() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("a.txt"), "text\n")?;
    fs::write(temp_dir.path().join("b.bin"), [0u8, 159, 146, 150])?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);

    // The binary file is selectable but never copied
    run_keys(&mut session, &[KeyCode::Char('w'), KeyCode::Right]);
    assert_eq!(copies(&session).len(), 1);
    assert!(matches!(session.selection(), Selection::Binary(_)));
    assert!(screen_text(&session).contains("binary file"));

    // Excluding binaries resets the cursor onto the remaining text file
    run_keys(&mut session, &[KeyCode::Char('b')]);
    assert_eq!(session.state().navigation.file_count(), 1);
    assert!(matches!(session.selection(), Selection::Text(_)));
    let copied = copies(&session);
    assert_eq!(copied.len(), 2);
    assert!(copied[1].contains("text\n"));
    Ok(())
}

#[test]
fn test_session_continuous_stream_is_cached() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);

    run_keys(
        &mut session,
        &[
            KeyCode::Char('w'),
            KeyCode::Char('u'),
            KeyCode::Down,
            KeyCode::Up,
        ],
    );
    assert_eq!(session.stream_builds(), 1);

    let copied = copies(&session);
    let stream = copied.last().unwrap();
    assert!(stream.starts_with("Text Stream: \"Continuous file stream.\""));
    assert!(stream.contains("File structure:"));
    assert!(stream.contains("nested content"));
    assert!(stream.contains("[INFO] binary file:"));

    // A stream-relevant setting forces one rebuild
    run_keys(&mut session, &[KeyCode::Char('b'), KeyCode::Down]);
    assert_eq!(session.stream_builds(), 2);
    assert!(!copies(&session).last().unwrap().contains("b.bin"));
    Ok(())
}

#[test]
fn test_session_verbose_off_hides_content() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);

    run_keys(&mut session, &[KeyCode::Char('d'), KeyCode::Char('w')]);
    assert!(screen_text(&session).contains("Verbose State (OFF)"));
    assert!(!screen_text(&session).contains("alpha"));
    assert!(copies(&session).last().unwrap().contains("alpha"));
    Ok(())
}

#[test]
fn test_session_without_files() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);

    run_keys(&mut session, &[KeyCode::Char('w')]);
    assert_eq!(session.selection(), Selection::Empty);
    assert!(copies(&session).is_empty());
    assert!(screen_text(&session).contains("[INFO] No file selected for display."));
    Ok(())
}

#[test]
fn test_session_window_focus_gates_keys() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);
    let press = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));

    assert_eq!(session.handle_event(press('q')).unwrap(), Flow::Render);
    assert!(session.state().window_focus());

    assert_eq!(session.handle_event(Event::FocusLost).unwrap(), Flow::Ignore);
    assert_eq!(session.handle_event(press('w')).unwrap(), Flow::Ignore);
    assert_eq!(session.state().panel(), Panel::Directory);

    let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert_eq!(session.handle_event(esc).unwrap(), Flow::Exit);

    assert_eq!(session.handle_event(Event::FocusGained).unwrap(), Flow::Ignore);
    assert_eq!(session.handle_event(press('w')).unwrap(), Flow::Render);
    assert_eq!(session.state().panel(), Panel::File);
    Ok(())
}

#[test]
fn test_session_recursive_toggle_recollects() -> io::Result<()> {
    let temp_dir = setup_test_directory()?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);
    assert_eq!(session.entries().len(), 3);

    session.apply(Action::Advance(CellId::Recursive)).unwrap();
    assert!(session.entries().is_empty());
    assert_eq!(session.state().navigation.file_count(), 0);

    // New files show up after a recompute
    fs::write(temp_dir.path().join("late.txt"), "late")?;
    session.apply(Action::Advance(CellId::Recursive)).unwrap();
    session.apply(Action::Recompute).unwrap();
    assert_eq!(session.entries().len(), 4);
    Ok(())
}

#[test]
fn test_session_unreadable_text_file_keeps_running() -> io::Result<()> {
    let temp_dir = tempdir()?;
    // Latin-1 bytes: no null byte, but not valid UTF-8
    fs::write(temp_dir.path().join("a_latin1.txt"), b"caf\xe9\n")?;
    fs::write(temp_dir.path().join("b_good.txt"), "good\n")?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);
    assert!(session
        .entries()
        .iter()
        .all(|entry| entry.kind == EntryKind::Text));

    run_keys(&mut session, &[KeyCode::Char('w')]);
    assert!(copies(&session).is_empty());
    assert!(screen_text(&session).contains("[ERROR] Failed to read file"));
    assert_eq!(session.state().navigation.total_parts(), 0);

    run_keys(&mut session, &[KeyCode::Right]);
    let copied = copies(&session);
    assert_eq!(copied.len(), 1);
    assert!(copied[0].contains("good\n"));
    assert!(!copied[0].contains("a_latin1.txt"));
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn test_session_reads_non_utf8_file_names() -> io::Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = tempdir()?;
    let name = OsStr::from_bytes(b"caf\xe9.txt");
    fs::write(temp_dir.path().join(name), "bonjour\n")?;
    let mut session = session_for(vec![sanitized(temp_dir.path())]);

    let entry = &session.entries()[0];
    assert!(entry.absolute_path.contains('\u{FFFD}'));
    assert_eq!(entry.path.file_name(), Some(name));

    run_keys(&mut session, &[KeyCode::Char('w')]);
    assert!(copies(&session)[0].contains("bonjour\n"));

    run_keys(&mut session, &[KeyCode::Char('u')]);
    let stream = copies(&session).last().unwrap();
    assert!(stream.contains("bonjour\n"));
    assert!(!stream.contains("[ERROR]"));
    Ok(())
}
