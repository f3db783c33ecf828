/*!
 * Terminal plumbing: raw mode guard, screen output and input events
 */

use std::io::{self, stdout, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, DisableFocusChange, EnableFocusChange, Event},
    execute, queue,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::warn;

/// Raw mode, alternate screen and focus reporting for the session lifetime
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        execute!(stdout(), EnterAlternateScreen, EnableFocusChange)?;
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let restored = disable_raw_mode()
            .and_then(|_| execute!(stdout(), DisableFocusChange, LeaveAlternateScreen));
        if let Err(e) = restored {
            warn!("Failed to restore the terminal: {}", e);
        }
    }
}

/// Interactive display the session echoes to
pub struct Screen<W: Write> {
    out: W,
    /// Raw mode needs explicit carriage returns
    raw: bool,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, raw: bool) -> Self {
        Self { out, raw }
    }

    /// Discard everything on screen and home the cursor
    pub fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    /// Write text as-is
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        if self.raw {
            self.out.write_all(text.replace('\n', "\r\n").as_bytes())
        } else {
            self.out.write_all(text.as_bytes())
        }
    }

    /// Write text followed by a newline
    pub fn println(&mut self, text: &str) -> io::Result<()> {
        self.print(text)?;
        self.print("\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

/// Blocking source of input events
pub trait EventSource {
    /// Wait for the next event
    fn next_event(&mut self) -> io::Result<Event>;
}

/// Events read from the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        event::read()
    }
}
