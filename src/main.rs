/*!
 * Command-line interface for clipnav
 */

use std::io::{self, stdout};

use clap::{CommandFactory, Parser};
use log::info;

use clipnav::clipboard::SystemClipboard;
use clipnav::config::{Args, Config};
use clipnav::error::NavError;
use clipnav::sanitize::sanitize_paths;
use clipnav::session::Session;
use clipnav::terminal::{Screen, TerminalEvents, TerminalGuard};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "clipnav", &mut io::stdout());
        return Ok(());
    }

    // Create and validate configuration
    let config = Config::from_args(args);
    config.validate()?;
    config.init_logging()?;

    // Reject paths that do not exist or cannot be read
    let (paths, rejected) = sanitize_paths(&config.paths);
    for error in &rejected {
        eprintln!("[ERROR] {}", error);
    }
    if paths.is_empty() {
        return Err(NavError::Config("No valid paths to process".to_string()).into());
    }
    info!("Processing {} input path(s)", paths.len());

    let clipboard = SystemClipboard::detect();
    if clipboard.provider().is_none() {
        eprintln!("[WARN] No clipboard mechanism found, output is only shown on screen");
    }

    let _guard = TerminalGuard::enter()?;
    let screen = Screen::new(stdout(), true);
    let mut session = Session::new(paths, &config, clipboard, screen);
    session.run(&mut TerminalEvents)?;

    Ok(())
}
