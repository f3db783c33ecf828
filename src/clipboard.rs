/*!
 * Clipboard support for clipnav
 *
 * Provides functionality for copying output to system clipboard
 * with automatic detection of available clipboard mechanisms.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use log::{debug, info};
use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux clipboard
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (native or via WSL)
    Windows,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Command and arguments that read the clipboard text from stdin
    fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Wayland => ("wl-copy", &[]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Windows => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }
}

/// System clipboard backed by the first provider found at startup
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    provider: Option<ClipboardProvider>,
}

impl SystemClipboard {
    /// Detect the most appropriate clipboard mechanism for this system
    pub fn detect() -> Self {
        let provider = determine_clipboard_providers().into_iter().next();
        match provider {
            Some(provider) => info!("Using {:?} clipboard", provider),
            None => info!("No clipboard mechanism found"),
        }
        Self { provider }
    }

    /// Selected provider, if any
    pub fn provider(&self) -> Option<ClipboardProvider> {
        self.provider
    }
}

impl Clipboard for SystemClipboard {
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        let provider = self.provider.ok_or(ClipboardError::NoClipboardFound)?;
        let (cmd, args) = provider.command();
        debug!("Copying {} bytes with {}", text.len(), cmd);
        execute_clipboard_command(cmd, args, text)
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Check if a command exists on the system
///
/// # Arguments
/// * `command` - The command to check
///
/// # Returns
/// * `true` - If the command exists and can be executed
/// * `false` - Otherwise
pub fn command_exists(command: &str) -> bool {
    // First check if the command exists in the PATH
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| dir.join(command).exists()) {
            return true;
        }
    }

    // Try to run the command with '--version' flag as fallback
    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

/// Execute a command to copy text to clipboard
///
/// This centralizes all the common command execution logic:
/// - Spawning the process
/// - Writing to stdin
/// - Waiting for completion
/// - Error handling
fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;

        stdin
            .write_all(text.as_bytes())
            .map_err(|_| ClipboardError::CommandFailed(format!("Failed to write to {}", cmd)))?;
    }
    // Close stdin so the command sees end of input
    drop(child.stdin.take());

    let status = child
        .wait()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to wait for {}", cmd)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

/// Platform detection cache (using thread-safe lazy initialization)
static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else if cfg!(target_os = "android") {
            "android"
        } else {
            "unknown"
        }
    })
}

/// Determine which clipboard providers to try based on platform and preference
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    // tmux first when running inside a session
    if env::var("TMUX").is_ok() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    match get_platform() {
        "macos" => {
            if command_exists("pbcopy") {
                providers.push(ClipboardProvider::MacOS);
            }
        }
        "windows" | "wsl" => {
            if command_exists("clip.exe") {
                providers.push(ClipboardProvider::Windows);
            }
        }
        "linux" => {
            if env::var("WAYLAND_DISPLAY").is_ok() && command_exists("wl-copy") {
                providers.push(ClipboardProvider::Wayland);
            }
            if command_exists("xsel") {
                providers.push(ClipboardProvider::Xsel);
            }
            if command_exists("xclip") {
                providers.push(ClipboardProvider::Xclip);
            }
        }
        "android" => {
            if command_exists("termux-clipboard-set") {
                providers.push(ClipboardProvider::Termux);
            }
        }
        _ => {}
    }

    providers
}
