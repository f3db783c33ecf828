/*!
 * Launcher script export
 *
 * Writes `run.sh` (or `run.bat` on Windows) that starts clipnav again with
 * the same path arguments.
 */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;

use crate::error::Result;

/// Quote an argument for a POSIX shell
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Quote an argument for cmd.exe
pub fn batch_quote(arg: &str) -> String {
    format!("\"{}\"", arg.replace('"', "\"\""))
}

/// Script body for the current platform
pub fn launcher_script(program: &str, paths: &[String]) -> String {
    let stamp = Local::now().to_rfc3339();
    if cfg!(windows) {
        let args: Vec<String> = paths.iter().map(|p| batch_quote(p)).collect();
        format!(
            "@echo off\r\nrem Generated by clipnav on {}\r\n{} {}\r\n",
            stamp,
            batch_quote(program),
            args.join(" ")
        )
    } else {
        let args: Vec<String> = paths.iter().map(|p| shell_quote(p)).collect();
        format!(
            "#!/bin/sh\n# Generated by clipnav on {}\nexec {} {}\n",
            stamp,
            shell_quote(program),
            args.join(" ")
        )
    }
}

/// Write the launcher into `dir` and return its path
pub fn write_launcher(dir: &Path, paths: &[String]) -> Result<PathBuf> {
    let program = env::current_exe()
        .map(|exe| exe.to_string_lossy().to_string())
        .unwrap_or_else(|_| "clipnav".to_string());

    let name = if cfg!(windows) { "run.bat" } else { "run.sh" };
    let target = dir.join(name);
    fs::write(&target, launcher_script(&program, paths))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755))?;
    }

    info!("Wrote launcher {}", target.display());
    Ok(target)
}
