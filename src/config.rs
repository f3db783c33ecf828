/*!
 * Configuration handling for clipnav
 */

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_complete::Shell;
use env_logger::{Builder, Env, Target};

use crate::scanner::DEFAULT_PROGRESS_INTERVAL;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CLIPNAV_LOG";

/// Command-line arguments for clipnav
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "clipnav",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse files and copy them to the clipboard in chat-sized parts",
    long_about = "Interactive file navigator: view files and directories as a tree, list or table, page through file contents split to a character limit, and copy what is shown to the system clipboard."
)]
pub struct Args {
    /// Files and directories to process
    #[clap(required_unless_present = "generate", num_args = 1..)]
    pub paths: Vec<String>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Write logs to this file instead of stderr
    #[clap(long, value_name = "PATH")]
    pub log_file: Option<String>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Raw path arguments as given on the command line
    pub paths: Vec<String>,

    /// Log destination, stderr when unset
    pub log_file: Option<PathBuf>,

    /// Minimum time between two progress updates while collecting
    pub progress_interval: Duration,

    /// Directory the launcher script is written to
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            log_file: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            paths: args.paths,
            log_file: args.log_file.map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> io::Result<()> {
        if self.paths.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "At least one file or directory is required",
            ));
        }

        if let Some(parent) = self.log_file.as_ref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Log directory not found: {}", parent.display()),
                ));
            }
        }

        Ok(())
    }

    /// Install the env_logger backend for the `log` facade
    pub fn init_logging(&self) -> io::Result<()> {
        let mut builder = Builder::from_env(Env::default().filter_or(LOG_ENV, "warn"));
        if let Some(path) = &self.log_file {
            builder.target(Target::Pipe(Box::new(File::create(path)?)));
        }
        // A second initialization (tests) keeps the first logger
        let _ = builder.try_init();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Args::try_parse_from(["clipnav"]).is_err());
        let args = Args::try_parse_from(["clipnav", "a", "b"]).unwrap();
        assert_eq!(args.paths, vec!["a", "b"]);

        let completions = Args::try_parse_from(["clipnav", "--generate", "bash"]).unwrap();
        assert_eq!(completions.generate, Some(Shell::Bash));
    }

    #[test]
    fn test_validate_log_directory() {
        let mut config = Config {
            paths: vec![".".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_ok());

        config.log_file = Some(PathBuf::from("/no/such/dir/clipnav.log"));
        assert!(config.validate().is_err());

        config.log_file = Some(PathBuf::from("clipnav.log"));
        assert!(config.validate().is_ok());
    }
}
