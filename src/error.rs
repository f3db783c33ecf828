//! Global error handling for clipnav
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for clipnav operations
#[derive(Error, Debug)]
pub enum NavError {
    /// Input path does not exist
    #[error("Path does not exist: {0}")]
    InvalidPath(String),

    /// Directory listing was refused
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A classified text file could not be read
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        /// Path of the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Header and footer alone do not fit into the character limit
    #[error("Character limit {limit} is too small for a {overhead} character header and footer")]
    LimitTooSmall {
        /// Configured character limit
        limit: usize,
        /// Header plus footer length
        overhead: usize,
    },

    /// A control cell was given a value outside its domain
    #[error("Invalid control state: {0}")]
    InvalidState(String),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized Result type for clipnav operations
pub type Result<T> = std::result::Result<T, NavError>;

/// Creates a NavError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::NavError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// `main` reports through io::Result
impl From<NavError> for io::Error {
    fn from(err: NavError) -> Self {
        match err {
            NavError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
