/*!
 * Input path validation and normalization
 */

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};

use crate::error::{NavError, Result};
use crate::utils::slash_path;

/// Validate a raw path argument and return its normalized absolute form.
///
/// Surrounding whitespace is trimmed and `\` separators become `/`. A path
/// that does not exist yields `InvalidPath`; a directory whose listing is
/// refused yields `PermissionDenied`.
pub fn sanitize_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().replace('\\', "/");
    let path = Path::new(&trimmed);

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(NavError::PermissionDenied(trimmed));
        }
        Err(_) => return Err(NavError::InvalidPath(trimmed)),
    };

    if metadata.is_dir() {
        if let Err(e) = fs::read_dir(path) {
            return Err(match e.kind() {
                io::ErrorKind::PermissionDenied => NavError::PermissionDenied(trimmed),
                _ => NavError::Io(e),
            });
        }
    }

    let absolute = fs::canonicalize(path)?;
    let normalized = slash_path(&absolute);
    debug!("Accepted input path {} as {}", raw, normalized);
    Ok(normalized)
}

/// Split raw arguments into accepted paths and the errors of rejected ones
pub fn sanitize_paths<S: AsRef<str>>(raws: &[S]) -> (Vec<String>, Vec<NavError>) {
    let mut accepted = Vec::with_capacity(raws.len());
    let mut rejected = Vec::new();

    for raw in raws {
        match sanitize_path(raw.as_ref()) {
            Ok(path) => accepted.push(path),
            Err(e) => {
                warn!("Skipping input path: {}", e);
                rejected.push(e);
            }
        }
    }

    (accepted, rejected)
}
