/*!
 * Utility functions for clipnav
 */

use std::path::Path;

/// Longest common leading run of characters shared by all strings.
///
/// This is a literal string prefix, not a path prefix: `/a/foo` and
/// `/a/foobar` share `/a/foo`.
pub fn common_prefix<S: AsRef<str>>(values: &[S]) -> String {
    let Some(first) = values.first() else {
        return String::new();
    };
    let first = first.as_ref();
    let mut end = first.len();

    for value in &values[1..] {
        let shared: usize = first
            .char_indices()
            .zip(value.as_ref().chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((_, a), _)| a.len_utf8())
            .sum();
        end = end.min(shared);
    }

    first[..end].to_string()
}

/// Convert a path to a string using `/` separators
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Shorten a path for single-line display, keeping its tail
pub fn shorten_for_display(path: &str, max_len: usize) -> String {
    let count = path.chars().count();
    if count <= max_len {
        return path.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = path.chars().skip(count - keep).collect();
    format!("...{}", tail)
}

/// Number of characters (not bytes) in a string
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix(&["/a/b/c", "/a/b/d"]), "/a/b/");
        assert_eq!(common_prefix(&["/a/foo", "/a/foobar"]), "/a/foo");
        assert_eq!(common_prefix(&["/only/one"]), "/only/one");
        assert_eq!(common_prefix::<&str>(&[]), "");
        assert_eq!(common_prefix(&["/é/x", "/é/y"]), "/é/");
    }

    #[test]
    fn test_shorten_for_display() {
        assert_eq!(shorten_for_display("short", 10), "short");
        let shortened = shorten_for_display("/a/very/long/path/to/file.txt", 12);
        assert_eq!(shortened, ".../file.txt");
        assert_eq!(char_len(&shortened), 12);
    }
}
