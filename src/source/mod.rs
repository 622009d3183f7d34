//! Version source abstraction layer
//!
//! Version literals live in text files, optionally on a given line. The [VersionSource] trait
//! keeps the rest of the crate independent of the filesystem:
//!
//! - [file::FileSource]: reads and writes real files
//! - [mock::MockSource]: in-memory files for testing
//!
//! Line selection is shared between implementations through [select_line] and
//! [replace_line].
//!
//! ```rust
//! # use bumper::source::{MockSource, VersionFileRef, VersionSource};
//! let source = MockSource::new().with_file("VERSION", "1.2.3\n");
//! let file = VersionFileRef::new("VERSION").with_line(1);
//! assert_eq!(source.read(&file).unwrap(), "1.2.3");
//! ```

pub mod file;
pub mod mock;

pub use file::FileSource;
pub use mock::MockSource;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file holding a version literal, and optionally the 1-based line it sits on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFileRef {
    pub path: PathBuf,
    /// Unset means the whole file. Line 0 is treated as line 1; lines past the end select the
    /// last line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl VersionFileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VersionFileRef {
            path: path.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Storage that version files are read from and written back to
///
/// Implementors provide whole-file access by path; line selection is layered on top by the
/// provided methods. All implementors must be `Send + Sync`.
pub trait VersionSource: Send + Sync {
    /// Read the full content at `path`
    ///
    /// # Errors
    /// [crate::error::BumperError::UnreadableSource] if the file cannot be read.
    fn read_file(&self, path: &Path) -> Result<String>;

    /// Replace the full content at `path`
    ///
    /// # Errors
    /// [crate::error::BumperError::UnwritableSource] if the file cannot be written.
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// The selected line of `file`, or its full content when no line is set
    fn read(&self, file: &VersionFileRef) -> Result<String> {
        let content = self.read_file(&file.path)?;
        Ok(match file.line {
            Some(_) => select_line(&content, file.line).to_string(),
            None => content,
        })
    }

    /// Replace the selected line of `file` with `text`, or its full content when no line is set
    fn write(&self, file: &VersionFileRef, text: &str) -> Result<()> {
        match file.line {
            Some(_) => {
                let content = self.read_file(&file.path)?;
                self.write_file(&file.path, &replace_line(&content, file.line, text))
            }
            None => self.write_file(&file.path, text),
        }
    }
}

/// Zero-based index of the selected line among `count` lines
fn line_index(count: usize, line: Option<usize>) -> usize {
    let requested = line.unwrap_or(1).max(1) - 1;
    requested.min(count.saturating_sub(1))
}

/// The selected line of `content`, without its line terminator
pub fn select_line(content: &str, line: Option<usize>) -> &str {
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() {
        return "";
    }
    lines[line_index(lines.len(), line)]
}

/// `content` with the selected line replaced by `replacement`.
///
/// Line terminators, including `\r\n` and a trailing newline, are preserved.
pub fn replace_line(content: &str, line: Option<usize>, replacement: &str) -> String {
    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();
    if lines.is_empty() {
        return replacement.to_string();
    }

    let index = line_index(lines.len(), line);
    let selected = lines[index];
    let terminator = if selected.ends_with("\r\n") {
        "\r\n"
    } else if selected.ends_with('\n') {
        "\n"
    } else {
        ""
    };
    let replaced = format!("{}{}", replacement, terminator);
    lines[index] = &replaced;
    lines.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "first\nsecond 1.2.3\nthird\n";

    #[test]
    fn test_select_line_defaults_to_first() {
        assert_eq!(select_line(CONTENT, None), "first");
        assert_eq!(select_line(CONTENT, Some(0)), "first");
    }

    #[test]
    fn test_select_line_is_one_based() {
        assert_eq!(select_line(CONTENT, Some(2)), "second 1.2.3");
    }

    #[test]
    fn test_select_line_past_end_uses_last() {
        assert_eq!(select_line(CONTENT, Some(42)), "third");
    }

    #[test]
    fn test_select_line_strips_crlf() {
        assert_eq!(select_line("1.0.0\r\nnext\r\n", Some(1)), "1.0.0");
    }

    #[test]
    fn test_select_line_empty_content() {
        assert_eq!(select_line("", Some(3)), "");
    }

    #[test]
    fn test_replace_line_keeps_other_lines() {
        assert_eq!(
            replace_line(CONTENT, Some(2), "second 1.2.4"),
            "first\nsecond 1.2.4\nthird\n"
        );
    }

    #[test]
    fn test_replace_line_without_trailing_newline() {
        assert_eq!(replace_line("a\n1.0", Some(5), "1.1"), "a\n1.1");
    }

    #[test]
    fn test_replace_line_preserves_crlf() {
        assert_eq!(replace_line("1.0\r\nb\r\n", None, "1.1"), "1.1\r\nb\r\n");
    }

    #[test]
    fn test_replace_line_empty_content() {
        assert_eq!(replace_line("", None, "1.0"), "1.0");
    }

    #[test]
    fn test_read_whole_file_without_line() {
        let source = MockSource::new().with_file("VERSION", CONTENT);
        assert_eq!(source.read(&VersionFileRef::new("VERSION")).unwrap(), CONTENT);
    }

    #[test]
    fn test_read_selected_line() {
        let source = MockSource::new().with_file("VERSION", "a\r\nb 1.0\r\n");
        let file = VersionFileRef::new("VERSION").with_line(2);
        assert_eq!(source.read(&file).unwrap(), "b 1.0");
        assert_eq!(source.read(&file.clone().with_line(0)).unwrap(), "a");
    }

    #[test]
    fn test_write_selected_line() {
        let source = MockSource::new().with_file("VERSION", "a\r\nb 1.0\r\n");
        let file = VersionFileRef::new("VERSION").with_line(2);
        source.write(&file, "b 1.1").unwrap();
        assert_eq!(source.content("VERSION").as_deref(), Some("a\r\nb 1.1\r\n"));
    }

    #[test]
    fn test_write_whole_file_without_line() {
        let source = MockSource::new().with_file("VERSION", "1.0\n");
        source.write(&VersionFileRef::new("VERSION"), "1.1\n").unwrap();
        assert_eq!(source.content("VERSION").as_deref(), Some("1.1\n"));
    }

    #[test]
    fn test_version_file_ref_deserialize() {
        let file: VersionFileRef = toml::from_str("path = \"package.json\"\nline = 3\n").unwrap();
        assert_eq!(file, VersionFileRef::new("package.json").with_line(3));

        let file: VersionFileRef = toml::from_str("path = \"VERSION\"\n").unwrap();
        assert_eq!(file.line, None);
    }
}
