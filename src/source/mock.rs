use crate::error::{BumperError, Result};
use crate::source::VersionSource;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// In-memory version files for testing without touching the filesystem
#[derive(Debug, Default)]
pub struct MockSource {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MockSource {
    /// Create a new source with no files
    pub fn new() -> Self {
        MockSource {
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Add a file, builder style
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.into());
        }
        self
    }

    /// Add or replace a file
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) -> Result<()> {
        let path = path.into();
        self.lock(&path)?.insert(path.clone(), content.into());
        Ok(())
    }

    /// Current content of a file, if present
    pub fn content<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        self.files.lock().ok()?.get(path.as_ref()).cloned()
    }

    fn lock(&self, path: &Path) -> Result<MutexGuard<'_, HashMap<PathBuf, String>>> {
        self.files.lock().map_err(|_| BumperError::UnreadableSource {
            path: path.display().to_string(),
            source: io::Error::new(io::ErrorKind::Other, "mock source lock poisoned"),
        })
    }
}

impl VersionSource for MockSource {
    fn read_file(&self, path: &Path) -> Result<String> {
        self.lock(path)?
            .get(path)
            .cloned()
            .ok_or_else(|| BumperError::UnreadableSource {
                path: path.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such mock file"),
            })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.lock(path)?
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VersionFileRef;

    #[test]
    fn test_mock_source_basic() {
        let source = MockSource::new().with_file("VERSION", "1.2.3");
        let file = VersionFileRef::new("VERSION");

        assert_eq!(source.read(&file).unwrap(), "1.2.3");
        source.write(&file, "1.2.4").unwrap();
        assert_eq!(source.content("VERSION").as_deref(), Some("1.2.4"));
    }

    #[test]
    fn test_mock_source_missing_file() {
        let source = MockSource::new();
        let result = source.read(&VersionFileRef::new("VERSION"));
        assert!(matches!(result, Err(BumperError::UnreadableSource { .. })));
    }

    #[test]
    fn test_mock_source_insert() {
        let source = MockSource::new();
        source.insert("a.txt", "x").unwrap();
        assert_eq!(source.content("a.txt").as_deref(), Some("x"));
        assert_eq!(source.content("b.txt"), None);
    }
}
