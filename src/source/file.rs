use crate::error::{BumperError, Result};
use crate::source::VersionSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Version files on the local filesystem.
///
/// Relative paths are resolved against `root` when one is set, otherwise against the working
/// directory.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        FileSource { root: None }
    }

    /// Resolve relative paths against `root`
    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        FileSource {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl VersionSource for FileSource {
    fn read_file(&self, path: &Path) -> Result<String> {
        let path = self.resolve(path);
        fs::read_to_string(&path).map_err(|source| BumperError::UnreadableSource {
            path: path.display().to_string(),
            source,
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let path = self.resolve(path);
        debug!(path = %path.display(), bytes = content.len(), "writing version file");
        fs::write(&path, content).map_err(|source| BumperError::UnwritableSource {
            path: path.display().to_string(),
            source,
        })
    }
}
