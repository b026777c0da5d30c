//! Filesystem source loading for `use`.

use deja_eval::SourceLoader;
use std::io;
use std::path::{Path, PathBuf};

/// Loads `use` paths relative to a base directory, normally the directory
/// of the program being run. Absolute paths are read as given.
#[derive(Debug, Clone)]
pub struct FileLoader {
    base: PathBuf,
}

impl FileLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        FileLoader { base: base.into() }
    }

    /// Loader rooted at the directory containing `file`.
    pub fn beside(file: &Path) -> Self {
        match file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => FileLoader::new(dir),
            _ => FileLoader::new("."),
        }
    }
}

impl SourceLoader for FileLoader {
    fn load(&self, path: &str) -> io::Result<String> {
        let full = self.base.join(path);
        tracing::debug!(path = %full.display(), "loading module");
        std::fs::read_to_string(full)
    }
}
