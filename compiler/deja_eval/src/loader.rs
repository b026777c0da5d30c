//! Source loading for `use`.

use rustc_hash::FxHashMap;
use std::io;

/// Resolves a module path to source text.
pub trait SourceLoader {
    fn load(&self, path: &str) -> io::Result<String>;
}

/// In-memory sources keyed by path.
#[derive(Default, Debug, Clone)]
pub struct MemoryLoader {
    sources: FxHashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, path: &str, source: &str) -> Self {
        self.sources.insert(path.to_string(), source.to_string());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &str) -> io::Result<String> {
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such module"))
    }
}
