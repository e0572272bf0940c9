//! Document writers
//!
//! The crawler hands finished documents to a [`DocumentWriter`]; the file system writer is
//! the production implementation.

use crate::CrawlError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Destination for emitted documents
///
/// Implementations must be safe to call from concurrent crawl branches.
pub trait DocumentWriter: Send + Sync {
    /// Writes `content` under `file_name`, replacing any previous document of that name
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the document was written
    /// * `Err(CrawlError::Write)` - The document could not be written
    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, CrawlError>;
}

/// Writes documents as files into a directory
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    /// Creates a writer for the given output directory
    ///
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentWriter for FsWriter {
    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, CrawlError> {
        // create_dir_all succeeds if the directory already exists or appears concurrently
        std::fs::create_dir_all(&self.root).map_err(|source| CrawlError::Write {
            path: self.root.clone(),
            source,
        })?;

        let path = self.root.join(file_name);
        std::fs::write(&path, content).map_err(|source| CrawlError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Keeps documents in memory, keyed by file name
#[derive(Debug, Default)]
pub struct MemoryWriter {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all written documents
    pub fn documents(&self) -> BTreeMap<String, String> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// Content of a single document
    pub fn get(&self, file_name: &str) -> Option<String> {
        self.documents
            .lock()
            .ok()
            .and_then(|docs| docs.get(file_name).cloned())
    }
}

impl DocumentWriter for MemoryWriter {
    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, CrawlError> {
        let mut documents = self.documents.lock().map_err(|_| CrawlError::Write {
            path: PathBuf::from(file_name),
            source: std::io::Error::new(std::io::ErrorKind::Other, "document store poisoned"),
        })?;
        documents.insert(file_name.to_string(), content.to_string());
        Ok(PathBuf::from(file_name))
    }
}
