use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Byte sink the image store hands uploads to.
pub trait BlobWriter: Send + Sync {
    /// Persist `data` under `key` and return where it ended up.
    fn write(&self, key: &str, data: &[u8]) -> io::Result<String>;
}

/// Writes each blob as a file named `key` inside a folder.
#[derive(Debug, Clone)]
pub struct DirectoryBlobWriter {
    root: PathBuf,
}

impl DirectoryBlobWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobWriter for DirectoryBlobWriter {
    fn write(&self, key: &str, data: &[u8]) -> io::Result<String> {
        if key.contains(|c: char| c == '/' || c == '\\') || key.starts_with('.') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("blob key {key:?} escapes the image folder"),
            ));
        }
        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(key);
        std::fs::write(&path, data)?;
        Ok(path.display().to_string())
    }
}

/// Keeps blobs in memory. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobWriter {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobWriter for MemoryBlobWriter {
    fn write(&self, key: &str, data: &[u8]) -> io::Result<String> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "blob map poisoned"))?;
        blobs.insert(key.to_string(), data.to_vec());
        Ok(format!("memory://{key}"))
    }
}
