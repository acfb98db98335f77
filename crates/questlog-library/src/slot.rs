//! Durable storage slots for the serialized library

use crate::LibraryError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A single named location holding the serialized library
pub trait Slot {
    /// Read the stored contents, `None` if nothing was ever written
    fn read(&self) -> Result<Option<String>, LibraryError>;

    /// Replace the stored contents
    fn write(&self, contents: &str) -> Result<(), LibraryError>;
}

/// Slot backed by a JSON file
///
/// Writes go to a sibling `.partial` file which is then renamed over the
/// target, so readers never observe a half-written library.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn partial_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "library".into());
        name.push(".partial");
        self.path.with_file_name(name)
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<String>, LibraryError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(contents))
    }

    fn write(&self, contents: &str) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let partial = self.partial_path();
        fs::write(&partial, contents)?;
        fs::rename(&partial, &self.path)?;

        tracing::debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }
}

/// In-memory slot, used for ephemeral sessions and tests
#[derive(Debug, Default)]
pub struct MemorySlot {
    contents: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds some contents
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
            writes: Mutex::new(0),
        }
    }

    /// Current contents
    pub fn contents(&self) -> Option<String> {
        self.lock_contents().ok().and_then(|c| c.clone())
    }

    /// Number of writes since creation
    pub fn writes(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }

    fn lock_contents(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, LibraryError> {
        self.contents
            .lock()
            .map_err(|_| LibraryError::Slot("memory slot poisoned".to_string()))
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>, LibraryError> {
        Ok(self.lock_contents()?.clone())
    }

    fn write(&self, contents: &str) -> Result<(), LibraryError> {
        *self.lock_contents()? = Some(contents.to_string());
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }
}

impl<S: Slot + ?Sized> Slot for &S {
    fn read(&self) -> Result<Option<String>, LibraryError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), LibraryError> {
        (**self).write(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_slot_missing_file() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("library.json"));
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn test_file_slot_write_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("library.json");
        let slot = FileSlot::new(&path);

        slot.write("[]").unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("nested").join("library.json.partial").exists());
    }

    #[test]
    fn test_file_slot_overwrites() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("library.json"));

        slot.write("[1]").unwrap();
        slot.write("[2]").unwrap();

        assert_eq!(slot.read().unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_memory_slot_counts_writes() {
        let slot = MemorySlot::new();
        assert_eq!(slot.writes(), 0);
        assert!(slot.read().unwrap().is_none());

        slot.write("[]").unwrap();
        slot.write("[]").unwrap();

        assert_eq!(slot.writes(), 2);
        assert_eq!(slot.contents().as_deref(), Some("[]"));
    }
}
