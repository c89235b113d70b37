//! In-memory staged file store.
//!
//! Planning reads module sources from here instead of the disk; loader
//! and dev-module stages resolve against staged entries. Keys are module
//! ids, not necessarily on-disk paths.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{Error, Result};

/// Longest accepted staged path, in bytes.
const MAX_STAGED_PATH: usize = 4096;

/// Largest accepted staged file, in bytes.
const MAX_STAGED_FILE_SIZE: usize = 1024 * 1024;

#[derive(Debug, Default)]
pub struct StagedFs {
    files: RwLock<FxHashMap<String, String>>,
}

impl StagedFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a file under a module id, replacing any previous content.
    pub fn stage(&self, path: impl Into<String>, contents: impl Into<String>) -> Result<()> {
        let path = path.into();
        if path.is_empty() || path.contains('\0') {
            return Err(Error::InvalidStagedPath(path));
        }
        if path.len() > MAX_STAGED_PATH {
            let preview: String = path.chars().take(64).collect();
            return Err(Error::InvalidStagedPath(format!(
                "{preview}... ({} bytes)",
                path.len()
            )));
        }

        let contents = contents.into();
        if contents.len() > MAX_STAGED_FILE_SIZE {
            return Err(Error::StagedFileTooLarge {
                path,
                size: contents.len(),
                max_size: MAX_STAGED_FILE_SIZE,
            });
        }

        self.files.write().insert(path, contents);
        Ok(())
    }

    pub fn read(&self, path: &str) -> Option<String> {
        self.files.read().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.read().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_files_are_readable_back() {
        let staged = StagedFs::new();
        staged.stage("virtual:app", "export const app = 1;").unwrap();

        assert!(staged.contains("virtual:app"));
        assert_eq!(
            staged.read("virtual:app").as_deref(),
            Some("export const app = 1;")
        );
        assert!(staged.read("virtual:other").is_none());
    }

    #[test]
    fn null_bytes_in_path_are_rejected() {
        let staged = StagedFs::new();
        let err = staged.stage("bad\0path", "x").unwrap_err();
        assert!(matches!(err, Error::InvalidStagedPath(_)));
    }

    #[test]
    fn oversized_contents_are_rejected() {
        let staged = StagedFs::new();
        let big = "x".repeat(MAX_STAGED_FILE_SIZE + 1);
        let err = staged.stage("virtual:big", big).unwrap_err();
        assert!(matches!(err, Error::StagedFileTooLarge { .. }));
    }

    #[test]
    fn restaging_replaces_contents() {
        let staged = StagedFs::new();
        staged.stage("virtual:app", "v1").unwrap();
        staged.stage("virtual:app", "v2").unwrap();
        assert_eq!(staged.read("virtual:app").as_deref(), Some("v2"));
        assert_eq!(staged.len(), 1);
    }
}
