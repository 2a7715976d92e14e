use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Filesystem storage. Relative paths resolve against `base_path`; an empty
/// base means the process working directory.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = fs::read(self.resolve(path))?;
        Ok(data)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        let parent = match full_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        // Same directory as the target so the rename stays on one filesystem.
        let mut staged = NamedTempFile::new_in(&parent)?;
        staged.write_all(data)?;
        staged.as_file().sync_all()?;
        staged.persist(&full_path)?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_relative_to_base() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .write_file(Path::new("nested/out.ipynb"), b"{}")
            .unwrap();

        assert!(storage.is_file(Path::new("nested/out.ipynb")));
        assert_eq!(storage.read_file(Path::new("nested/out.ipynb")).unwrap(), b"{}");
        assert!(dir.path().join("nested/out.ipynb").is_file());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.write_file(Path::new("a.ipynb"), b"first").unwrap();
        storage.write_file(Path::new("a.ipynb"), b"second").unwrap();
        assert_eq!(storage.read_file(Path::new("a.ipynb")).unwrap(), b"second");

        // no staging files left behind
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_directories_are_not_files() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(!storage.is_file(Path::new("")));
        assert!(!storage.is_file(Path::new("missing.ipynb")));
    }
}
