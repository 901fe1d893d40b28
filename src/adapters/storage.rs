use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// `Storage` backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(EtlError::SourceDirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            // Skip directories
            if !path.is_file() {
                continue;
            }

            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == extension)
                .unwrap_or(false);

            if matches {
                files.push(path);
            }
        }

        Ok(files)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, data)?;
        Ok(())
    }

    fn append_line(&self, path: &Path, line: &str) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", line)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// In-memory storage for unit tests. Listing returns files in reverse
    /// lexical order so callers that forget to sort are caught.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryStorage {
        files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
        fail_appends: bool,
    }

    impl MemoryStorage {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn failing_appends() -> Self {
            Self {
                fail_appends: true,
                ..Self::default()
            }
        }

        pub(crate) fn insert(&self, path: &str, data: &str) {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), data.as_bytes().to_vec());
        }

        pub(crate) fn get_string(&self, path: &str) -> Option<String> {
            self.files
                .lock()
                .unwrap()
                .get(Path::new(path))
                .map(|d| String::from_utf8_lossy(d).into_owned())
        }
    }

    impl Storage for MemoryStorage {
        fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
            let files = self.files.lock().unwrap();
            let mut found: Vec<PathBuf> = files
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
                .cloned()
                .collect();
            found.reverse();
            Ok(found)
        }

        fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                ))
            })
        }

        fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_path_buf(), data.to_vec());
            Ok(())
        }

        fn append_line(&self, path: &Path, line: &str) -> std::io::Result<()> {
            if self.fail_appends {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only log",
                ));
            }
            let mut files = self.files.lock().unwrap();
            let entry = files.entry(path.to_path_buf()).or_default();
            entry.extend_from_slice(line.as_bytes());
            entry.push(b'\n');
            Ok(())
        }
    }
}
