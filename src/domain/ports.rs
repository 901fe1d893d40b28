use crate::domain::model::{Dataset, SchemaFamily};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// File system seam used by every phase.
pub trait Storage {
    /// Regular files directly under `dir` whose extension equals `extension` (case-sensitive).
    /// No ordering is promised; callers sort.
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>>;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Creates or truncates `path`.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    /// Appends `line` plus a newline, creating the file when missing.
    fn append_line(&self, path: &Path, line: &str) -> std::io::Result<()>;
}

pub trait ConfigProvider {
    fn source_dir(&self) -> &Path;
    fn output_path(&self) -> &Path;
    fn log_path(&self) -> &Path;
    fn schema(&self) -> SchemaFamily;
    /// Whether a failed audit append aborts the run.
    fn strict_audit(&self) -> bool;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Dataset>;
    /// Total: numeric rules on null fields yield null.
    fn transform(&self, data: Dataset) -> Dataset;
    /// Returns the path written to.
    fn load(&self, data: &Dataset) -> Result<PathBuf>;
}
