use crate::adapters::{adapter_for, SourceFormat};
use crate::domain::model::{Dataset, SchemaFamily};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Discovers source files under a root directory and concatenates their records.
pub struct Extractor<'a, S: Storage> {
    storage: &'a S,
    schema: SchemaFamily,
}

impl<'a, S: Storage> Extractor<'a, S> {
    pub fn new(storage: &'a S, schema: SchemaFamily) -> Self {
        Self { storage, schema }
    }

    /// Files that `extract` will read, in processing order: CSV, JSON then XML,
    /// each group sorted lexically by path.
    pub fn discover(&self, root: &Path) -> Result<Vec<(SourceFormat, Vec<PathBuf>)>> {
        SourceFormat::ORDER
            .iter()
            .map(|&format| -> Result<(SourceFormat, Vec<PathBuf>)> {
                let mut files = self.storage.list_files(root, format.extension())?;
                files.sort();
                Ok((format, files))
            })
            .collect()
    }

    pub fn extract(&self, root: &Path) -> Result<Dataset> {
        let mut dataset = Dataset::new(self.schema);

        for (format, files) in self.discover(root)? {
            let adapter = adapter_for(format);
            let before = dataset.len();

            for path in &files {
                let data = self.storage.read_file(path)?;
                let records = adapter.parse_bytes(path, &data, self.schema)?;
                tracing::debug!("Read {} records from {}", records.len(), path.display());
                dataset.append(records)?;
            }

            tracing::info!(
                "Extracted {} records from {} {} file(s)",
                dataset.len() - before,
                files.len(),
                format
            );
        }

        Ok(dataset)
    }
}
