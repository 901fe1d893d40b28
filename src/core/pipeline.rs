use crate::core::extract::Extractor;
use crate::core::load::Loader;
use crate::core::transform::Transformer;
use crate::core::{ConfigProvider, Dataset, Pipeline, Storage};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Directory-to-CSV pipeline: reads every source file of the configured schema
/// from `source_dir` and writes the transformed rows to `output_path`.
pub struct FilePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> FilePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for FilePipeline<S, C> {
    fn extract(&self) -> Result<Dataset> {
        tracing::debug!("Scanning {}", self.config.source_dir().display());
        Extractor::new(&self.storage, self.config.schema()).extract(self.config.source_dir())
    }

    fn transform(&self, data: Dataset) -> Dataset {
        Transformer::new(self.config.schema()).transform(data)
    }

    fn load(&self, data: &Dataset) -> Result<PathBuf> {
        let output_path = self.config.output_path();
        Loader::new(&self.storage).load(data, output_path)?;
        Ok(output_path.to_path_buf())
    }
}
