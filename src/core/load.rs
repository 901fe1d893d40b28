use crate::domain::model::Dataset;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Serialises a dataset as CSV: header of schema field names, then one row per record.
pub struct Loader<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> Loader<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub fn load(&self, data: &Dataset, output_path: &Path) -> Result<()> {
        let bytes = render_csv(data)?;
        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            data.len(),
            bytes.len(),
            output_path.display()
        );
        self.storage.write_file(output_path, &bytes)
    }
}

/// Null fields are written as empty cells.
pub fn render_csv(data: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(data.schema().field_names())?;

    for record in data.records() {
        writer.write_record(
            record
                .values()
                .iter()
                .map(|v| v.as_ref().map(|v| v.render()).unwrap_or_default()),
        )?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(std::io::Error::other(e.to_string())))
}
