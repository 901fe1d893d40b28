use crate::adapters::{coerce, FormatAdapter, SourceFormat};
use crate::domain::model::{Record, SchemaFamily};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Header-driven CSV reader. Columns are matched to schema fields by exact name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

impl FormatAdapter for CsvAdapter {
    fn format(&self) -> SourceFormat {
        SourceFormat::Csv
    }

    fn parse_bytes(&self, path: &Path, data: &[u8], schema: SchemaFamily) -> Result<Vec<Record>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let headers = reader
            .headers()
            .map_err(|e| EtlError::malformed(path, SourceFormat::Csv, e))?
            .clone();

        // (schema index, column index) for every schema field present in the header
        let mut columns = Vec::new();
        for (i, field) in schema.fields().iter().enumerate() {
            match headers.iter().position(|h| h == field.name) {
                Some(col) => columns.push((i, col)),
                None => tracing::debug!(
                    "{}: column '{}' missing, field will be null",
                    path.display(),
                    field.name
                ),
            }
        }

        let fields = schema.fields();
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| EtlError::malformed(path, SourceFormat::Csv, e))?;
            // short rows pad with nulls, long rows cannot be attributed to columns
            if row.len() > headers.len() {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                return Err(EtlError::malformed(
                    path,
                    SourceFormat::Csv,
                    format!(
                        "line {}: expected at most {} fields, found {}",
                        line,
                        headers.len(),
                        row.len()
                    ),
                ));
            }
            let mut record = Record::empty(schema);
            for &(i, col) in &columns {
                let value = row
                    .get(col)
                    .and_then(|cell| coerce::from_text(fields[i].kind, cell));
                record.set(i, value);
            }
            records.push(record);
        }

        Ok(records)
    }
}
