// Adapters layer: one translator per source format plus the local file system storage.

pub mod coerce;
pub mod csv_adapter;
pub mod json_adapter;
pub mod storage;
pub mod xml_adapter;

pub use csv_adapter::CsvAdapter;
pub use json_adapter::JsonAdapter;
pub use storage::LocalStorage;
pub use xml_adapter::XmlAdapter;

use crate::domain::model::{Record, SchemaFamily};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Json,
    Xml,
}

impl SourceFormat {
    /// Processing order of the extractor.
    pub const ORDER: [SourceFormat; 3] = [SourceFormat::Csv, SourceFormat::Json, SourceFormat::Xml];

    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Json => "json",
            SourceFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Converts the bytes of one source file into schema records.
///
/// Field-level problems degrade to null; anything that stops the file from
/// being read as its format is an `EtlError::MalformedFile`.
pub trait FormatAdapter {
    fn format(&self) -> SourceFormat;

    /// `path` is only used for error reporting.
    fn parse_bytes(&self, path: &Path, data: &[u8], schema: SchemaFamily) -> Result<Vec<Record>>;
}

pub fn adapter_for(format: SourceFormat) -> Box<dyn FormatAdapter> {
    match format {
        SourceFormat::Csv => Box::new(CsvAdapter),
        SourceFormat::Json => Box::new(JsonAdapter),
        SourceFormat::Xml => Box::new(XmlAdapter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_extensions() {
        let exts: Vec<&str> = SourceFormat::ORDER.iter().map(|f| f.extension()).collect();
        assert_eq!(exts, vec!["csv", "json", "xml"]);
    }

    #[test]
    fn test_adapter_for_matches_format() {
        for format in SourceFormat::ORDER {
            assert_eq!(adapter_for(format).format(), format);
        }
    }
}
