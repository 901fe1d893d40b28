use crate::config::{DEFAULT_LOG_FILE, DEFAULT_OUTPUT_FILE};
use crate::core::ConfigProvider;
use crate::domain::model::SchemaFamily;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "file-etl")]
#[command(about = "Merge CSV, JSON lines and XML files into one transformed CSV")]
pub struct CliConfig {
    /// Directory holding the *.csv, *.json and *.xml source files
    #[arg(long, env = "ETL_SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Record schema shared by every source file
    #[arg(long, value_enum, env = "ETL_SCHEMA")]
    pub schema: SchemaFamily,

    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_path: PathBuf,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_path: PathBuf,

    /// Abort the run when the audit log cannot be written
    #[arg(long)]
    pub strict_audit: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON log lines instead of the compact format")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn schema(&self) -> SchemaFamily {
        self.schema
    }

    fn strict_audit(&self) -> bool {
        self.strict_audit
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("source_dir", &self.source_dir)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_path("log_path", &self.log_path)?;
        validation::validate_distinct_paths("log_path", &self.log_path, &self.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let config = CliConfig::try_parse_from([
            "file-etl",
            "--source-dir",
            "dealership_data",
            "--schema",
            "vehicle",
            "--strict-audit",
        ])
        .unwrap();

        assert_eq!(config.source_dir, PathBuf::from("dealership_data"));
        assert_eq!(config.schema(), SchemaFamily::Vehicle);
        assert_eq!(config.output_path(), Path::new(DEFAULT_OUTPUT_FILE));
        assert_eq!(config.log_path(), Path::new(DEFAULT_LOG_FILE));
        assert!(config.strict_audit());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_schema_is_rejected() {
        let result = CliConfig::try_parse_from([
            "file-etl",
            "--source-dir",
            "data",
            "--schema",
            "animal",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_and_output_must_differ() {
        let config = CliConfig::try_parse_from([
            "file-etl",
            "--source-dir",
            "data",
            "--schema",
            "person",
            "--output-path",
            "same.csv",
            "--log-path",
            "same.csv",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }
}
