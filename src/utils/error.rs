use std::path::PathBuf;
use thiserror::Error;

use crate::adapters::SourceFormat;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Malformed {format} file {path}: {message}")]
    MalformedFile {
        path: PathBuf,
        format: SourceFormat,
        message: String,
    },

    #[error("Source directory not found: {path}")]
    SourceDirectoryNotFound { path: PathBuf },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Audit log {path} could not be written: {source}")]
    AuditLogError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record does not match the {schema} schema: {message}")]
    SchemaMismatch { schema: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Io,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MalformedFile { .. } | EtlError::SourceDirectoryNotFound { .. } => {
                ErrorCategory::Source
            }
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::AuditLogError { .. } => {
                ErrorCategory::Io
            }
            EtlError::SchemaMismatch { .. } => ErrorCategory::Data,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Source | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MalformedFile { path, .. } => format!(
                "Fix or remove {} and run the job again; no output was written",
                path.display()
            ),
            EtlError::SourceDirectoryNotFound { .. } => {
                "Check the --source-dir argument (or source.directory in the config file)".to_string()
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output location exists, is writable and has free space".to_string()
            }
            EtlError::AuditLogError { .. } => {
                "Check the log file permissions, or disable strict audit logging".to_string()
            }
            EtlError::SchemaMismatch { .. } => {
                "Make sure every source file belongs to the selected schema".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration values and try again".to_string()
            }
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Source => format!("Source data could not be read: {}", self),
            ErrorCategory::Io => format!("File system error: {}", self),
            ErrorCategory::Data => format!("Data error: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }

    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        format: SourceFormat,
        message: impl std::fmt::Display,
    ) -> Self {
        EtlError::MalformedFile {
            path: path.into(),
            format,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_file_is_high_severity_source_error() {
        let err = EtlError::malformed("data/bad.xml", SourceFormat::Xml, "unexpected end");
        assert_eq!(err.category(), ErrorCategory::Source);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "Malformed xml file data/bad.xml: unexpected end"
        );
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = EtlError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("File system error"));
    }

    #[test]
    fn test_config_errors_are_medium() {
        let err = EtlError::InvalidConfigValueError {
            field: "source.schema".to_string(),
            value: "animal".to_string(),
            reason: "unknown schema".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
    }
}
