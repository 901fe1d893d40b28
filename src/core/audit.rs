use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::path::PathBuf;

/// Hour:minute:second-month-day-year, e.g. `14:03:59-Oct-17-2026`.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S-%b-%d-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent {
    JobStarted,
    ExtractStarted,
    ExtractEnded,
    TransformStarted,
    TransformEnded,
    LoadStarted,
    LoadEnded,
    JobEnded,
}

impl AuditEvent {
    /// Order in which a successful run emits events.
    pub const SEQUENCE: [AuditEvent; 8] = [
        AuditEvent::JobStarted,
        AuditEvent::ExtractStarted,
        AuditEvent::ExtractEnded,
        AuditEvent::TransformStarted,
        AuditEvent::TransformEnded,
        AuditEvent::LoadStarted,
        AuditEvent::LoadEnded,
        AuditEvent::JobEnded,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            AuditEvent::JobStarted => "ETL Job Started",
            AuditEvent::ExtractStarted => "Extract phase Started",
            AuditEvent::ExtractEnded => "Extract phase Ended",
            AuditEvent::TransformStarted => "Transform phase Started",
            AuditEvent::TransformEnded => "Transform phase Ended",
            AuditEvent::LoadStarted => "Load phase Started",
            AuditEvent::LoadEnded => "Load phase Ended",
            AuditEvent::JobEnded => "ETL Job Ended",
        }
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub fn format_entry(timestamp: NaiveDateTime, message: &str) -> String {
    format!("{},{}", timestamp.format(TIMESTAMP_FORMAT), message)
}

/// Append-only phase log.
///
/// In strict mode a failed append is returned as `EtlError::AuditLogError`;
/// otherwise it is reported through `tracing` and the run carries on.
pub struct AuditLog<'a, S: Storage> {
    storage: &'a S,
    path: PathBuf,
    strict: bool,
}

impl<'a, S: Storage> AuditLog<'a, S> {
    pub fn new(storage: &'a S, path: impl Into<PathBuf>, strict: bool) -> Self {
        Self {
            storage,
            path: path.into(),
            strict,
        }
    }

    pub fn log(&self, message: &str) -> Result<()> {
        let line = format_entry(Local::now().naive_local(), message);
        match self.storage.append_line(&self.path, &line) {
            Ok(()) => Ok(()),
            Err(source) if self.strict => Err(EtlError::AuditLogError {
                path: self.path.clone(),
                source,
            }),
            Err(e) => {
                tracing::warn!(
                    "Could not append to audit log {}: {} (message: {})",
                    self.path.display(),
                    e,
                    message
                );
                Ok(())
            }
        }
    }

    pub fn event(&self, event: AuditEvent) -> Result<()> {
        self.log(event.message())
    }
}
