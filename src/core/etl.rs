use crate::core::audit::{AuditEvent, AuditLog};
use crate::core::{Pipeline, Storage};
use crate::utils::error::Result;
use std::path::PathBuf;
use std::time::Instant;

/// Runs extract, transform and load once, writing an audit entry at every
/// phase boundary. The first error aborts the run.
pub struct EtlEngine<'a, P: Pipeline, S: Storage> {
    pipeline: P,
    audit: AuditLog<'a, S>,
}

impl<'a, P: Pipeline, S: Storage> EtlEngine<'a, P, S> {
    pub fn new(pipeline: P, audit: AuditLog<'a, S>) -> Self {
        Self { pipeline, audit }
    }

    pub fn run(&self) -> Result<PathBuf> {
        let started = Instant::now();
        self.audit.event(AuditEvent::JobStarted)?;

        // Extract
        self.audit.event(AuditEvent::ExtractStarted)?;
        let phase = Instant::now();
        let raw_data = self.pipeline.extract()?;
        tracing::info!("Extracted {} records in {:?}", raw_data.len(), phase.elapsed());
        self.audit.event(AuditEvent::ExtractEnded)?;

        // Transform
        self.audit.event(AuditEvent::TransformStarted)?;
        let phase = Instant::now();
        let transformed = self.pipeline.transform(raw_data);
        tracing::info!("Transformed {} records in {:?}", transformed.len(), phase.elapsed());
        self.audit.event(AuditEvent::TransformEnded)?;

        // Load
        self.audit.event(AuditEvent::LoadStarted)?;
        let phase = Instant::now();
        let output_path = self.pipeline.load(&transformed)?;
        tracing::info!("Loaded into {} in {:?}", output_path.display(), phase.elapsed());
        self.audit.event(AuditEvent::LoadEnded)?;

        self.audit.event(AuditEvent::JobEnded)?;
        tracing::info!("ETL job finished in {:?}", started.elapsed());

        Ok(output_path)
    }
}
