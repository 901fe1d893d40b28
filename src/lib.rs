pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::LocalStorage;
pub use crate::core::{audit::AuditLog, etl::EtlEngine, pipeline::FilePipeline};
pub use domain::model::{Dataset, Record, SchemaFamily, Value};
pub use utils::error::{EtlError, Result};
