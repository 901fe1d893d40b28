#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_FILE: &str = "transformed_data.csv";
pub const DEFAULT_LOG_FILE: &str = "etl_logfile.txt";
