use crate::config::{DEFAULT_LOG_FILE, DEFAULT_OUTPUT_FILE};
use crate::core::ConfigProvider;
use crate::domain::model::SchemaFamily;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub directory: PathBuf,
    pub schema: SchemaFamily,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: PathBuf,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub log_path: PathBuf,
    #[serde(default)]
    pub strict: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.directory", &self.source.directory)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_path("audit.log_path", &self.audit.log_path)?;
        validation::validate_distinct_paths(
            "audit.log_path",
            &self.audit.log_path,
            &self.load.output_path,
        )?;

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    /// 取得日誌等級設定
    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_dir(&self) -> &Path {
        &self.source.directory
    }

    fn output_path(&self) -> &Path {
        &self.load.output_path
    }

    fn log_path(&self) -> &Path {
        &self.audit.log_path
    }

    fn schema(&self) -> SchemaFamily {
        self.source.schema
    }

    fn strict_audit(&self) -> bool {
        self.audit.strict
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "dealership"
description = "Used car listings"

[source]
directory = "dealership_data"
schema = "vehicle"

[load]
output_path = "dealership_transformed_data.csv"

[audit]
log_path = "dealership_logfile.txt"
strict = true

[monitoring]
log_level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "dealership");
        assert_eq!(config.source_dir(), Path::new("dealership_data"));
        assert_eq!(config.schema(), SchemaFamily::Vehicle);
        assert_eq!(
            config.output_path(),
            Path::new("dealership_transformed_data.csv")
        );
        assert_eq!(config.log_path(), Path::new("dealership_logfile.txt"));
        assert!(config.strict_audit());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let toml_content = r#"
[pipeline]
name = "people"

[source]
directory = "./people"
schema = "person"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), Path::new(DEFAULT_OUTPUT_FILE));
        assert_eq!(config.log_path(), Path::new(DEFAULT_LOG_FILE));
        assert!(!config.strict_audit());
        assert_eq!(config.log_level(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FILE_ETL_TEST_SOURCE_DIR", "/srv/incoming");

        let toml_content = r#"
[pipeline]
name = "test"

[source]
directory = "${FILE_ETL_TEST_SOURCE_DIR}"
schema = "person"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source_dir(), Path::new("/srv/incoming"));

        std::env::remove_var("FILE_ETL_TEST_SOURCE_DIR");
    }

    #[test]
    fn test_unknown_schema_fails_parsing() {
        let toml_content = r#"
[pipeline]
name = "test"

[source]
directory = "data"
schema = "animal"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "test"

[source]
directory = "data"
schema = "vehicle"

[load]
output_path = "same.csv"

[audit]
log_path = "same.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
directory = "data"
schema = "person"

[monitoring]
log_level = "loud"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert!(config.validate().is_err());
    }
}
