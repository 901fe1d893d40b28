use clap::Parser;
use file_etl::core::ConfigProvider;
use file_etl::utils::{logger, validation::Validate};
use file_etl::{AuditLog, CliConfig, EtlEngine, FilePipeline, LocalStorage};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose, None);
    } else {
        logger::init_cli_logger(config.verbose, None);
    }

    tracing::info!("Starting file-etl ({} schema)", config.schema);
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let storage = LocalStorage::new();
    let audit = AuditLog::new(&storage, config.log_path(), config.strict_audit());
    let engine = EtlEngine::new(FilePipeline::new(storage, config), audit);

    match engine.run() {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path.display());
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }
}
