use anyhow::Context;
use clap::Parser;
use file_etl::config::toml_config::TomlConfig;
use file_etl::core::extract::Extractor;
use file_etl::core::ConfigProvider;
use file_etl::utils::{logger, validation::Validate};
use file_etl::{AuditLog, EtlEngine, FilePipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "File ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "etl-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,

    /// Dry run - show which files would be processed without reading them
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose, config.log_level());
    } else {
        logger::init_cli_logger(args.verbose, config.log_level());
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        if let Err(e) = perform_dry_run(&config) {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let storage = LocalStorage::new();
    let audit = AuditLog::new(&storage, config.log_path(), config.strict_audit());
    let engine = EtlEngine::new(FilePipeline::new(storage, config), audit);

    match engine.run() {
        Ok(output_path) => {
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

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("   Source: {} ({} schema)", config.source_dir().display(), config.schema());
    tracing::info!("   Output: {}", config.output_path().display());
    tracing::info!(
        "   Audit log: {}{}",
        config.log_path().display(),
        if config.strict_audit() { " (strict)" } else { "" }
    );
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::new();
    let discovered = Extractor::new(&storage, config.schema())
        .discover(config.source_dir())
        .with_context(|| format!("Failed to scan {}", config.source_dir().display()))?;

    let mut total = 0;
    for (format, files) in &discovered {
        println!("{} ({} file(s))", format, files.len());
        for path in files {
            println!("  {}", path.display());
        }
        total += files.len();
    }
    println!(
        "{} file(s) would be merged into {}",
        total,
        config.output_path().display()
    );

    Ok(())
}
