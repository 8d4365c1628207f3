use anyhow::Context;
use clap::Parser;
use local_keywords::core::ConfigProvider;
use local_keywords::utils::{logger, validation::Validate};
use local_keywords::{EtlEngine, KeywordPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-keywords")]
#[command(about = "Local keyword generator driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "keywords.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the seed keyword from config
    #[arg(long)]
    seed: Option<String>,

    /// Show what would be requested without calling any volume service
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(seed) = args.seed {
        tracing::info!("🔧 Seed overridden to: {}", seed);
        config.keywords.seed = Some(seed);
    }

    config
        .validate()
        .inspect_err(|e| tracing::error!("💡 Suggestion: {}", e.recovery_suggestion()))
        .context("Configuration validation failed")?;

    display_config_summary(&config);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = KeywordPipeline::new(storage, config);

    if args.dry_run {
        perform_dry_run(&pipeline).await?;
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    let output_path = engine.run().await.context("Keyword extraction failed")?;

    println!("✅ Keyword extraction completed!");
    println!("📁 Output saved to: {}", output_path);
    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    println!("📋 Configuration Summary:");
    println!("  Seed: {}", config.seed().unwrap_or("-"));
    println!("  Cities: {} ({})", config.city_country().unwrap_or("-"), config.cities_location());
    println!("  Source: {} (market {})", config.source(), config.market().unwrap_or("-"));
    println!("  Batch size: {}", config.batch_size());
    println!("  Output: {}/{}", config.output_path(), config.output_file());
}

async fn perform_dry_run(pipeline: &KeywordPipeline<LocalStorage, TomlConfig>) -> anyhow::Result<()> {
    use local_keywords::core::batch::make_batches;
    use local_keywords::core::Pipeline;

    tracing::info!("🔍 DRY RUN MODE - No volume service will be called");

    let keywords = pipeline.extract().await?;
    let batches = make_batches(&keywords, pipeline.config().batch_size())?;

    println!("  Keywords: {}", keywords.len());
    println!("  Batches: {}", batches.len());
    for keyword in keywords.iter().take(10) {
        println!("    {}", keyword);
    }
    if keywords.len() > 10 {
        println!("    ... and {} more", keywords.len() - 10);
    }
    Ok(())
}
