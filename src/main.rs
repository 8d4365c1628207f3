use clap::Parser;
use local_keywords::utils::error::{ErrorSeverity, KeywordError};
use local_keywords::utils::{logger, validation::Validate};
use local_keywords::{CliConfig, EtlEngine, KeywordPipeline, LocalStorage};

fn exit_code(e: &KeywordError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &KeywordError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e).max(1));
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting local-keywords");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    let list_countries = config.list_countries;

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = KeywordPipeline::new(storage, config);

    if list_countries {
        match pipeline.available_countries().await {
            Ok(countries) => {
                for country in countries {
                    println!("{}", country);
                }
                return;
            }
            Err(e) => fail(&e),
        }
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Keyword extraction completed!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }
}
