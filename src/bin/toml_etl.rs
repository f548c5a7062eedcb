use clap::Parser;
use jobmarket_etl::config::toml_config::TomlConfig;
use jobmarket_etl::core::ConfigProvider;
use jobmarket_etl::utils::{logger, validation::Validate};
use jobmarket_etl::{EtlEngine, LocalStorage, SkillExtractor, SkillPipeline, Vocabulary};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Skill extraction run driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "jobmarket.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the output directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || matches!(config.log_level(), Some("debug" | "trace"));
    logger::init_cli_logger(verbose);

    tracing::info!("🚀 Starting TOML-based skill extraction");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(output_path) = args.output_path.clone() {
        tracing::info!("🔧 Output path overridden to: {}", output_path);
        config.load.output_path = output_path;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let vocabulary = match Vocabulary::try_builtin().and_then(|vocabulary| {
        SkillExtractor::try_builtin().map(|_| vocabulary)
    }) {
        Ok(vocabulary) => vocabulary,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config, vocabulary);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = SkillPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Skill extraction completed");
            println!("✅ Processed postings saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_file());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Workers: {}", config.workers());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, vocabulary: &Vocabulary) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🧠 Skill Vocabulary:");
    for category in vocabulary.categories() {
        println!(
            "  {} ({}): {}",
            category.name,
            category.terms.len(),
            category.terms.join(", ")
        );
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compress_output() {
        println!("  Compression: jobs_with_skills.zip");
    }
    println!("  Top skills recorded: {}", config.top_skills_limit());

    println!();
    println!("🎯 Matching Defaults:");
    println!("  Top postings: {}", config.top_n());
    println!("  Role filter: {}", config.role_filter().label());

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
