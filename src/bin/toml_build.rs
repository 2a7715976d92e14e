use anyhow::Context;
use clap::Parser;
use notebook_builder::utils::error::ErrorSeverity;
use notebook_builder::utils::{logger, validation::Validate};
use notebook_builder::{ConfigProvider, LocalStorage, ModularBuilder, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-build")]
#[command(about = "Build modular notebooks from a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "notebook-build.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output path from config
    #[arg(long)]
    output: Option<String>,

    /// Override the titles from config (comma separated)
    #[arg(long, value_delimiter = ',')]
    titles: Option<Vec<String>>,

    /// Dry run - show the expansion plan without writing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
    tracing::info!("🚀 Starting TOML-based notebook build");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(output) = args.output {
        tracing::info!("🔧 Output overridden to: {}", output);
        config.build.output = Some(output);
    }
    if let Some(titles) = args.titles {
        tracing::info!("🔧 Titles overridden to: {}", titles.join(", "));
        config.build.titles = titles;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "Source: {}, output: {}, {} title(s), keyword '{}'",
        config.source_path(),
        config.output_path(),
        config.titles().len(),
        config.keyword()
    );

    let builder = ModularBuilder::new(LocalStorage::default(), config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        let plan = builder.plan().context("failed to plan expansion")?;
        println!(
            "{} prefix + {} x {} template + {} suffix = {} cells",
            plan.prefix_cells,
            plan.titles.len(),
            plan.template_cells,
            plan.suffix_cells,
            plan.output_cells()
        );
        return Ok(());
    }

    match builder.run() {
        Ok(output_path) => {
            tracing::info!("✅ Notebook built successfully");
            println!("📁 Output saved to: {}", output_path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}
