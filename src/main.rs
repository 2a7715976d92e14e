use clap::Parser;
use notebook_builder::utils::error::{ErrorSeverity, NotebookError};
use notebook_builder::utils::{logger, validation::Validate};
use notebook_builder::{CliConfig, ExpansionPlan, LocalStorage, ModularBuilder};

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting notebook-builder");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let dry_run = config.dry_run;
    let builder = ModularBuilder::new(LocalStorage::default(), config);

    let outcome = if dry_run {
        builder.plan().map(|plan| print_plan(&plan))
    } else {
        builder.run().map(|output_path| {
            tracing::info!("✅ Notebook built successfully");
            println!("✅ Notebook built successfully!");
            println!("📁 Output saved to: {}", output_path.display());
        })
    };

    if let Err(e) = outcome {
        report_failure(&e);
        std::process::exit(exit_code(e.severity()));
    }
}

fn print_plan(plan: &ExpansionPlan) {
    tracing::info!("🔍 DRY RUN MODE - nothing will be written");
    println!("Prefix cells:   {}", plan.prefix_cells);
    println!("Template cells: {}", plan.template_cells);
    println!("Suffix cells:   {}", plan.suffix_cells);
    println!("Titles ({}):    {}", plan.titles.len(), plan.titles.join(", "));
    println!("Output cells:   {}", plan.output_cells());
}

fn report_failure(e: &NotebookError) {
    tracing::error!(
        "❌ Build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
