use crate::core::modular::DEFAULT_KEYWORD;
use crate::core::ConfigProvider;
use crate::domain::notebook::with_notebook_extension;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct_paths, validate_file_extension, validate_non_empty_string, validate_path,
    Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "notebook-builder")]
#[command(about = "Expand the modular section of a Jupyter notebook once per title")]
pub struct CliConfig {
    /// Template notebook containing the modular section
    #[arg(long)]
    pub source: String,

    /// Where the expanded notebook is written
    #[arg(long)]
    pub output: String,

    /// Titles substituted into each repetition, in order
    #[arg(long, value_delimiter = ',')]
    pub titles: Vec<String>,

    /// Placeholder replaced by each title
    #[arg(long, default_value = DEFAULT_KEYWORD)]
    pub keyword: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Show the expansion plan without writing anything")]
    pub dry_run: bool,
}

impl ConfigProvider for CliConfig {
    fn source_path(&self) -> &str {
        &self.source
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn titles(&self) -> &[String] {
        &self.titles
    }

    fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("source", &self.source)?;
        validate_file_extension("source", &self.source, &["ipynb"])?;
        validate_path("output", &self.output)?;
        let output = with_notebook_extension(Path::new(&self.output));
        validate_distinct_paths("output", &self.source, &output.to_string_lossy())?;
        validate_non_empty_string("keyword", &self.keyword)?;
        Ok(())
    }
}
