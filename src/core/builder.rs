use crate::core::modular::{build_modular_notebook, ExpansionPlan, ModularTemplate};
use crate::core::{ConfigProvider, Storage};
use crate::domain::notebook::Notebook;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Load → expand → save job driven by a `ConfigProvider`.
pub struct ModularBuilder<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ModularBuilder<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn load_template(&self) -> Result<Notebook> {
        let source = Path::new(self.config.source_path());
        tracing::info!("Loading template notebook from {}", source.display());
        let notebook = Notebook::load_with(&self.storage, source)?;
        tracing::info!("Loaded {} cells", notebook.len());
        Ok(notebook)
    }

    /// Builds the expanded notebook without writing it.
    pub fn build(&self) -> Result<Notebook> {
        let template = self.load_template()?;
        let titles = self.config.titles();
        tracing::info!(
            "Expanding modular section for {} title(s) with keyword '{}'",
            titles.len(),
            self.config.keyword()
        );
        build_modular_notebook(&template, self.config.output_path(), titles, self.config.keyword())
    }

    /// Builds and saves the notebook, returning where it was written. Nothing
    /// is written when loading or expansion fails.
    pub fn run(&self) -> Result<PathBuf> {
        let notebook = self.build()?;
        tracing::info!("Writing {}", notebook);
        let output_path = notebook.save_with(&self.storage, None)?;
        tracing::info!("Saved expanded notebook to {}", output_path.display());
        Ok(output_path)
    }

    pub fn plan(&self) -> Result<ExpansionPlan> {
        let template = ModularTemplate::with_keyword(self.load_template()?, self.config.keyword());
        template.plan(self.config.titles())
    }
}
