pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use self::config::CliConfig;
pub use self::config::TomlConfig;

pub use self::adapters::storage::LocalStorage;
pub use self::core::builder::ModularBuilder;
pub use self::core::modular::{
    build_modular_notebook, locate_modular_section, ExpansionPlan, ModularSection,
    ModularTemplate, DEFAULT_KEYWORD, END_MARKER, START_MARKER,
};
pub use self::domain::model::{Cell, CellType};
pub use self::domain::notebook::Notebook;
pub use self::domain::ports::{ConfigProvider, Storage};
pub use self::utils::error::{NotebookError, Result};
