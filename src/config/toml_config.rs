use crate::core::modular::DEFAULT_KEYWORD;
use crate::core::ConfigProvider;
use crate::domain::notebook::with_notebook_extension;
use crate::utils::error::{NotebookError, Result};
use crate::utils::validation::{
    validate_distinct_paths, validate_file_extension, validate_non_empty_string, validate_path,
    validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Build job read from a TOML file:
///
/// ```toml
/// [build]
/// source = "templates/report.ipynb"
/// output = "build/report.ipynb"
/// titles = ["north", "south"]
/// keyword = "modular-word"
///
/// [logging]
/// verbose = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub build: BuildConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub source: String,
    pub output: Option<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NotebookError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NotebookError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TITLE_PREFIX})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NotebookError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("build.source", &self.build.source)?;
        validate_file_extension("build.source", &self.build.source, &["ipynb"])?;

        let output = validate_required_field("build.output", &self.build.output)?;
        validate_path("build.output", output)?;
        let output = with_notebook_extension(Path::new(output));
        validate_distinct_paths("build.output", &self.build.source, &output.to_string_lossy())?;

        if let Some(keyword) = &self.build.keyword {
            validate_non_empty_string("build.keyword", keyword)?;
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_path(&self) -> &str {
        &self.build.source
    }

    fn output_path(&self) -> &str {
        self.build.output.as_deref().unwrap_or_default()
    }

    fn titles(&self) -> &[String] {
        &self.build.titles
    }

    fn keyword(&self) -> &str {
        self.build.keyword.as_deref().unwrap_or(DEFAULT_KEYWORD)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
