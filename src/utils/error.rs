use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Unsupported notebook format: {} (expected a .ipynb file)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid notebook document: {message}")]
    FormatError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// `cell_index` is set when the cell was read from a notebook's `cells` array.
    #[error("{} is missing required field '{field}'", cell_label(.cell_index))]
    MissingField {
        field: String,
        cell_index: Option<usize>,
    },

    #[error("Marker '{marker}' not found")]
    MarkerNotFound { marker: String },

    #[error("Marker '{marker}' appears more than once (cells {indices:?})")]
    AmbiguousSection { marker: String, indices: Vec<usize> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Format,
    Template,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NotebookError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::FormatError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotFound { .. } | Self::IoError(_) => ErrorCategory::Io,
            Self::UnsupportedFormat { .. }
            | Self::FormatError { .. }
            | Self::SerializationError(_)
            | Self::MissingField { .. } => ErrorCategory::Format,
            Self::MarkerNotFound { .. } | Self::AmbiguousSection { .. } => {
                ErrorCategory::Template
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Format | ErrorCategory::Template => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("Check that '{}' exists and is a regular file", path.display())
            }
            Self::UnsupportedFormat { .. } => {
                "Only Jupyter notebooks with the .ipynb extension can be loaded".to_string()
            }
            Self::FormatError { .. } | Self::SerializationError(_) => {
                "Open the notebook in Jupyter and re-save it to repair its JSON".to_string()
            }
            Self::MissingField { field, .. } => {
                format!("Add the '{}' field to the cell or re-save the notebook", field)
            }
            Self::MarkerNotFound { marker } => format!(
                "Add a markdown cell whose first line contains '{}'",
                marker
            ),
            Self::AmbiguousSection { marker, .. } => format!(
                "Keep exactly one markdown cell starting with '{}'",
                marker
            ),
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file syntax".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
            Self::MissingConfigError { field } => format!("Provide a value for '{}'", field),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not access a notebook file: {}", self),
            ErrorCategory::Format => format!("The notebook could not be read: {}", self),
            ErrorCategory::Template => format!("The modular section is malformed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

fn cell_label(cell_index: &Option<usize>) -> String {
    match cell_index {
        Some(index) => format!("Cell {}", index),
        None => "Cell".to_string(),
    }
}

impl From<tempfile::PersistError> for NotebookError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::IoError(err.error)
    }
}

pub type Result<T> = std::result::Result<T, NotebookError>;
