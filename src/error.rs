use std::path::PathBuf;
use thiserror::Error;

/// Depscribe error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Extraction error in {path}: {message}")]
    Extract { path: String, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for depscribe operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an extraction error
    pub fn extract(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Extract {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        Error::Analysis(msg.into())
    }

    /// Create an export error
    pub fn export(msg: impl Into<String>) -> Self {
        Error::Export(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
