use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileclassError {
    #[error("Rule not found: {name}")]
    RuleNotFound { name: String },

    #[error("Rule already exists: {name}")]
    RuleAlreadyExists { name: String },

    #[error("Invalid rules: {}", .errors.join("; "))]
    InvalidRules { errors: Vec<String> },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, FileclassError>;

impl FileclassError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RuleNotFound { .. } => 2,
            Self::PathNotFound { .. } => 3,
            Self::InvalidRules { .. } => 4,
            Self::RuleAlreadyExists { .. } => 5,
            Self::ConfigKeyNotFound { .. } | Self::InvalidConfigValue { .. } => 6,
            _ => 1,
        }
    }
}
