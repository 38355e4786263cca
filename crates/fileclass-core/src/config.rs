use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FileclassError, Result};

const CONFIG_FILE: &str = "config.toml";
const BASE_DIR_NAME: &str = ".fileclass";
const BASE_DIR_ENV: &str = "FILECLASS_BASE";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# fileclass configuration file
# Location: ~/.fileclass/config.toml

[classifier]
# Rule file (JSON). Relative paths resolve against this directory.
rules_file = "rules.json"

# Results below this confidence are reported for manual review
default_confidence_threshold = 0.7

# Files larger than this (bytes) skip content analysis
max_content_analysis_size = 1048576

# Match rule content patterns against file contents
enable_content_analysis = true

# Remember high-confidence results per path
enable_learning = true
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Classification engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Rule file location
    #[serde(default = "default_rules_file")]
    pub rules_file: PathBuf,

    /// Confidence under which a result needs manual review
    #[serde(default = "default_threshold")]
    pub default_confidence_threshold: f64,

    /// Upper bound in bytes for content analysis
    #[serde(default = "default_max_content_size")]
    pub max_content_analysis_size: u64,

    #[serde(default = "default_true")]
    pub enable_content_analysis: bool,

    #[serde(default = "default_true")]
    pub enable_learning: bool,
}

fn default_rules_file() -> PathBuf {
    PathBuf::from("rules.json")
}

fn default_threshold() -> f64 {
    0.7
}

fn default_max_content_size() -> u64 {
    1024 * 1024
}

fn default_true() -> bool {
    true
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rules_file: default_rules_file(),
            default_confidence_threshold: default_threshold(),
            max_content_analysis_size: default_max_content_size(),
            enable_content_analysis: true,
            enable_learning: true,
        }
    }
}

impl ClassifierConfig {
    /// Config whose rule file lives at `rules_file`, everything else default
    pub fn with_rules_file(rules_file: impl Into<PathBuf>) -> Self {
        Self {
            rules_file: rules_file.into(),
            ..Self::default()
        }
    }

    /// Resolve a relative `rules_file` against `base_dir`
    pub fn resolved(mut self, base_dir: &Path) -> Self {
        if self.rules_file.is_relative() {
            self.rules_file = base_dir.join(&self.rules_file);
        }
        self
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| FileclassError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Classifier settings with the rule file resolved against `base_dir`
    pub fn classifier_for(&self, base_dir: &Path) -> ClassifierConfig {
        self.classifier.clone().resolved(base_dir)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        self.list()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let c = &mut self.classifier;
        match key {
            "classifier.rules_file" => c.rules_file = PathBuf::from(value.trim()),
            "classifier.default_confidence_threshold" => {
                let v = parse_value::<f64>(key, value)?;
                if !(0.0..=1.0).contains(&v) {
                    return Err(invalid(key, value));
                }
                c.default_confidence_threshold = v;
            }
            "classifier.max_content_analysis_size" => {
                c.max_content_analysis_size = parse_value(key, value)?
            }
            "classifier.enable_content_analysis" => {
                c.enable_content_analysis = parse_value(key, value)?
            }
            "classifier.enable_learning" => c.enable_learning = parse_value(key, value)?,
            _ => {
                return Err(FileclassError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        let c = &self.classifier;
        vec![
            (
                "classifier.rules_file".to_string(),
                c.rules_file.display().to_string(),
            ),
            (
                "classifier.default_confidence_threshold".to_string(),
                c.default_confidence_threshold.to_string(),
            ),
            (
                "classifier.max_content_analysis_size".to_string(),
                c.max_content_analysis_size.to_string(),
            ),
            (
                "classifier.enable_content_analysis".to_string(),
                c.enable_content_analysis.to_string(),
            ),
            (
                "classifier.enable_learning".to_string(),
                c.enable_learning.to_string(),
            ),
        ]
    }
}

/// Resolve the base directory: explicit > `FILECLASS_BASE` > `~/.fileclass`
pub fn resolve_base_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(base) = explicit {
        return Ok(base);
    }

    if let Ok(base) = std::env::var(BASE_DIR_ENV) {
        return Ok(PathBuf::from(base));
    }

    dirs::home_dir()
        .map(|h| h.join(BASE_DIR_NAME))
        .ok_or(FileclassError::HomeNotFound)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> FileclassError {
    FileclassError::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
