use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "fileclass")]
#[command(about = "Classify files by rules and suggest where they belong")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.fileclass)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Rule file (overrides classifier.rules_file)
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify individual files
    Classify {
        /// Files to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Skip content analysis
        #[arg(long)]
        no_content: bool,
    },

    /// Classify every file in a directory
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Only scan the top level
        #[arg(long)]
        no_recursive: bool,

        /// Move confidently classified files under --target
        #[arg(long, requires = "target")]
        apply: bool,

        /// Root directory for suggested paths
        #[arg(long)]
        target: Option<PathBuf>,

        /// Dry run (report moves without performing them)
        #[arg(short, long)]
        dry_run: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage classification rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List active rules
    List,

    /// Show a rule as JSON
    Show {
        /// Rule name
        name: String,
    },

    /// Search rules by name, pattern or target path
    Find {
        /// Search text (case-insensitive)
        query: String,
    },

    /// Validate a rule file (default: the configured one)
    Validate {
        /// Rule file to check
        file: Option<PathBuf>,
    },

    /// Write the starter rule catalog to the rule file
    Init {
        /// Overwrite an existing rule file
        #[arg(short, long)]
        force: bool,
    },

    /// Add a rule
    Add {
        /// Rule name
        #[arg(long)]
        name: String,

        /// File name glob (e.g. "**/*.md")
        #[arg(long)]
        pattern: String,

        /// Target directory (e.g. "docs/")
        #[arg(long)]
        target: String,

        /// Prior confidence 0.0-1.0
        #[arg(long, default_value = "0.7")]
        confidence: f64,

        /// Content regex (repeatable)
        #[arg(long = "content", value_name = "REGEX")]
        content_patterns: Vec<String>,
    },

    /// Remove a rule
    Remove {
        /// Rule name
        name: String,
    },

    /// Show rule statistics
    Stats,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., classifier.enable_learning)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Value to set
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
