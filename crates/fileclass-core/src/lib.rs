pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod fs;
pub mod rule;

pub use batch::{
    apply_classification, collect_files, ApplyOptions, ClassificationManager,
    ClassificationOutcome, ClassificationReport, ManagerStats, AUTO_APPLY_THRESHOLD,
};
pub use classify::{
    combine, default_classification, ClassificationEngine, ClassificationResult,
    EngineStatistics, FileDescriptor, LearningCache,
};
pub use config::{resolve_base_dir, ClassifierConfig, Config};
pub use error::{FileclassError, Result};
pub use fs::{FileSource, LocalFileSource};
pub use rule::{
    default_rules, starter_rules, validate_rule, validate_rules, ClassificationRule, RuleStatistics,
    RuleStore, RulesDocument, SubRule, ValidationReport,
};
