//! # Classify Module
//!
//! Decides a category and a suggested directory for a single file.
//!
//! Three independent signals produce candidate results:
//!
//! - **extension**: rule globs against the file name
//! - **content**: rule content patterns (and sub-rules) against the text
//! - **path**: well-known directory names in the file's path
//!
//! The combiner merges them into one result, boosting confidence when
//! several candidates agree on the winning category. If no signal fires, a
//! fixed extension table answers with low confidence.
//!
//! ## Module layout
//!
//! - `descriptor`: per-call file facts
//! - `signal`: the three signal extractors
//! - `combine`: candidate merging
//! - `fallback`: extension-only default classifier
//! - `learning`: memoised high-confidence results
//! - `engine`: the pipeline tying everything together
//!
//! ## Example
//!
//! ```rust,no_run
//! use fileclass_core::{ClassificationEngine, ClassifierConfig};
//!
//! let mut engine = ClassificationEngine::new(ClassifierConfig::with_rules_file("rules.json"));
//! engine.initialize()?;
//!
//! let result = engine.classify_file("src/foo.ts", None);
//! println!("{} -> {} ({:.2})", result.category, result.suggested_path, result.confidence);
//! # Ok::<(), fileclass_core::FileclassError>(())
//! ```

mod combine;
mod descriptor;
mod engine;
mod fallback;
mod learning;
mod signal;

use serde::{Deserialize, Serialize};

pub use combine::{combine, AGREEMENT_BOOST, MAX_REASONS};
pub use descriptor::FileDescriptor;
pub use engine::{
    ClassificationEngine, EngineStatistics, CACHE_HIT_THRESHOLD, LEARNING_THRESHOLD,
};
pub use fallback::{default_classification, DEFAULT_CONFIDENCE};
pub use learning::LearningCache;
pub use signal::{
    content_signals, extension_signals, path_signals, CONTENT_MATCH_BONUS, SUB_RULE_FACTOR,
};

/// Outcome of classifying one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// 0.0-1.0
    pub confidence: f64,
    pub suggested_path: String,
    /// Human-readable explanation, at most five entries
    #[serde(default)]
    pub reasoning: Vec<String>,
}
