//! # Rule Module
//!
//! Classification rules map a file name pattern (and optionally content
//! patterns) to a target directory with a prior confidence.
//!
//! ## Module layout
//!
//! - `builtin`: rule sets shipped with the crate
//! - `matcher`: compiled glob / content matchers
//! - `validate`: rule validation and conflict detection
//! - `store`: the runtime rule store backed by a JSON file
//!
//! ## Rule file format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "lastUpdated": "2024-01-01T00:00:00Z",
//!   "rules": [
//!     {
//!       "name": "Documentation",
//!       "pattern": "**/*.md",
//!       "contentPatterns": ["# ", "## "],
//!       "targetPath": "docs/",
//!       "confidence": 0.8,
//!       "rules": [
//!         { "contentPattern": "deploy", "targetPath": "docs/deployment/" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fileclass_core::rule::{default_rules, category_of};
//!
//! let rules = default_rules();
//! assert_eq!(rules.len(), 5);
//! assert_eq!(category_of(&rules[0].target_path), "lib");
//! ```

mod builtin;
mod matcher;
mod store;
mod validate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use builtin::{
    default_rules, starter_rules, BuiltinRule, BuiltinSubRule, DEFAULT_RULES, STARTER_RULES,
};
pub use matcher::{CompiledRule, CompiledSubRule, ContentMatcher};
pub use store::{ConfidenceDistribution, RuleStatistics, RuleStore, RULES_FORMAT_VERSION};
pub use validate::{validate_rule, validate_rules, ValidationReport};

/// Category used when a target path has no usable segment
pub const FALLBACK_CATEGORY: &str = "misc";

/// A named pattern-to-category mapping with a prior confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRule {
    #[serde(default)]
    pub name: String,
    /// Glob matched against the file name (`*`, `?`, `**/`)
    #[serde(default)]
    pub pattern: String,
    /// Regexes matched against file content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_patterns: Vec<String>,
    /// Destination directory; `${filename}` and `${ext}` are substituted
    #[serde(default)]
    pub target_path: String,
    /// Prior in 0.0-1.0
    pub confidence: f64,
    /// Nested rules refining the destination by content
    #[serde(default, rename = "rules", skip_serializing_if = "Vec::is_empty")]
    pub sub_rules: Vec<SubRule>,
}

/// Content-only refinement of a parent rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRule {
    #[serde(default)]
    pub content_pattern: String,
    #[serde(default)]
    pub target_path: String,
}

impl ClassificationRule {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        target_path: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            content_patterns: Vec::new(),
            target_path: target_path.into(),
            confidence,
            sub_rules: Vec::new(),
        }
    }

    pub fn with_content_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sub_rule(
        mut self,
        content_pattern: impl Into<String>,
        target_path: impl Into<String>,
    ) -> Self {
        self.sub_rules.push(SubRule {
            content_pattern: content_pattern.into(),
            target_path: target_path.into(),
        });
        self
    }

    /// Category this rule classifies into
    pub fn category(&self) -> &str {
        category_of(&self.target_path)
    }
}

/// On-disk rule file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

/// First non-empty `/` segment of a target path, or `misc`
pub fn category_of(target_path: &str) -> &str {
    target_path
        .split('/')
        .find(|s| !s.is_empty())
        .unwrap_or(FALLBACK_CATEGORY)
}

/// Second non-empty `/` segment of a target path
pub fn subcategory_of(target_path: &str) -> Option<&str> {
    target_path.split('/').filter(|s| !s.is_empty()).nth(1)
}
