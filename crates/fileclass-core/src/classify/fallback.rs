use std::path::Path;

use super::descriptor::FileDescriptor;
use super::ClassificationResult;

/// Confidence of an extension-only classification; below the learning
/// threshold, so defaults are never cached
pub const DEFAULT_CONFIDENCE: f64 = 0.3;

/// Classify by extension alone
pub fn default_classification(path: impl AsRef<Path>) -> ClassificationResult {
    let file = FileDescriptor::new(path);

    let (category, suggested_path) = match file.extension.as_str() {
        ".ts" | ".js" | ".tsx" | ".jsx" => ("code", "lib/"),
        ".md" | ".txt" | ".rst" => ("documentation", "docs/"),
        ".json" | ".yml" | ".yaml" | ".toml" => ("configuration", "config/"),
        _ => ("misc", "misc/"),
    };

    ClassificationResult {
        category: category.to_string(),
        subcategory: None,
        confidence: DEFAULT_CONFIDENCE,
        suggested_path: suggested_path.to_string(),
        reasoning: vec!["default classification: extension based".to_string()],
    }
}
