//! Rule validation
//!
//! Errors make a rule set unsavable; warnings are reported but accepted.

use std::collections::HashSet;

use glob::Pattern;
use regex::Regex;
use serde::Serialize;

use super::ClassificationRule;

const LOW_CONFIDENCE_WARNING: f64 = 0.1;
const OVERLAP_CONFIDENCE: f64 = 0.8;

/// Outcome of validating one rule or a rule set
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a single rule
pub fn validate_rule(rule: &ClassificationRule) -> ValidationReport {
    let mut report = ValidationReport::default();

    if rule.name.trim().is_empty() {
        report.errors.push("name is required".to_string());
    }
    if rule.pattern.trim().is_empty() {
        report.errors.push("pattern is required".to_string());
    } else if let Err(e) = Pattern::new(&rule.pattern) {
        report
            .errors
            .push(format!("invalid pattern '{}': {}", rule.pattern, e));
    }
    if rule.target_path.trim().is_empty() {
        report.errors.push("target path is required".to_string());
    }
    if !(0.0..=1.0).contains(&rule.confidence) {
        report
            .errors
            .push("confidence must be a number between 0 and 1".to_string());
    } else if rule.confidence < LOW_CONFIDENCE_WARNING {
        report
            .warnings
            .push(format!("confidence is very low (< {})", LOW_CONFIDENCE_WARNING));
    }

    for pattern in &rule.content_patterns {
        if Regex::new(pattern).is_err() {
            report.warnings.push(format!(
                "content pattern '{}' is not a valid regex and will be matched as text",
                pattern
            ));
        }
    }

    for sub in &rule.sub_rules {
        if sub.content_pattern.is_empty() || sub.target_path.is_empty() {
            report
                .errors
                .push("sub-rules need both a content pattern and a target path".to_string());
        }
    }

    report
}

/// Validate a rule set: every rule, duplicate names, and conflicts
pub fn validate_rules(rules: &[ClassificationRule]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (i, rule) in rules.iter().enumerate() {
        let label = format!("rule {} ({})", i + 1, rule.name);
        let single = validate_rule(rule);
        if !single.is_valid() {
            report
                .errors
                .push(format!("{}: {}", label, single.errors.join(", ")));
        }
        report
            .warnings
            .extend(single.warnings.iter().map(|w| format!("{}: {}", label, w)));
    }

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for rule in rules {
        if !seen.insert(rule.name.as_str()) && !duplicates.contains(&rule.name.as_str()) {
            duplicates.push(rule.name.as_str());
        }
    }
    if !duplicates.is_empty() {
        report
            .errors
            .push(format!("duplicate rule names: {}", duplicates.join(", ")));
    }

    report.warnings.extend(detect_conflicts(rules));
    report
}

fn detect_conflicts(rules: &[ClassificationRule]) -> Vec<String> {
    let mut conflicts = Vec::new();

    for (i, a) in rules.iter().enumerate() {
        for b in &rules[i + 1..] {
            if a.pattern == b.pattern && a.target_path != b.target_path {
                conflicts.push(format!(
                    "pattern conflict: \"{}\" maps to different paths in \"{}\" and \"{}\"",
                    a.pattern, a.name, b.name
                ));
            }
            if a.confidence > OVERLAP_CONFIDENCE
                && b.confidence > OVERLAP_CONFIDENCE
                && patterns_overlap(&a.pattern, &b.pattern)
            {
                conflicts.push(format!(
                    "high-confidence patterns overlap: \"{}\" and \"{}\"",
                    a.name, b.name
                ));
            }
        }
    }

    conflicts
}

/// Crude overlap test: equal, or one pattern contains the other
fn patterns_overlap(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
