//! Builtin Rule Definitions
//!
//! Rule sets defined in code. `DEFAULT_RULES` is what the engine falls back
//! to when the rule file cannot be loaded; `STARTER_RULES` is the richer
//! catalog written by `fileclass rules init`.

use super::{ClassificationRule, SubRule};

/// Fallback rules used when the rule file is missing or malformed
pub const DEFAULT_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        name: "TypeScript Files",
        pattern: "**/*.ts",
        content_patterns: &["import", "export", "interface", "class"],
        target_path: "lib/",
        confidence: 0.8,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "JavaScript Files",
        pattern: "**/*.js",
        content_patterns: &["require", "module.exports", "function"],
        target_path: "lib/",
        confidence: 0.8,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Test Files",
        pattern: "**/*.test.*",
        content_patterns: &["describe", "it(", "test(", "expect"],
        target_path: "tests/",
        confidence: 0.95,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Documentation",
        pattern: "**/*.md",
        content_patterns: &["#", "##", "###"],
        target_path: "docs/",
        confidence: 0.7,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Configuration Files",
        pattern: "**/*.json",
        content_patterns: &["config", "settings"],
        target_path: "config/",
        confidence: 0.6,
        sub_rules: &[],
    },
];

/// Starter catalog for a fresh rule file
pub const STARTER_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        name: "TypeScript CDK Files",
        pattern: "**/*.ts",
        content_patterns: &["import.*@aws-cdk", "new.*Construct", "Stack", "App"],
        target_path: "lib/constructs/",
        confidence: 0.9,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Lambda Functions",
        pattern: "**/*.ts",
        content_patterns: &["export.*handler", "APIGatewayProxyEvent", "Context", "lambda"],
        target_path: "lambda/",
        confidence: 0.85,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Test Files",
        pattern: "**/*.test.*",
        content_patterns: &["describe", "it\\(", "test\\(", "expect", "jest"],
        target_path: "tests/",
        confidence: 0.95,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Documentation",
        pattern: "**/*.md",
        content_patterns: &["# ", "## ", "### "],
        target_path: "docs/",
        confidence: 0.8,
        sub_rules: &[
            BuiltinSubRule {
                content_pattern: "architecture|design",
                target_path: "docs/architecture/",
            },
            BuiltinSubRule {
                content_pattern: "deployment|deploy",
                target_path: "docs/deployment/",
            },
            BuiltinSubRule {
                content_pattern: "api|specification",
                target_path: "docs/integration/",
            },
        ],
    },
    BuiltinRule {
        name: "Configuration Files",
        pattern: "**/*.json",
        content_patterns: &["config", "settings", "configuration"],
        target_path: "config/",
        confidence: 0.7,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Core Library Files",
        pattern: "**/core/**/*.ts",
        content_patterns: &["Classification", "FileScanner", "DatabaseManager"],
        target_path: "lib/core/",
        confidence: 0.9,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Shell Scripts",
        pattern: "**/*.sh",
        content_patterns: &["#!/bin/bash", "#!/bin/sh", "set -e"],
        target_path: "scripts/",
        confidence: 0.85,
        sub_rules: &[],
    },
    BuiltinRule {
        name: "Docker Files",
        pattern: "**/Dockerfile*",
        content_patterns: &["FROM", "RUN", "COPY", "WORKDIR"],
        target_path: "docker/",
        confidence: 0.9,
        sub_rules: &[],
    },
];

/// Static rule definition
#[derive(Debug, Clone)]
pub struct BuiltinRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub content_patterns: &'static [&'static str],
    pub target_path: &'static str,
    pub confidence: f64,
    pub sub_rules: &'static [BuiltinSubRule],
}

/// Static sub-rule definition
#[derive(Debug, Clone)]
pub struct BuiltinSubRule {
    pub content_pattern: &'static str,
    pub target_path: &'static str,
}

impl From<&BuiltinRule> for ClassificationRule {
    fn from(builtin: &BuiltinRule) -> Self {
        Self {
            name: builtin.name.to_string(),
            pattern: builtin.pattern.to_string(),
            content_patterns: builtin
                .content_patterns
                .iter()
                .map(|s| s.to_string())
                .collect(),
            target_path: builtin.target_path.to_string(),
            confidence: builtin.confidence,
            sub_rules: builtin
                .sub_rules
                .iter()
                .map(|s| SubRule {
                    content_pattern: s.content_pattern.to_string(),
                    target_path: s.target_path.to_string(),
                })
                .collect(),
        }
    }
}

/// Owned copy of [`DEFAULT_RULES`]
pub fn default_rules() -> Vec<ClassificationRule> {
    DEFAULT_RULES.iter().map(ClassificationRule::from).collect()
}

/// Owned copy of [`STARTER_RULES`]
pub fn starter_rules() -> Vec<ClassificationRule> {
    STARTER_RULES.iter().map(ClassificationRule::from).collect()
}
