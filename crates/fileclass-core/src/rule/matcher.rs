//! Compiled rule matchers
//!
//! Globs and content regexes are compiled once when a rule set is
//! installed. A content pattern that is not a valid regex degrades to a
//! case-insensitive substring search.

use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};

use super::{ClassificationRule, SubRule};

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A single content pattern
#[derive(Debug, Clone)]
pub struct ContentMatcher {
    source: String,
    kind: MatcherKind,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Regex(Regex),
    /// Lowercased needle
    Substring(String),
}

impl ContentMatcher {
    pub fn new(pattern: &str) -> Self {
        let kind = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => MatcherKind::Regex(re),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "content pattern is not a regex, using substring match");
                MatcherKind::Substring(pattern.to_lowercase())
            }
        };
        Self {
            source: pattern.to_string(),
            kind,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern compiled as a regex
    pub fn is_regex(&self) -> bool {
        matches!(self.kind, MatcherKind::Regex(_))
    }

    pub fn is_match(&self, content: &str) -> bool {
        match &self.kind {
            MatcherKind::Regex(re) => re.is_match(content),
            MatcherKind::Substring(needle) => content.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// A sub-rule with its compiled pattern
#[derive(Debug, Clone)]
pub struct CompiledSubRule {
    pub rule: SubRule,
    /// `None` when the sub-rule has no pattern; such sub-rules never match
    pub matcher: Option<ContentMatcher>,
}

/// A rule ready for matching
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ClassificationRule,
    glob: Option<Pattern>,
    content: Vec<ContentMatcher>,
    sub_rules: Vec<CompiledSubRule>,
}

impl CompiledRule {
    pub fn new(rule: ClassificationRule) -> Self {
        let glob = match Pattern::new(&rule.pattern) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(rule = %rule.name, pattern = %rule.pattern, error = %e, "invalid glob, rule will never match by name");
                None
            }
        };
        let content = rule
            .content_patterns
            .iter()
            .map(|p| ContentMatcher::new(p))
            .collect();
        let sub_rules = rule
            .sub_rules
            .iter()
            .map(|s| CompiledSubRule {
                rule: s.clone(),
                matcher: (!s.content_pattern.is_empty())
                    .then(|| ContentMatcher::new(&s.content_pattern)),
            })
            .collect();

        Self {
            rule,
            glob,
            content,
            sub_rules,
        }
    }

    /// Case-insensitive glob match against the file name
    pub fn matches_name(&self, basename: &str) -> bool {
        self.glob
            .as_ref()
            .is_some_and(|p| p.matches_with(basename, GLOB_OPTIONS))
    }

    /// Number of content patterns that match
    pub fn count_content_matches(&self, content: &str) -> usize {
        self.content.iter().filter(|m| m.is_match(content)).count()
    }

    pub fn content_matchers(&self) -> &[ContentMatcher] {
        &self.content
    }

    pub fn sub_rules(&self) -> &[CompiledSubRule] {
        &self.sub_rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(pattern: &str) -> CompiledRule {
        CompiledRule::new(ClassificationRule::new("t", pattern, "x/", 0.5))
    }

    #[test]
    fn test_recursive_glob_matches_bare_file_name() {
        let rule = compiled("**/*.ts");
        assert!(rule.matches_name("foo.ts"));
        assert!(rule.matches_name("FOO.TS"));
        assert!(!rule.matches_name("foo.tsx"));
    }

    #[test]
    fn test_glob_question_mark_and_infix() {
        assert!(compiled("**/*.test.*").matches_name("a.test.js"));
        assert!(compiled("file?.md").matches_name("file1.md"));
        assert!(!compiled("file?.md").matches_name("file12.md"));
    }

    #[test]
    fn test_glob_ignores_directories() {
        assert!(!compiled("test*").matches_name("helper.rs"));
        assert!(compiled("test*").matches_name("test_helper.rs"));
        assert!(!compiled("**/core/**/*.ts").matches_name("engine.ts"));
    }

    #[test]
    fn test_invalid_glob_never_matches() {
        let rule = compiled("***");
        assert!(!rule.matches_name("anything"));
    }

    #[test]
    fn test_content_matcher_regex_is_case_insensitive() {
        let m = ContentMatcher::new("import.*cdk");
        assert!(m.is_regex());
        assert!(m.is_match("IMPORT * as x from 'aws-CDK-lib'"));
    }

    #[test]
    fn test_content_matcher_invalid_regex_falls_back_to_substring() {
        let m = ContentMatcher::new("it(");
        assert!(!m.is_regex());
        assert!(m.is_match("IT('works', () => {})"));
        assert!(!m.is_match("it works"));
    }

    #[test]
    fn test_count_content_matches() {
        let rule = CompiledRule::new(
            ClassificationRule::new("t", "*", "x/", 0.5)
                .with_content_patterns(["import", "export", "class"]),
        );
        assert_eq!(rule.count_content_matches("import a; export b;"), 2);
        assert_eq!(rule.count_content_matches("nothing"), 0);
    }

    #[test]
    fn test_empty_sub_rule_pattern_has_no_matcher() {
        let rule = CompiledRule::new(
            ClassificationRule::new("t", "*", "x/", 0.5).with_sub_rule("", "x/y/"),
        );
        assert!(rule.sub_rules()[0].matcher.is_none());
    }
}
