//! Signal extractors
//!
//! Each extractor is a pure function from rules and file facts to candidate
//! results. Reading the file is the engine's job.

use crate::rule::{category_of, subcategory_of, CompiledRule};

use super::descriptor::FileDescriptor;
use super::ClassificationResult;

/// Confidence added per matching content pattern
pub const CONTENT_MATCH_BONUS: f64 = 0.1;

/// Sub-rule matches score this fraction of the parent's prior
pub const SUB_RULE_FACTOR: f64 = 0.9;

/// Content patterns echoed into the reasoning
const REASONED_PATTERNS: usize = 3;

/// Candidates from rule globs matched against the file name
pub fn extension_signals(
    rules: &[CompiledRule],
    file: &FileDescriptor,
) -> Vec<ClassificationResult> {
    rules
        .iter()
        .filter(|c| c.matches_name(&file.basename))
        .map(|c| {
            candidate(
                &c.rule.target_path,
                c.rule.confidence,
                file,
                vec![
                    format!("extension pattern match: {}", c.rule.pattern),
                    format!("rule: {}", c.rule.name),
                ],
            )
        })
        .collect()
}

/// Candidates from rule content patterns and sub-rules
pub fn content_signals(
    rules: &[CompiledRule],
    file: &FileDescriptor,
    content: &str,
) -> Vec<ClassificationResult> {
    let mut results = Vec::new();

    for c in rules {
        let rule = &c.rule;

        let matches = c.count_content_matches(content);
        if matches > 0 {
            let confidence = (rule.confidence + matches as f64 * CONTENT_MATCH_BONUS).min(1.0);
            let mut reasoning = vec![
                format!("content pattern matches: {}", matches),
                format!("rule: {}", rule.name),
            ];
            reasoning.extend(
                c.content_matchers()
                    .iter()
                    .take(REASONED_PATTERNS)
                    .map(|m| format!("pattern: {}", m.as_str())),
            );
            results.push(candidate(&rule.target_path, confidence, file, reasoning));
        }

        for sub in c.sub_rules() {
            let Some(matcher) = &sub.matcher else {
                continue;
            };
            if matcher.is_match(content) {
                results.push(candidate(
                    &sub.rule.target_path,
                    rule.confidence * SUB_RULE_FACTOR,
                    file,
                    vec![
                        format!("sub-rule match: {}", sub.rule.content_pattern),
                        format!("parent rule: {}", rule.name),
                    ],
                ));
            }
        }
    }

    results
}

/// Candidates from well-known directory names in the path
pub fn path_signals(file: &FileDescriptor) -> Vec<ClassificationResult> {
    let mut results = Vec::new();

    for segment in file.segments() {
        let hint = match segment.to_lowercase().as_str() {
            "lib" | "src" if file.extension == ".ts" => {
                Some(("library", 0.6, "lib/", "library file"))
            }
            "docs" | "documentation" => Some(("documentation", 0.7, "docs/", "documentation")),
            "config" | "configuration" => {
                Some(("configuration", 0.8, "config/", "configuration file"))
            }
            "test" | "tests" | "__tests__" => Some(("test", 0.9, "tests/", "test file")),
            _ => None,
        };

        if let Some((category, confidence, suggested, label)) = hint {
            results.push(ClassificationResult {
                category: category.to_string(),
                subcategory: None,
                confidence,
                suggested_path: suggested.to_string(),
                reasoning: vec![format!("path heuristic: {}", label)],
            });
        }
    }

    results
}

fn candidate(
    target_path: &str,
    confidence: f64,
    file: &FileDescriptor,
    reasoning: Vec<String>,
) -> ClassificationResult {
    let suggested_path = file.resolve_target(target_path);
    ClassificationResult {
        category: category_of(&suggested_path).to_string(),
        subcategory: subcategory_of(&suggested_path).map(str::to_string),
        confidence,
        suggested_path,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{default_rules, ClassificationRule};

    fn compile(rules: Vec<ClassificationRule>) -> Vec<CompiledRule> {
        rules.into_iter().map(CompiledRule::new).collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_extension_signal_uses_static_confidence() {
        let rules = compile(default_rules());
        let results = extension_signals(&rules, &FileDescriptor::new("src/foo.ts"));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, "lib");
        assert_eq!(results[0].confidence, 0.8);
        assert_eq!(results[0].suggested_path, "lib/");
        assert_eq!(results[0].reasoning[1], "rule: TypeScript Files");
    }

    #[test]
    fn test_extension_signal_multiple_rules() {
        let rules = compile(default_rules());
        let results = extension_signals(&rules, &FileDescriptor::new("foo.test.ts"));
        let names: Vec<_> = results.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["lib", "tests"]);
    }

    #[test]
    fn test_content_signal_adds_bonus_per_match() {
        let rules = compile(vec![ClassificationRule::new("R", "*", "lib/", 0.5)
            .with_content_patterns(["import", "export", "nomatch"])]);
        let results = content_signals(&rules, &FileDescriptor::new("a.ts"), "import x; export y;");

        assert_eq!(results.len(), 1);
        assert!(approx(results[0].confidence, 0.7));
        assert_eq!(results[0].reasoning[0], "content pattern matches: 2");
        assert_eq!(results[0].reasoning.len(), 5);
    }

    #[test]
    fn test_content_signal_clamps_to_one() {
        let rules = compile(vec![ClassificationRule::new("R", "*", "lib/", 0.8)
            .with_content_patterns(["a", "b", "c", "d"])]);
        let results = content_signals(&rules, &FileDescriptor::new("x"), "abcd");
        assert_eq!(results[0].confidence, 1.0);
    }

    #[test]
    fn test_sub_rule_scores_below_parent() {
        let rules = compile(vec![ClassificationRule::new("Docs", "*.md", "docs/", 0.8)
            .with_sub_rule("deploy", "docs/deployment/")]);
        let results = content_signals(&rules, &FileDescriptor::new("a.md"), "How to deploy");

        assert_eq!(results.len(), 1);
        assert!(approx(results[0].confidence, 0.72));
        assert!(results[0].confidence < 0.8);
        assert_eq!(results[0].category, "docs");
        assert_eq!(results[0].subcategory.as_deref(), Some("deployment"));
        assert_eq!(results[0].reasoning[1], "parent rule: Docs");
    }

    #[test]
    fn test_category_follows_resolved_target() {
        let rules = compile(vec![ClassificationRule::new("Notes", "*.note", "${ext}/archive/", 0.5)]);
        let results = extension_signals(&rules, &FileDescriptor::new("today.note"));

        assert_eq!(results[0].suggested_path, ".note/archive/");
        assert_eq!(results[0].category, ".note");
        assert_eq!(results[0].subcategory.as_deref(), Some("archive"));
    }

    #[test]
    fn test_no_content_match_no_candidate() {
        let rules = compile(default_rules());
        assert!(content_signals(&rules, &FileDescriptor::new("a.bin"), "\u{0}\u{1}").is_empty());
    }

    #[test]
    fn test_path_signal_lib_requires_ts() {
        assert_eq!(
            path_signals(&FileDescriptor::new("src/foo.ts"))[0].category,
            "library"
        );
        assert!(path_signals(&FileDescriptor::new("src/foo.rs")).is_empty());
    }

    #[test]
    fn test_path_signal_multiple_segments() {
        let results = path_signals(&FileDescriptor::new("Docs/config/__tests__/x.json"));
        let got: Vec<_> = results
            .iter()
            .map(|r| (r.category.as_str(), r.confidence))
            .collect();
        assert_eq!(
            got,
            vec![("documentation", 0.7), ("configuration", 0.8), ("test", 0.9)]
        );
    }
}
