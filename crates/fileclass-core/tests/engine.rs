use std::fs;
use std::path::Path;

use fileclass_core::{
    ClassificationEngine, ClassificationResult, ClassificationRule, ClassifierConfig, RuleStore,
};
use tempfile::TempDir;

fn engine_with_rule_file(dir: &Path, content: Option<&str>) -> ClassificationEngine {
    let rules_file = dir.join("rules.json");
    if let Some(content) = content {
        fs::write(&rules_file, content).unwrap();
    }
    let mut engine = ClassificationEngine::new(ClassifierConfig::with_rules_file(rules_file));
    engine.initialize().unwrap();
    engine
}

#[test]
fn malformed_rule_file_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let engine = engine_with_rule_file(temp.path(), Some("{\"rules\": [oops"));

    let stats = engine.statistics();
    assert_eq!(stats.rules_count, 5);
    assert_eq!(stats.learning_data_count, 0);
    assert!(stats.enable_learning);
}

#[test]
fn typescript_source_example() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), None);

    let result = engine.classify_file("src/foo.ts", None);
    assert_eq!(result.category, "lib");
    assert_eq!(result.suggested_path, "lib/");
    assert_eq!(result.confidence, 0.8);
}

#[test]
fn content_matches_from_disk() {
    let temp = TempDir::new().unwrap();
    let rules = r#"{
        "rules": [{
            "name": "Notes",
            "pattern": "*.note",
            "contentPatterns": ["alpha", "beta", "gamma", "delta"],
            "targetPath": "notes/${ext}/",
            "confidence": 0.75
        }]
    }"#;
    let mut engine = engine_with_rule_file(temp.path(), Some(rules));

    let file = temp.path().join("today.note");
    fs::write(&file, "ALPHA and Beta").unwrap();

    // extension 0.75, content 0.95; agreement: 0.85 * 1.2 clamps to 1.0
    let result = engine.classify_file(&file, None);
    assert_eq!(result.category, "notes");
    assert_eq!(result.subcategory.as_deref(), Some(".note"));
    assert_eq!(result.suggested_path, "notes/.note/");
    assert_eq!(result.confidence, 1.0);
    assert!(result.reasoning.len() <= 5);
}

#[test]
fn content_bonus_clamps_at_one() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), Some(r#"{"rules": []}"#));
    engine.update_rules(vec![ClassificationRule::new("Words", "*.none", "words/", 0.5)
        .with_content_patterns(["one", "two", "three", "four", "five", "six"])]);

    let file = temp.path().join("plain.txt");
    fs::write(&file, "").unwrap();

    let result = engine.classify_file(&file, Some("one two three four five six"));
    assert_eq!(result.category, "words");
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn sub_rule_scores_below_direct_match() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), Some(r#"{"rules": []}"#));
    engine.update_rules(vec![
        ClassificationRule::new("Direct", "*.none", "direct/", 0.6).with_content_patterns(["x"]),
        ClassificationRule::new("Parent", "*.none", "parent/", 0.6).with_sub_rule("x", "nested/"),
    ]);

    let file = temp.path().join("a.dat");
    fs::write(&file, "x").unwrap();

    let result = engine.classify_file(&file, None);
    // direct: 0.6 + 0.1 beats sub-rule: 0.6 * 0.9
    assert_eq!(result.category, "direct");
    assert!((result.confidence - 0.7).abs() < 1e-9);
}

#[test]
fn reasoning_is_capped_and_unique() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), None);

    let dir = temp.path().join("tests/docs/config");
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("spec.test.ts");
    fs::write(&file, "import x; export class A {}; describe('a', () => expect(1))").unwrap();

    let result = engine.classify_file(&file, None);

    assert!(result.reasoning.len() <= 5);
    let mut unique = result.reasoning.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), result.reasoning.len());
    assert!((0.0..=1.0).contains(&result.confidence));
}

#[test]
fn updated_rules_are_persisted_and_cache_is_kept() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), None);

    let learned = ClassificationResult {
        category: "pinned".to_string(),
        subcategory: None,
        confidence: 0.99,
        suggested_path: "pinned/".to_string(),
        reasoning: vec!["manual".to_string()],
    };
    engine.add_learning_data("src/foo.ts", learned.clone());
    engine.update_rules(vec![ClassificationRule::new("Only", "*.x", "x/", 0.5)]);

    assert_eq!(engine.classify_file("src/foo.ts", None), learned);
    assert_eq!(RuleStore::load(temp.path().join("rules.json")).len(), 1);

    engine.clear_learning_data();
    assert_eq!(engine.classify_file("src/foo.ts", None).category, "library");
}

#[test]
fn supplied_content_requires_file_on_disk() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), Some(r#"{"rules": []}"#));
    engine.update_rules(vec![ClassificationRule::new("Words", "*.none", "words/", 0.5)
        .with_content_patterns(["alpha"])]);

    let result = engine.classify_file(temp.path().join("ghost.bin"), Some("alpha"));
    assert_eq!(result.category, "misc");
    assert_eq!(result.confidence, 0.3);
}

#[test]
fn size_limit_applies_to_file_on_disk() {
    let temp = TempDir::new().unwrap();
    let rules_file = temp.path().join("rules.json");
    let mut config = ClassifierConfig::with_rules_file(rules_file);
    config.max_content_analysis_size = 1024;
    let mut engine = ClassificationEngine::new(config);
    engine.initialize().unwrap();
    engine.update_rules(vec![ClassificationRule::new("Words", "*.none", "words/", 0.5)
        .with_content_patterns(["alpha"])]);

    let big = temp.path().join("big.bin");
    fs::write(&big, vec![b'z'; 4096]).unwrap();
    let result = engine.classify_file(&big, Some("alpha"));
    assert_eq!(result.category, "misc");
    assert_eq!(result.confidence, 0.3);

    let small = temp.path().join("small.bin");
    fs::write(&small, "zzz").unwrap();
    let result = engine.classify_file(&small, Some("alpha"));
    assert_eq!(result.category, "words");
    assert!((result.confidence - 0.6).abs() < 1e-9);
}

#[test]
fn name_patterns_ignore_parent_directories() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), Some(r#"{"rules": []}"#));
    engine.update_rules(vec![ClassificationRule::new("Tests", "test*", "tests/", 0.8)]);

    let result = engine.classify_file("tests/helper.rs", None);
    assert_eq!(result.category, "test");
    assert!(!result
        .reasoning
        .contains(&"extension pattern match: test*".to_string()));

    let result = engine.classify_file("src/test_helper.rs", None);
    assert_eq!(result.category, "tests");
}

#[test]
fn path_heuristics_use_normalized_path() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_with_rule_file(temp.path(), Some(r#"{"rules": []}"#));

    let result = engine.classify_file("lib/../x.ts", None);
    assert_eq!(result.category, "code");
    assert_eq!(result.confidence, 0.3);
}
