//! Classification Engine
//!
//! Owns the rule store and the learning cache and runs the signal pipeline
//! for one file at a time. Classification never fails: I/O problems only
//! remove the content signal, and a file no signal recognises gets the
//! extension-based default.

use std::borrow::Cow;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::fs::{FileSource, LocalFileSource};
use crate::rule::{ClassificationRule, RuleStore};

use super::combine::combine;
use super::descriptor::FileDescriptor;
use super::fallback::default_classification;
use super::learning::LearningCache;
use super::signal::{content_signals, extension_signals, path_signals};
use super::ClassificationResult;

/// Cached results above this confidence are returned without recomputing
pub const CACHE_HIT_THRESHOLD: f64 = 0.9;

/// Combined results above this confidence are cached
pub const LEARNING_THRESHOLD: f64 = 0.7;

/// Snapshot of engine state
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatistics {
    pub rules_count: usize,
    pub learning_data_count: usize,
    pub enable_content_analysis: bool,
    pub enable_learning: bool,
    pub confidence_threshold: f64,
}

/// Rule-based file classifier
pub struct ClassificationEngine<F: FileSource = LocalFileSource> {
    config: ClassifierConfig,
    store: RuleStore,
    learning: LearningCache,
    source: F,
}

impl ClassificationEngine<LocalFileSource> {
    /// Engine reading files from the local filesystem
    pub fn new(config: ClassifierConfig) -> Self {
        Self::with_file_source(config, LocalFileSource)
    }
}

impl<F: FileSource> ClassificationEngine<F> {
    /// Engine with no rules until [`initialize`](Self::initialize) is called
    pub fn with_file_source(config: ClassifierConfig, source: F) -> Self {
        let store = RuleStore::with_rules(config.rules_file.clone(), Vec::new());
        Self {
            config,
            store,
            learning: LearningCache::new(),
            source,
        }
    }

    /// Load rules from the configured rule file.
    ///
    /// A missing or malformed file installs the default rules instead, so
    /// this currently always succeeds.
    pub fn initialize(&mut self) -> Result<()> {
        self.store = RuleStore::load(&self.config.rules_file);
        tracing::info!(count = self.store.len(), "classification rules loaded");
        Ok(())
    }

    /// Classify one file. `content` skips reading the file from disk.
    pub fn classify_file(
        &mut self,
        path: impl AsRef<Path>,
        content: Option<&str>,
    ) -> ClassificationResult {
        let path = path.as_ref();
        let file = FileDescriptor::new(path);

        if let Some(learned) = self.learning.get(path) {
            if learned.confidence > CACHE_HIT_THRESHOLD {
                tracing::debug!(path = %path.display(), "using learned classification");
                return learned.clone();
            }
        }

        let rules = self.store.compiled();
        let mut candidates = extension_signals(rules, &file);
        if self.config.enable_content_analysis {
            if let Some(text) = self.content_for(&file, content) {
                candidates.extend(content_signals(rules, &file, &text));
            }
        }
        candidates.extend(path_signals(&file));

        let result = if candidates.is_empty() {
            default_classification(path)
        } else {
            combine(&candidates)
        };

        if self.config.enable_learning && result.confidence > LEARNING_THRESHOLD {
            self.learning.insert(path, result.clone());
        }

        tracing::debug!(
            path = %path.display(),
            category = %result.category,
            confidence = result.confidence,
            candidates = candidates.len(),
            "classified"
        );
        result
    }

    /// Replace the rule set and save it to the rule file.
    ///
    /// Saving is best-effort. Learned results are kept, so a cached
    /// classification can outlive the rule that produced it.
    pub fn update_rules(&mut self, rules: Vec<ClassificationRule>) {
        self.store.replace(rules);
        self.store.persist();
    }

    /// Confidence of a fresh classification of `path`
    pub fn confidence(&mut self, path: impl AsRef<Path>) -> f64 {
        self.classify_file(path, None).confidence
    }

    /// Record a known classification; ignored when learning is disabled
    pub fn add_learning_data(&mut self, path: impl AsRef<Path>, result: ClassificationResult) {
        if self.config.enable_learning {
            self.learning.insert(path.as_ref(), result);
        }
    }

    pub fn clear_learning_data(&mut self) {
        self.learning.clear();
        tracing::info!("learning data cleared");
    }

    pub fn statistics(&self) -> EngineStatistics {
        EngineStatistics {
            rules_count: self.store.len(),
            learning_data_count: self.learning.len(),
            enable_content_analysis: self.config.enable_content_analysis,
            enable_learning: self.config.enable_learning,
            confidence_threshold: self.config.default_confidence_threshold,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn rule_store(&self) -> &RuleStore {
        &self.store
    }

    pub fn rule_store_mut(&mut self) -> &mut RuleStore {
        &mut self.store
    }

    pub fn learning(&self) -> &LearningCache {
        &self.learning
    }

    fn content_for<'a>(
        &self,
        file: &FileDescriptor,
        provided: Option<&'a str>,
    ) -> Option<Cow<'a, str>> {
        match self.read_content(file, provided) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %file.path.display(), error = %e, "content analysis skipped");
                None
            }
        }
    }

    /// `Ok(None)` when the file on disk exceeds the analysis size limit.
    ///
    /// The file is stat'ed even when content is supplied; empty supplied
    /// content counts as absent.
    fn read_content<'a>(
        &self,
        file: &FileDescriptor,
        provided: Option<&'a str>,
    ) -> io::Result<Option<Cow<'a, str>>> {
        let limit = self.config.max_content_analysis_size;

        if self.source.file_size(&file.path)? > limit {
            tracing::debug!(path = %file.path.display(), limit, "file too large for content analysis");
            return Ok(None);
        }

        match provided.filter(|text| !text.is_empty()) {
            Some(text) => Ok(Some(Cow::Borrowed(text))),
            None => Ok(Some(Cow::Owned(self.source.read_to_string(&file.path)?))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::default_rules;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[derive(Default)]
    struct MemorySource {
        files: HashMap<PathBuf, String>,
        calls: Cell<usize>,
    }

    impl MemorySource {
        fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }

        fn lookup(&self, path: &Path) -> io::Result<&String> {
            self.calls.set(self.calls.get() + 1);
            self.files
                .get(path)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    impl FileSource for MemorySource {
        fn file_size(&self, path: &Path) -> io::Result<u64> {
            Ok(self.lookup(path)?.len() as u64)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            Ok(self.lookup(path)?.clone())
        }
    }

    fn engine(source: MemorySource) -> ClassificationEngine<MemorySource> {
        let mut engine =
            ClassificationEngine::with_file_source(ClassifierConfig::default(), source);
        engine.rule_store_mut().replace(default_rules());
        engine
    }

    fn learned(category: &str, confidence: f64) -> ClassificationResult {
        ClassificationResult {
            category: category.to_string(),
            subcategory: None,
            confidence,
            suggested_path: format!("{}/", category),
            reasoning: vec!["learned".to_string()],
        }
    }

    #[test]
    fn test_typescript_in_src_without_file() {
        let mut engine = engine(MemorySource::default());
        let result = engine.classify_file("src/foo.ts", None);

        assert_eq!(result.category, "lib");
        assert_eq!(result.suggested_path, "lib/");
        assert_eq!(result.confidence, 0.8);
        assert!(result
            .reasoning
            .contains(&"path heuristic: library file".to_string()));
    }

    #[test]
    fn test_unrecognised_file_gets_extension_default() {
        let mut engine = engine(MemorySource::default().with_file("notes.txt", "hello"));
        let result = engine.classify_file("notes.txt", None);

        assert_eq!(result.category, "documentation");
        assert_eq!(result.suggested_path, "docs/");
        assert_eq!(result.confidence, 0.3);
        assert!(engine.learning().is_empty());
    }

    #[test]
    fn test_content_and_extension_agree() {
        let mut engine = engine(MemorySource::default().with_file("a.md", "# Title\n## Section"));
        let result = engine.classify_file("a.md", Some("# Title\n## Section"));

        // extension 0.7, content 0.7 + 2 * 0.1; agreement: 0.8 * 1.2
        assert_eq!(result.category, "docs");
        assert!((result.confidence - 0.96).abs() < 1e-9);
    }

    #[test]
    fn test_provided_content_is_stat_only() {
        let mut engine = engine(MemorySource::default().with_file("x.js", "// on disk"));
        let result = engine.classify_file("x.js", Some("module.exports = function () {}"));

        // stat only; the supplied text is what gets matched
        assert_eq!(engine.source.calls.get(), 1);
        assert!(result
            .reasoning
            .contains(&"content pattern matches: 2".to_string()));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_empty_provided_content_reads_file() {
        let mut engine = engine(MemorySource::default().with_file("a.md", "# Title"));
        let result = engine.classify_file("a.md", Some(""));

        assert_eq!(engine.source.calls.get(), 2);
        assert!(result
            .reasoning
            .contains(&"content pattern matches: 1".to_string()));
    }

    #[test]
    fn test_provided_content_ignored_for_missing_file() {
        let mut engine = engine(MemorySource::default());
        engine.rule_store_mut().replace(vec![
            ClassificationRule::new("Words", "*.none", "words/", 0.5).with_content_patterns(["alpha"]),
        ]);

        let result = engine.classify_file("ghost.bin", Some("alpha"));
        assert_eq!(result.category, "misc");
        assert_eq!(result.confidence, 0.3);
    }

    #[test]
    fn test_oversized_file_ignores_provided_excerpt() {
        let mut config = ClassifierConfig::default();
        config.max_content_analysis_size = 4;
        let mut engine = ClassificationEngine::with_file_source(
            config,
            MemorySource::default().with_file("a.md", "# long heading"),
        );
        engine.rule_store_mut().replace(default_rules());

        let result = engine.classify_file("a.md", Some("# x"));
        assert_eq!(result.confidence, 0.7);
        assert_eq!(engine.source.calls.get(), 1);
    }

    #[test]
    fn test_file_read_from_source() {
        let mut engine = engine(MemorySource::default().with_file("conf.json", "settings"));
        let result = engine.classify_file("conf.json", None);

        // extension 0.6 and content 0.7 agree: min(0.65 * 1.2, 1.0)
        assert_eq!(result.category, "config");
        assert!((result.confidence - 0.78).abs() < 1e-9);
        assert_eq!(engine.source.calls.get(), 2);
    }

    #[test]
    fn test_content_analysis_disabled() {
        let mut config = ClassifierConfig::default();
        config.enable_content_analysis = false;
        let mut engine = ClassificationEngine::with_file_source(
            config,
            MemorySource::default().with_file("conf.json", "settings"),
        );
        engine.rule_store_mut().replace(default_rules());

        assert_eq!(engine.classify_file("conf.json", None).confidence, 0.6);
        assert_eq!(engine.source.calls.get(), 0);
    }

    #[test]
    fn test_high_confidence_cache_short_circuits() {
        let mut engine = engine(MemorySource::default().with_file("a.md", "# x"));
        engine.add_learning_data("a.md", learned("archive", 0.95));

        let result = engine.classify_file("a.md", None);
        assert_eq!(result.category, "archive");
        assert_eq!(engine.source.calls.get(), 0);
    }

    #[test]
    fn test_moderate_cache_entry_is_recomputed() {
        let mut engine = engine(MemorySource::default().with_file("a.md", "# x"));
        engine.add_learning_data("a.md", learned("archive", 0.9));

        let result = engine.classify_file("a.md", None);
        assert_eq!(result.category, "docs");
        assert!(engine.source.calls.get() > 0);
    }

    #[test]
    fn test_results_above_threshold_are_learned() {
        let mut engine = engine(MemorySource::default());
        engine.classify_file("src/foo.ts", None);
        assert_eq!(engine.statistics().learning_data_count, 1);

        engine.clear_learning_data();
        assert_eq!(engine.statistics().learning_data_count, 0);
    }

    #[test]
    fn test_learning_disabled() {
        let mut config = ClassifierConfig::default();
        config.enable_learning = false;
        let mut engine = ClassificationEngine::with_file_source(config, MemorySource::default());
        engine.rule_store_mut().replace(default_rules());

        engine.add_learning_data("a.md", learned("x", 0.99));
        engine.classify_file("src/foo.ts", None);
        assert!(engine.learning().is_empty());
    }

    #[test]
    fn test_confidence_is_always_in_range() {
        let mut engine = engine(
            ["a", "tests/b.ts", "docs/c.md", "x.png"]
                .into_iter()
                .fold(MemorySource::default(), |source, path| source.with_file(path, "a")),
        );
        engine.rule_store_mut().replace(vec![
            ClassificationRule::new("Hot", "*", "hot/", 1.5).with_content_patterns(["a"]),
        ]);

        for path in ["a", "tests/b.ts", "docs/c.md", "x.png"] {
            let c = engine.classify_file(path, Some("a")).confidence;
            assert!((0.0..=1.0).contains(&c), "{} -> {}", path, c);
        }
    }

    #[test]
    fn test_confidence_helper() {
        let mut engine = engine(MemorySource::default());
        assert_eq!(engine.confidence("image.png"), 0.3);
    }
}
