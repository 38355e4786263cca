//! Classification Manager
//!
//! Batch and directory classification on top of [`ClassificationEngine`],
//! with optional auto-apply that moves confidently classified files into
//! their suggested directories, plus running statistics.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::classify::{ClassificationEngine, ClassificationResult};
use crate::error::{FileclassError, Result};
use crate::fs::{FileSource, LocalFileSource};

/// Minimum confidence for a result to be applied automatically
pub const AUTO_APPLY_THRESHOLD: f64 = 0.7;

const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Where and how to move classified files
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Root that suggested paths are resolved against
    pub target_root: PathBuf,
    /// Report destinations without moving anything
    pub dry_run: bool,
}

/// Result of classifying (and possibly moving) one file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationOutcome {
    pub path: PathBuf,
    pub result: ClassificationResult,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

/// Running totals across every classification made by a manager
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStats {
    pub total_classified: usize,
    pub auto_applied: usize,
    pub manual_review: usize,
    pub average_confidence: f64,
    pub category_distribution: BTreeMap<String, usize>,
}

impl ManagerStats {
    fn record(&mut self, result: &ClassificationResult, applied: bool) {
        self.total_classified += 1;
        if applied {
            self.auto_applied += 1;
        } else {
            self.manual_review += 1;
        }

        let n = self.total_classified as f64;
        self.average_confidence = (self.average_confidence * (n - 1.0) + result.confidence) / n;

        *self
            .category_distribution
            .entry(result.category.clone())
            .or_insert(0) += 1;
    }
}

/// Outcomes of a batch or directory run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassificationReport {
    pub outcomes: Vec<ClassificationOutcome>,
}

impl ClassificationReport {
    /// Files classified into `category`
    pub fn files_in_category(&self, category: &str) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter(|o| o.result.category == category)
            .map(|o| &o.path)
            .collect()
    }

    /// Number of files per category
    pub fn category_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for outcome in &self.outcomes {
            *counts.entry(outcome.result.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Outcomes whose confidence is below `threshold`
    pub fn below_threshold(&self, threshold: f64) -> Vec<&ClassificationOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.result.confidence < threshold)
            .collect()
    }

    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.applied).count()
    }
}

/// Classifies files in bulk and optionally moves them into place
pub struct ClassificationManager<F: FileSource = LocalFileSource> {
    engine: ClassificationEngine<F>,
    stats: ManagerStats,
}

impl<F: FileSource> ClassificationManager<F> {
    pub fn new(engine: ClassificationEngine<F>) -> Self {
        Self {
            engine,
            stats: ManagerStats::default(),
        }
    }

    pub fn engine(&self) -> &ClassificationEngine<F> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ClassificationEngine<F> {
        &mut self.engine
    }

    pub fn stats(&self) -> &ManagerStats {
        &self.stats
    }

    /// Classify one file, applying the result when `apply` is given and the
    /// confidence reaches [`AUTO_APPLY_THRESHOLD`]
    pub fn classify(&mut self, path: &Path, apply: Option<&ApplyOptions>) -> ClassificationOutcome {
        let result = self.engine.classify_file(path, None);
        let eligible = apply.is_some() && result.confidence >= AUTO_APPLY_THRESHOLD;
        self.stats.record(&result, eligible);

        let mut outcome = ClassificationOutcome {
            path: path.to_path_buf(),
            result,
            applied: false,
            destination: None,
        };

        if let (true, Some(options)) = (eligible, apply) {
            match apply_classification(path, &outcome.result, options) {
                Ok(destination) => {
                    outcome.applied = true;
                    outcome.destination = Some(destination);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to apply classification");
                }
            }
        }

        outcome
    }

    /// Classify every path in order
    pub fn classify_batch(
        &mut self,
        paths: &[PathBuf],
        apply: Option<&ApplyOptions>,
    ) -> ClassificationReport {
        tracing::info!(count = paths.len(), "batch classification started");
        let outcomes: Vec<_> = paths.iter().map(|p| self.classify(p, apply)).collect();
        tracing::info!(
            classified = outcomes.len(),
            applied = outcomes.iter().filter(|o| o.applied).count(),
            "batch classification finished"
        );
        ClassificationReport { outcomes }
    }

    /// Classify the files under `dir`, skipping hidden entries
    pub fn classify_directory(
        &mut self,
        dir: &Path,
        recursive: bool,
        apply: Option<&ApplyOptions>,
    ) -> Result<ClassificationReport> {
        let files = collect_files(dir, recursive)?;
        Ok(self.classify_batch(&files, apply))
    }
}

/// Files under `dir` in a stable order
pub fn collect_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FileclassError::PathNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(dir).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| e.depth() == 0 || !is_hidden(e)) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                if !IGNORED_FILES.iter().any(|ignored| entry.file_name() == *ignored) {
                    files.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Move `path` into `<target_root>/<suggested_path>/<file name>`.
///
/// Returns the destination. A file already at its destination is left alone.
pub fn apply_classification(
    path: &Path,
    result: &ClassificationResult,
    options: &ApplyOptions,
) -> Result<PathBuf> {
    let suggested = Path::new(&result.suggested_path);
    if suggested
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("suggested path escapes target root: {}", result.suggested_path),
        )
        .into());
    }

    let file_name = path.file_name().ok_or_else(|| FileclassError::PathNotFound {
        path: path.to_path_buf(),
    })?;
    let destination = options.target_root.join(suggested).join(file_name);

    if options.dry_run {
        return Ok(destination);
    }

    if same_file(path, &destination) {
        tracing::debug!(path = %path.display(), "already in place");
        return Ok(destination);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    if destination.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination exists: {}", destination.display()),
        )
        .into());
    }
    fs::rename(path, &destination)?;
    tracing::info!(from = %path.display(), to = %destination.display(), "moved file");
    Ok(destination)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
