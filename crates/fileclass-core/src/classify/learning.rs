use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::ClassificationResult;

/// Previously computed results keyed by the path the caller supplied
#[derive(Debug, Clone, Default)]
pub struct LearningCache {
    entries: HashMap<PathBuf, ClassificationResult>,
}

impl LearningCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&ClassificationResult> {
        self.entries.get(path)
    }

    /// Last write wins
    pub fn insert(&mut self, path: impl Into<PathBuf>, result: ClassificationResult) {
        self.entries.insert(path.into(), result);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
