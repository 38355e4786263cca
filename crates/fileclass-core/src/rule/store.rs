//! Rule Store
//!
//! Runtime rule set backed by a JSON rule file. Loading never fails: a
//! missing or malformed file yields the builtin defaults. The best-effort
//! `persist` swallows write errors; the management operations (`save`,
//! `add_rule`, ...) validate and propagate them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::error::{FileclassError, Result};

use super::builtin::default_rules;
use super::matcher::CompiledRule;
use super::validate::{validate_rule, validate_rules};
use super::{ClassificationRule, RulesDocument};

/// Version written into saved rule files
pub const RULES_FORMAT_VERSION: &str = "1.0.0";

/// Runtime rule store
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
    rules: Vec<CompiledRule>,
}

impl RuleStore {
    /// Store with the given rules, not yet written anywhere
    pub fn with_rules(path: impl Into<PathBuf>, rules: Vec<ClassificationRule>) -> Self {
        Self {
            path: path.into(),
            rules: compile(rules),
        }
    }

    /// Load rules from `path`, falling back to the defaults on any failure
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match read_document(&path) {
            Ok(doc) => {
                tracing::debug!(path = %path.display(), count = doc.rules.len(), "loaded rules");
                Self::with_rules(path, doc.rules)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load rule file, using default rules");
                Self::with_rules(path, default_rules())
            }
        }
    }

    /// Rule file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in file order
    pub fn rules(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Owned copy of the rules
    pub fn to_vec(&self) -> Vec<ClassificationRule> {
        self.rules().cloned().collect()
    }

    pub fn compiled(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&ClassificationRule> {
        self.rules().find(|r| r.name == name)
    }

    /// Swap the in-memory rule set without touching the file
    pub fn replace(&mut self, rules: Vec<ClassificationRule>) {
        self.rules = compile(rules);
    }

    /// Write the current rules; failures are logged and reported as `false`
    pub fn persist(&self) -> bool {
        match write_document(&self.path, &self.to_vec()) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), count = self.len(), "rules saved");
                true
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to save rules");
                false
            }
        }
    }

    /// Validate and write `rules`, then install them
    pub fn save(&mut self, rules: Vec<ClassificationRule>) -> Result<()> {
        let report = validate_rules(&rules);
        if !report.is_valid() {
            return Err(FileclassError::InvalidRules {
                errors: report.errors,
            });
        }
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }

        write_document(&self.path, &rules)?;
        tracing::info!(path = %self.path.display(), count = rules.len(), "rules saved");
        self.replace(rules);
        Ok(())
    }

    /// Append a new rule and save
    pub fn add_rule(&mut self, rule: ClassificationRule) -> Result<()> {
        if self.get(&rule.name).is_some() {
            return Err(FileclassError::RuleAlreadyExists { name: rule.name });
        }
        check_rule(&rule)?;

        let mut rules = self.to_vec();
        rules.push(rule);
        self.save(rules)
    }

    /// Replace the rule called `name` and save
    pub fn update_rule(&mut self, name: &str, rule: ClassificationRule) -> Result<()> {
        let index = self.index_of(name)?;
        check_rule(&rule)?;

        let mut rules = self.to_vec();
        rules[index] = rule;
        self.save(rules)
    }

    /// Remove the rule called `name` and save
    pub fn delete_rule(&mut self, name: &str) -> Result<ClassificationRule> {
        let index = self.index_of(name)?;

        let mut rules = self.to_vec();
        let removed = rules.remove(index);
        self.save(rules)?;
        Ok(removed)
    }

    /// Case-insensitive search over name, pattern and target path
    pub fn find_rules(&self, query: &str) -> Vec<&ClassificationRule> {
        let query = query.to_lowercase();
        self.rules()
            .filter(|r| {
                r.name.to_lowercase().contains(&query)
                    || r.pattern.to_lowercase().contains(&query)
                    || r.target_path.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Rules whose target path falls in `category`
    pub fn rules_by_category(&self, category: &str) -> Vec<&ClassificationRule> {
        self.rules().filter(|r| r.category() == category).collect()
    }

    pub fn statistics(&self) -> RuleStatistics {
        let mut categories = BTreeMap::new();
        let mut distribution = ConfidenceDistribution::default();

        for rule in self.rules() {
            *categories.entry(rule.category().to_string()).or_insert(0) += 1;
            if rule.confidence < 0.5 {
                distribution.low += 1;
            } else if rule.confidence < 0.8 {
                distribution.medium += 1;
            } else {
                distribution.high += 1;
            }
        }

        RuleStatistics {
            total_rules: self.len(),
            categories,
            confidence_distribution: distribution,
            rules_file: self.path.clone(),
        }
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.rules()
            .position(|r| r.name == name)
            .ok_or_else(|| FileclassError::RuleNotFound {
                name: name.to_string(),
            })
    }
}

/// Summary of the installed rule set
#[derive(Debug, Clone, Serialize)]
pub struct RuleStatistics {
    pub total_rules: usize,
    pub categories: BTreeMap<String, usize>,
    pub confidence_distribution: ConfidenceDistribution,
    pub rules_file: PathBuf,
}

/// Rule counts by prior: low < 0.5 <= medium < 0.8 <= high
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfidenceDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

fn compile(rules: Vec<ClassificationRule>) -> Vec<CompiledRule> {
    rules.into_iter().map(CompiledRule::new).collect()
}

fn check_rule(rule: &ClassificationRule) -> Result<()> {
    let report = validate_rule(rule);
    if report.is_valid() {
        Ok(())
    } else {
        Err(FileclassError::InvalidRules {
            errors: report.errors,
        })
    }
}

fn read_document(path: &Path) -> Result<RulesDocument> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_document(path: &Path, rules: &[ClassificationRule]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let doc = RulesDocument {
        version: Some(RULES_FORMAT_VERSION.to_string()),
        last_updated: Some(Utc::now()),
        rules: rules.to_vec(),
    };
    fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}
