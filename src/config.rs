//! Configuration — `.normlab.toml` ignore rules and similarity thresholds
//!
//! The reference tool hard-coded its ignore tables and thresholds; here both
//! are an immutable configuration object built once and passed by reference
//! into the normalizer (including every recursive sub-container call) and
//! the analyzer.

use crate::{NormlabError, NormlabResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level tool configuration (loaded from `.normlab.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormlabConfig {
    /// Directory/file exclusion rules applied before any extraction decision
    #[serde(default)]
    pub ignore: IgnoreRules,

    /// Thresholds for the pairwise similarity signals
    #[serde(default)]
    pub thresholds: SimilarityThresholds,

    /// Where the similarity report CSV is written
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

fn default_report_path() -> String {
    "Similar-Works-Report.csv".to_string()
}

impl Default for NormlabConfig {
    fn default() -> Self {
        Self {
            ignore: IgnoreRules::default(),
            thresholds: SimilarityThresholds::default(),
            report_path: default_report_path(),
        }
    }
}

impl NormlabConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> NormlabResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| NormlabError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

// ─── Ignore Rules ──────────────────────────────────────────────────

/// Entry exclusion rules: a path predicate and a file predicate, ANDed.
///
/// Entries failing either predicate are skipped entirely — not extracted,
/// not recorded, not recursed into even if they are archives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreRules {
    /// Directory tokens rejected wherever they appear in a path
    #[serde(default = "default_ignore_dirs")]
    pub dirs: Vec<String>,

    /// Filename suffixes rejected
    #[serde(default = "default_ignore_suffixes")]
    pub file_suffixes: Vec<String>,
}

fn default_ignore_dirs() -> Vec<String> {
    vec![
        ".git".into(),
        ".idea".into(),
        "target".into(),
        "__MACOSX".into(),
    ]
}

fn default_ignore_suffixes() -> Vec<String> {
    vec![".class".into(), ".gitignore".into(), ".DS_Store".into()]
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            dirs: default_ignore_dirs(),
            file_suffixes: default_ignore_suffixes(),
        }
    }
}

impl IgnoreRules {
    /// Reject if any configured directory token appears anywhere in the path.
    pub fn check_path(&self, path: &str) -> bool {
        !self.dirs.iter().any(|dir| path.contains(dir.as_str()))
    }

    /// Reject if the filename ends with any configured suffix.
    pub fn check_file(&self, filename: &str) -> bool {
        !self
            .file_suffixes
            .iter()
            .any(|suffix| filename.ends_with(suffix.as_str()))
    }

    /// Both predicates must pass for an entry to be processed.
    pub fn allow(&self, path: &str, filename: &str) -> bool {
        self.check_path(path) && self.check_file(filename)
    }
}

// ─── Similarity Thresholds ─────────────────────────────────────────

/// Thresholds for the three pairwise similarity signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityThresholds {
    /// Relative total-size difference below which sizes count as similar
    #[serde(default = "default_size_ratio")]
    pub size_ratio: f64,

    /// Proportion of well-matched paths above which structures count as similar
    #[serde(default = "default_structure_proportion")]
    pub structure_proportion: f64,

    /// Per-path string ratio above which two paths count as a match
    #[serde(default = "default_similar_ratio")]
    pub similar_ratio: f64,

    /// String ratio above which two stripped report names count as similar
    #[serde(default = "default_report_name_ratio")]
    pub report_name_ratio: f64,
}

fn default_size_ratio() -> f64 {
    0.10
}
fn default_structure_proportion() -> f64 {
    0.6
}
fn default_similar_ratio() -> f64 {
    0.8
}
fn default_report_name_ratio() -> f64 {
    0.8
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            size_ratio: default_size_ratio(),
            structure_proportion: default_structure_proportion(),
            similar_ratio: default_similar_ratio(),
            report_name_ratio: default_report_name_ratio(),
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_rules_reject_vcs_dirs_anywhere_in_path() {
        let rules = IgnoreRules::default();
        assert!(!rules.check_path("Lab03/.git/HEAD"));
        assert!(!rules.check_path("sub/.idea/workspace.xml"));
        assert!(!rules.check_path("project/target/classes/Main.class"));
        assert!(rules.check_path("Lab03/src/Main.java"));
    }

    #[test]
    fn ignore_rules_reject_by_suffix_only() {
        let rules = IgnoreRules::default();
        assert!(!rules.check_file("Main.class"));
        assert!(!rules.check_file(".gitignore"));
        assert!(!rules.check_file(".DS_Store"));
        assert!(rules.check_file("Main.java"));
        // Suffix match is positional, not substring
        assert!(rules.check_file("classes.txt"));
    }

    #[test]
    fn allow_requires_both_predicates() {
        let rules = IgnoreRules::default();
        assert!(rules.allow("Lab03/src/Main.java", "Main.java"));
        assert!(!rules.allow("Lab03/.git/config", "config"));
        assert!(!rules.allow("Lab03/src/Main.class", "Main.class"));
    }

    #[test]
    fn config_parses_partial_toml_with_defaults() {
        let toml_str = r#"
            [thresholds]
            size_ratio = 0.25
        "#;
        let config: NormlabConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.thresholds.size_ratio, 0.25);
        assert_eq!(config.thresholds.similar_ratio, 0.8);
        assert!(config.ignore.dirs.contains(&".git".to_string()));
    }
}
