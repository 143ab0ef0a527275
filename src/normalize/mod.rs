//! Archive normalizer — one submission in, one canonical tree out
//!
//! Walks a submission's archive tree in container iteration order, recursing
//! into nested zip/rar containers, and routes every accepted entry either to
//! the report slot (graded `.doc`/`.docx` document, extracted to the lab
//! root under a canonical name) or to the source ledger (everything else,
//! materialized under the submission root). Wrapper-directory collapse
//! passes run after each container is exhausted.
//!
//! Warnings are accumulated as [`Diagnostic`]s and returned alongside the
//! result; the normalizer has no side effects beyond the materialized tree
//! and tracing output.

pub mod collapse;
pub mod ledger;
pub mod report_slot;

pub use ledger::SourceLedger;
pub use report_slot::ReportSlot;

use crate::config::IgnoreRules;
use crate::ingest::{self, Container};
use crate::student::Student;
use crate::NormlabResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

// ─── Diagnostics ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Student identifier not present in the roster
    RosterMiss,
    /// More than one report document in one submission
    MultipleReports,
    /// A submission's container could not be processed
    SubmissionFailed,
}

/// One recoverable problem observed while processing a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub detail: String,
}

// ─── Assignment ────────────────────────────────────────────────────

/// One student's normalized submission: identity, ledger, report slot, and
/// the canonical paths everything was extracted under. Created when the
/// submission begins processing; read-only once its tree is fully walked.
#[derive(Debug)]
pub struct Assignment {
    pub student: Student,
    pub ledger: SourceLedger,
    pub report: ReportSlot,
    name: String,
    base_path: PathBuf,
    src_path: PathBuf,
}

impl Assignment {
    pub fn new(lab_num: &str, student: Student, base_path: &Path) -> Self {
        let name = format!("Lab{lab_num}-{student}");
        let src_path = base_path.join(&name);
        Self {
            student,
            ledger: SourceLedger::new(),
            report: ReportSlot::new(),
            name,
            base_path: base_path.to_path_buf(),
            src_path,
        }
    }

    /// Canonical submission name, `Lab{num}-{number}-{name}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lab root directory shared by all submissions of the batch.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// This submission's normalized source tree root.
    pub fn src_path(&self) -> &Path {
        &self.src_path
    }
}

// ─── Normalizer ────────────────────────────────────────────────────

pub struct Normalizer<'a> {
    rules: &'a IgnoreRules,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Normalizer<'a> {
    pub fn new(rules: &'a IgnoreRules) -> Self {
        Self {
            rules,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Walk the submission's archive tree and materialize the normalized
    /// layout under `assignment.src_path()`.
    pub fn normalize(
        &mut self,
        container: &mut dyn Container,
        assignment: &mut Assignment,
    ) -> NormlabResult<()> {
        let base = container.base_name().to_string();
        let src_path = assignment.src_path().to_path_buf();

        self.walk(container, assignment, &src_path)?;

        // A submission whose only content was ignored produces no directory
        if src_path.exists() {
            collapse::collapse_single_src(&src_path)?;
            collapse::collapse_single_key(&src_path, &base)?;
        }
        Ok(())
    }

    fn walk(
        &mut self,
        container: &mut dyn Container,
        assignment: &mut Assignment,
        out_root: &Path,
    ) -> NormlabResult<()> {
        let base = container.base_name().to_string();

        for index in 0..container.entry_count() {
            let meta = container.entry(index).clone();
            if meta.is_dir {
                // Directories only materialize by containing an accepted file
                continue;
            }

            // Upload-platform artifact: a duplicate document named after the
            // archive itself, injected by the submission system
            if is_platform_duplicate(&meta.name, &base) {
                continue;
            }

            let rel = strip_redundant_prefix(&meta.name, &base);
            let candidate = out_root.join(rel);
            let filename = rel
                .rsplit('/')
                .next()
                .unwrap_or(rel)
                .to_string();

            // Predicates see the submission-relative path so tokens in the
            // machine path (a `target` somewhere above the lab root) cannot
            // blanket-reject a submission
            if !self.rules.allow(rel, &filename) {
                continue;
            }

            if let Some(ext) = document_extension(&filename) {
                self.take_report(container, index, &filename, meta.size, ext, assignment)?;
            } else if is_archive(&filename) {
                self.recurse(container, index, &filename, &candidate, assignment)?;
            } else {
                let data = container.read_entry(index)?;
                let rel_to_src = candidate
                    .strip_prefix(assignment.src_path())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_else(|_| rel.to_string());
                assignment.ledger.append(rel_to_src, meta.size);
                if let Some(parent) = candidate.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&candidate, data)?;
            }
        }
        Ok(())
    }

    /// Offer a `.doc`/`.docx` entry to the report slot; on acceptance the
    /// bytes land at the lab root under the canonical submission name.
    fn take_report(
        &mut self,
        container: &mut dyn Container,
        index: usize,
        filename: &str,
        size: u64,
        ext: &str,
        assignment: &mut Assignment,
    ) -> NormlabResult<()> {
        if assignment.report.is_set() {
            self.push(
                DiagnosticKind::MultipleReports,
                format!(
                    "{}: multiple report documents, keeping the larger one",
                    assignment.student
                ),
            );
        }
        if assignment.report.cmp_update(filename, size) {
            let data = container.read_entry(index)?;
            fs::create_dir_all(assignment.base_path())?;
            let target = assignment
                .base_path()
                .join(format!("{}{}", assignment.name(), ext));
            fs::write(target, data)?;
        }
        Ok(())
    }

    /// Open a nested container and walk it with the same rules, rooted at
    /// the candidate path minus its extension. The child container drops on
    /// every exit path, failures included.
    fn recurse(
        &mut self,
        container: &mut dyn Container,
        index: usize,
        filename: &str,
        candidate: &Path,
        assignment: &mut Assignment,
    ) -> NormlabResult<()> {
        let data = container.read_entry(index)?;
        let stem = &filename[..filename.len() - 4];
        let child_root = candidate.with_extension("");

        let mut child = ingest::open_nested(filename, stem, data)?;
        self.walk(child.as_mut(), assignment, &child_root)?;

        if child_root.exists() {
            collapse::collapse_single_key(&child_root, child.base_name())?;
        }
        Ok(())
    }

    fn push(&mut self, kind: DiagnosticKind, detail: String) {
        warn!("{detail}");
        self.diagnostics.push(Diagnostic { kind, detail });
    }
}

// ─── Entry classification ──────────────────────────────────────────

fn document_extension(filename: &str) -> Option<&'static str> {
    if filename.ends_with(".docx") {
        Some(".docx")
    } else if filename.ends_with(".doc") {
        Some(".doc")
    } else {
        None
    }
}

fn is_archive(filename: &str) -> bool {
    filename.ends_with(".zip") || filename.ends_with(".rar")
}

/// An entry whose name embeds the archive's own base name immediately before
/// a trailing document extension is an upload-system artifact, not content.
fn is_platform_duplicate(name: &str, base: &str) -> bool {
    if base.is_empty() {
        return false;
    }
    [".docx", ".doc"]
        .iter()
        .filter_map(|ext| name.strip_suffix(ext))
        .any(|stem| stem.ends_with(base))
}

/// Strip leading directory segments equal to the archive's own base name,
/// collapsing `HW1/HW1/file` down to `file` before extraction.
fn strip_redundant_prefix<'n>(name: &'n str, base: &str) -> &'n str {
    let mut rel = name;
    while let Some(rest) = rel.strip_prefix(base).and_then(|r| r.strip_prefix('/')) {
        rel = rest;
    }
    rel
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_duplicate_matches_base_before_doc_extension() {
        assert!(is_platform_duplicate("2021302181234-zs.doc", "2021302181234-zs"));
        assert!(is_platform_duplicate("extra/2021302181234-zs.docx", "2021302181234-zs"));
        assert!(!is_platform_duplicate("report.docx", "2021302181234-zs"));
        assert!(!is_platform_duplicate("2021302181234-zs.pdf", "2021302181234-zs"));
    }

    #[test]
    fn redundant_prefix_strips_repeatedly() {
        assert_eq!(strip_redundant_prefix("HW1/HW1/src/Main.java", "HW1"), "src/Main.java");
        assert_eq!(strip_redundant_prefix("HW1/Main.java", "HW1"), "Main.java");
        assert_eq!(strip_redundant_prefix("Main.java", "HW1"), "Main.java");
        // Only whole leading segments are stripped
        assert_eq!(strip_redundant_prefix("HW10/Main.java", "HW1"), "HW10/Main.java");
    }

    #[test]
    fn document_extension_prefers_docx() {
        assert_eq!(document_extension("report.docx"), Some(".docx"));
        assert_eq!(document_extension("report.doc"), Some(".doc"));
        assert_eq!(document_extension("report.pdf"), None);
    }
}
