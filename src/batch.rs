//! Batch orchestration — one lab package in, normalized trees and a
//! similarity report out
//!
//! The lab package is a zip holding one nested archive per student, each
//! named with the student's fixed-width registration number. Submissions
//! are normalized independently: a corrupt archive fails that submission
//! alone, never the batch.

use crate::analyze::{SimilarityAnalyzer, SimilarityGroup};
use crate::config::NormlabConfig;
use crate::ingest::{open_nested, Container, ZipContainer};
use crate::normalize::{Assignment, Diagnostic, DiagnosticKind, Normalizer};
use crate::report;
use crate::student::{Roster, Student, STUDENT_ID_WIDTH};
use crate::{NormlabError, NormlabResult};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct LabBatch {
    lab_name: String,
    base_path: PathBuf,
    assignments: Vec<Assignment>,
    diagnostics: Vec<Diagnostic>,
}

impl LabBatch {
    /// Unpack and normalize every submission of a lab package. The
    /// normalized trees land in a directory named after the package, next
    /// to it.
    pub fn process_package(
        package_path: &Path,
        roster: &Roster,
        config: &NormlabConfig,
    ) -> NormlabResult<Self> {
        let lab_name = package_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                NormlabError::Container(format!("bad package path: {}", package_path.display()))
            })?;
        let base_path = package_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&lab_name);
        // Package naming convention puts the two-digit lab number at 3..5
        let lab_num = lab_name.get(3..5).unwrap_or("00").to_string();

        info!("Processing package {lab_name}");
        let mut package = ZipContainer::open(package_path)?;

        let mut assignments = Vec::new();
        let mut diagnostics = Vec::new();

        for index in 0..package.entry_count() {
            let meta = package.entry(index).clone();
            if meta.is_dir {
                continue;
            }

            let number: String = meta.name.chars().take(STUDENT_ID_WIDTH).collect();
            let student = match roster.get(&number) {
                Some(name) => Student::new(number, name),
                None => {
                    let fallback = derive_display_name(&meta.name);
                    let detail = format!(
                        "student number {number} not found in roster, using name from \
                         submission: {fallback}"
                    );
                    warn!("{detail}");
                    diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::RosterMiss,
                        detail,
                    });
                    Student::new(number, fallback)
                }
            };

            info!("Processing assignment {student}");
            let mut assignment = Assignment::new(&lab_num, student, &base_path);
            match normalize_submission(&mut package, index, &meta.name, &mut assignment, config) {
                Ok(mut diags) => {
                    diagnostics.append(&mut diags);
                    let (files, bytes) = tree_stats(assignment.src_path());
                    info!("{}: {files} files, {bytes} bytes extracted", assignment.student);
                }
                Err(e) => {
                    let detail = format!("{}: submission failed: {e}", assignment.student);
                    warn!("{detail}");
                    diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::SubmissionFailed,
                        detail,
                    });
                }
            }
            assignments.push(assignment);
        }

        Ok(Self {
            lab_name,
            base_path,
            assignments,
            diagnostics,
        })
    }

    /// Run the all-pairs similarity check and, when anything was flagged,
    /// write the CSV report.
    pub fn check(&self, config: &NormlabConfig) -> NormlabResult<Vec<SimilarityGroup>> {
        info!("Checking {} assignments for similarity", self.assignments.len());
        let analyzer = SimilarityAnalyzer::new(&config.thresholds);
        let groups = analyzer.analyze(&self.assignments);

        if !groups.is_empty() {
            let report_path = Path::new(&config.report_path);
            info!("Exporting similarity report to {}", report_path.display());
            report::write_csv(report_path, &groups, &self.assignments)?;
        }
        Ok(groups)
    }

    pub fn lab_name(&self) -> &str {
        &self.lab_name
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn normalize_submission(
    package: &mut ZipContainer,
    index: usize,
    entry_name: &str,
    assignment: &mut Assignment,
    config: &NormlabConfig,
) -> NormlabResult<Vec<Diagnostic>> {
    let data = package.read_entry(index)?;
    let stem = archive_stem(entry_name);
    let stem = stem.rsplit('/').next().unwrap_or(stem);
    let mut container = open_nested(entry_name, stem, data)?;

    let mut normalizer = Normalizer::new(&config.ignore);
    normalizer.normalize(container.as_mut(), assignment)?;
    Ok(normalizer.into_diagnostics())
}

/// Submission entry names look like `{number}-{display name}.zip`; when the
/// roster has no match, the display name is taken from the entry itself.
fn derive_display_name(entry_name: &str) -> String {
    archive_stem(entry_name)
        .chars()
        .skip(STUDENT_ID_WIDTH + 1)
        .collect()
}

/// File and byte count of a materialized tree; a submission that produced
/// no directory counts as empty.
fn tree_stats(root: &Path) -> (usize, u64) {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .fold((0, 0), |(files, bytes), entry| {
            (
                files + 1,
                bytes + entry.metadata().map(|m| m.len()).unwrap_or(0),
            )
        })
}

fn archive_stem(entry_name: &str) -> &str {
    entry_name
        .strip_suffix(".zip")
        .or_else(|| entry_name.strip_suffix(".rar"))
        .unwrap_or(entry_name)
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_derives_from_entry_name() {
        assert_eq!(
            derive_display_name("2021302181234-zs.zip"),
            "zs".to_string()
        );
        assert_eq!(
            derive_display_name("2021302181234-zhang san.rar"),
            "zhang san".to_string()
        );
    }
}
