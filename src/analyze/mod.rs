//! Similarity analyzer — all-pairs scan over normalized submissions
//!
//! Every pair of assignments is scored on three independent signals:
//!
//! 1. **size** — total extracted bytes within 10% of the left operand's;
//! 2. **structure** — most paths of the larger ledger have a close lexical
//!    counterpart in the smaller one;
//! 3. **report name** — the retained report filenames, with the owning
//!    student's name and number stripped out, are nearly identical.
//!
//! Flagged pairs are clustered into groups per aspect combination. The
//! clustering is a single append-only pass in pair-discovery order and is
//! deliberately non-transitive: a pair matching an existing group only
//! through its *second* member starts a new group instead of merging. See
//! DESIGN.md before changing it.

pub mod ratio;

pub use ratio::similarity_ratio;

use crate::config::SimilarityThresholds;
use crate::normalize::{Assignment, SourceLedger};
use crate::student::Student;
use rayon::prelude::*;
use tracing::warn;

// ─── Aspects ───────────────────────────────────────────────────────

/// The similarity aspects found true for one pair of submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aspects {
    pub size: bool,
    pub structure: bool,
    pub report_name: bool,
}

impl Aspects {
    pub fn any(&self) -> bool {
        self.size || self.structure || self.report_name
    }

    /// Human-readable rendering, fixed order: size, structure, report name.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.size {
            parts.push("similar size");
        }
        if self.structure {
            parts.push("similar structure");
        }
        if self.report_name {
            parts.push("similar report name");
        }
        parts.join(", ")
    }
}

/// One reportable cluster: an aspect combination plus the submissions
/// (by index into the analyzed slice) sharing it
#[derive(Debug, Clone)]
pub struct SimilarityGroup {
    pub aspects: Aspects,
    pub members: Vec<usize>,
}

// ─── Analyzer ──────────────────────────────────────────────────────

pub struct SimilarityAnalyzer<'a> {
    thresholds: &'a SimilarityThresholds,
}

impl<'a> SimilarityAnalyzer<'a> {
    pub fn new(thresholds: &'a SimilarityThresholds) -> Self {
        Self { thresholds }
    }

    /// All-pairs scan, `i < j`, outer loop over `i`. Pair order matters:
    /// the clustering below is anchored on the earlier member.
    pub fn analyze(&self, assignments: &[Assignment]) -> Vec<SimilarityGroup> {
        let mut groups: Vec<SimilarityGroup> = Vec::new();

        for i in 0..assignments.len() {
            for j in (i + 1)..assignments.len() {
                let aspects = self.pair_aspects(&assignments[i], &assignments[j]);
                if !aspects.any() {
                    continue;
                }
                warn!(
                    "{} ~ {}: {}",
                    assignments[i].student, assignments[j].student, aspects.describe()
                );
                record(&mut groups, aspects, i, j);
            }
        }
        groups
    }

    fn pair_aspects(&self, left: &Assignment, right: &Assignment) -> Aspects {
        Aspects {
            size: self.similar_size(&left.ledger, &right.ledger),
            structure: self.similar_structure(&left.ledger, &right.ledger),
            report_name: self.similar_report_name(left, right),
        }
    }

    /// Relative total-size difference, with the left operand's size as the
    /// denominator. Asymmetric by definition: a zero left size is never
    /// similar, whatever the right side holds.
    pub fn similar_size(&self, left: &SourceLedger, right: &SourceLedger) -> bool {
        if left.total_size() == 0 {
            return false;
        }
        let diff = left.total_size().abs_diff(right.total_size()) as f64;
        diff / (left.total_size() as f64) < self.thresholds.size_ratio
    }

    /// Greedy nearest-neighbor match of the larger ledger's paths against
    /// the smaller one's (ties on length resolve to the left operand). The
    /// match proportion is computed only from the larger side's perspective.
    pub fn similar_structure(&self, left: &SourceLedger, right: &SourceLedger) -> bool {
        if left.is_empty() || right.is_empty() {
            return false;
        }
        let (bigger, smaller) = if right.len() > left.len() {
            (right, left)
        } else {
            (left, right)
        };

        let bigger_paths: Vec<&str> = bigger.paths().collect();
        let smaller_paths: Vec<&str> = smaller.paths().collect();

        // Each path's best match is independent, so the scan parallelizes
        // without disturbing the result
        let matched = bigger_paths
            .par_iter()
            .filter(|path| {
                let best = smaller_paths
                    .iter()
                    .map(|other| similarity_ratio(path, other))
                    .fold(0.0_f64, f64::max);
                best > self.thresholds.similar_ratio
            })
            .count();

        matched as f64 / bigger_paths.len() as f64 > self.thresholds.structure_proportion
    }

    /// Compare retained report filenames with the owning student's identity
    /// stripped out. Submissions without a report never match.
    fn similar_report_name(&self, left: &Assignment, right: &Assignment) -> bool {
        let (Some(l_name), Some(r_name)) = (left.report.filename(), right.report.filename())
        else {
            return false;
        };
        let l_stripped = strip_identity(l_name, &left.student);
        let r_stripped = strip_identity(r_name, &right.student);
        similarity_ratio(&l_stripped, &r_stripped) > self.thresholds.report_name_ratio
    }
}

/// Lower-case a report filename and remove the student's display name and
/// number as plain substrings.
fn strip_identity(filename: &str, student: &Student) -> String {
    let mut stripped = filename.to_lowercase();
    for needle in [student.name.to_lowercase(), student.number.to_lowercase()] {
        if !needle.is_empty() {
            stripped = stripped.replace(&needle, "");
        }
    }
    stripped
}

/// Append-only clustering anchored on the earlier member: a flagged pair
/// `(i, j)` joins the first group with the same aspects that already
/// contains `i`; otherwise it founds a new group.
fn record(groups: &mut Vec<SimilarityGroup>, aspects: Aspects, i: usize, j: usize) {
    for group in groups.iter_mut() {
        if group.aspects == aspects && group.members.contains(&i) {
            if !group.members.contains(&j) {
                group.members.push(j);
            }
            return;
        }
    }
    groups.push(SimilarityGroup {
        aspects,
        members: vec![i, j],
    });
}

// ─── Tests ─────────────────────────────────────────────────────────
