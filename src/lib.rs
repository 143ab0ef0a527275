//! # normlab — Lab Submission Normalizer and Similarity Screener
//!
//! Ingests a batch of student-submitted archives for one lab assignment,
//! normalizes every submission into a canonical directory layout, and flags
//! pairs of submissions that look suspiciously alike.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       LabBatch                           │
//! │  ┌─────────┐  ┌──────────────┐  ┌────────────────────┐   │
//! │  │ Roster  │  │  Normalizer  │  │ SimilarityAnalyzer │   │
//! │  │ (CSV)   │  │  (per sub-   │  │ (all-pairs scan)   │   │
//! │  └────┬────┘  │   mission)   │  └─────────┬──────────┘   │
//! │       │       └──────┬───────┘            │              │
//! │  ┌────▼──────────────▼────────────────────▼───────────┐  │
//! │  │ Container (zip/rar) → PathCodec → IgnoreRules →    │  │
//! │  │ ReportSlot / SourceLedger → collapse passes →      │  │
//! │  │ aspect flags → groups → CSV report                 │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The normalizer walks each submission's archive tree recursively (nested
//! zip/rar containers included), repairs garbled filename encodings, applies
//! ignore rules, isolates the single graded report document, and collapses
//! redundant wrapper directories. The analyzer then compares every pair of
//! submissions across three independent signals — aggregate size, file
//! structure, report filename — and clusters flagged pairs into groups.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod ingest;
pub mod normalize;
pub mod report;
pub mod student;

// Re-exports for convenience
pub use analyze::{Aspects, SimilarityAnalyzer, SimilarityGroup};
pub use batch::LabBatch;
pub use config::{IgnoreRules, NormlabConfig, SimilarityThresholds};
pub use normalize::{Assignment, Diagnostic, DiagnosticKind, Normalizer};
pub use student::{Roster, Student};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormlabError {
    #[error("Container error: {0}")]
    Container(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Roster error: {0}")]
    Roster(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NormlabResult<T> = Result<T, NormlabError>;
