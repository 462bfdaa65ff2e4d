//! Error taxonomy for the measurement pipeline.
//!
//! Every stage fails fast: an inconsistency is reported by the stage that
//! detects it and nothing downstream substitutes a default value. Batch
//! callers are expected to catch errors per image.
use thiserror::Error;

/// Errors raised by the profile, edge, scale and metric stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetrologyError {
    /// Scale-bar label or bar length unusable for calibration.
    #[error("calibration failed: {0}")]
    Calibration(String),
    /// Zero-variance row or profile, normalization would divide by zero.
    #[error("degenerate profile: min {min} equals max {max}")]
    DegenerateProfile { min: f64, max: f64 },
    #[error("empty row range [{start}, {end})")]
    EmptyRange { start: usize, end: usize },
    #[error("row {row} outside image of height {height}")]
    RowOutOfBounds { row: usize, height: usize },
    #[error("edge count mismatch: {leading} leading vs {trailing} trailing")]
    EdgeCountMismatch { leading: usize, trailing: usize },
    #[error("line {index}: trailing edge {trailing} does not follow leading edge {leading}")]
    MisorderedEdges {
        index: usize,
        leading: usize,
        trailing: usize,
    },
    #[error(
        "insufficient edges: need {required} of each kind, found {leading} leading and {trailing} trailing"
    )]
    InsufficientEdges {
        required: usize,
        leading: usize,
        trailing: usize,
    },
    /// Padded analysis window or crop leaves the valid range `[0, limit)`.
    #[error("window [{start}, {end}) exceeds bounds [0, {limit})")]
    WindowBounds { start: i64, end: i64, limit: usize },
    #[error("line index {index} out of range for {count} lines")]
    LineIndex { index: usize, count: usize },
    #[error("signal of length {len} too short for zero-phase filtering (need more than {min})")]
    SignalTooShort { len: usize, min: usize },
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    /// OCR or line-detection backend failure unrelated to parsing.
    #[error("collaborator failed: {0}")]
    Collaborator(String),
}

pub type Result<T> = std::result::Result<T, MetrologyError>;
