//! Edge detection on derivative profiles, plus image gradients.
//!
//! - [`leading_edges`] / [`trailing_edges`]: thresholded peaks of the
//!   derivative and of its negation. Positions index into the derivative
//!   profile and are returned in ascending order. Pairing leading with
//!   trailing edges is left to [`crate::metrics`].
//! - [`find_peaks`]: the underlying 1D peak finder (height and optional
//!   prominence criteria, plateaus resolved to their first sample).
//! - [`sobel_gradients`]: per-pixel gradients feeding the scale-bar segment
//!   extractor.
//!
//! There is no spacing constraint between peaks; a noisy derivative can yield
//! several peaks per physical edge, so either smooth it or raise the
//! threshold.

pub mod grad;
pub mod peaks;

pub use grad::{sobel_gradients, Grad};
pub use peaks::{find_peaks, peak_prominences, PeakParams};

use serde::{Deserialize, Serialize};

/// Polarity of an edge in the derivative profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Positive derivative peak: start of a line.
    Leading,
    /// Negative derivative peak: end of a line.
    Trailing,
}

/// Leading and trailing edge positions detected on one derivative profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edges {
    pub leading: Vec<usize>,
    pub trailing: Vec<usize>,
}

impl Edges {
    pub fn detect(derivative: &[f64], params: &PeakParams) -> Self {
        Self {
            leading: leading_edges(derivative, params),
            trailing: trailing_edges(derivative, params),
        }
    }

    pub fn of_kind(&self, kind: EdgeKind) -> &[usize] {
        match kind {
            EdgeKind::Leading => &self.leading,
            EdgeKind::Trailing => &self.trailing,
        }
    }
}

/// Local maxima of `derivative` with value `>= params.threshold`.
pub fn leading_edges(derivative: &[f64], params: &PeakParams) -> Vec<usize> {
    find_peaks(derivative, params)
}

/// Local maxima of `-derivative` with value `>= params.threshold`.
pub fn trailing_edges(derivative: &[f64], params: &PeakParams) -> Vec<usize> {
    let negated: Vec<f64> = derivative.iter().map(|v| -v).collect();
    find_peaks(&negated, params)
}
