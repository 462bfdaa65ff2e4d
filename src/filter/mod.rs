//! Zero-phase low-pass smoothing.
//!
//! Derivative profiles and per-row profiles are denoised with a digital
//! Butterworth low-pass run forward and backward (`filtfilt`), which cancels
//! the phase response so edge peaks stay at their unfiltered positions.
//!
//! - [`Butterworth`]: transfer-function design (`b`, `a`) for a given order and
//!   cutoff normalized to Nyquist (`0 < cutoff < 1`).
//! - [`lfilter`] / [`lfilter_zi`]: direct-form II transposed IIR filtering and
//!   its steady-state initial conditions.
//! - [`filtfilt`]: forward-backward filtering with odd extension of
//!   `3 × max(len(a), len(b))` samples on each side.
mod butterworth;
mod iir;

pub use butterworth::Butterworth;
pub use iir::{filtfilt, lfilter, lfilter_zi};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Order and normalized cutoff of the smoothing filter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    pub order: usize,
    /// Cutoff as a fraction of the Nyquist frequency.
    pub cutoff: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            order: 3,
            cutoff: 0.1,
        }
    }
}

impl SmoothingParams {
    pub const fn new(order: usize, cutoff: f64) -> Self {
        Self { order, cutoff }
    }

    pub fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        smooth(data, self.order, self.cutoff)
    }
}

/// Zero-phase Butterworth low-pass of `data`; output has the input length.
pub fn smooth(data: &[f64], order: usize, cutoff: f64) -> Result<Vec<f64>> {
    Butterworth::lowpass(order, cutoff)?.filtfilt(data)
}
