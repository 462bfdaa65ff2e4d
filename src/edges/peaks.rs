//! 1D peak finding with height and prominence criteria.
use serde::{Deserialize, Serialize};

/// Default minimum peak height for edge detection on scaled derivatives.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakParams {
    /// Minimum peak value (inclusive).
    pub threshold: f64,
    /// Optional minimum prominence (inclusive).
    pub prominence: Option<f64>,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            prominence: None,
        }
    }
}

impl PeakParams {
    pub const fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            prominence: None,
        }
    }
}

/// Indices of local maxima of `x` that pass the criteria in `params`.
///
/// A maximum is a sample (or a flat run of equal samples) strictly higher
/// than both neighbours; flat runs report their first index. The first and
/// last samples are never peaks.
pub fn find_peaks(x: &[f64], params: &PeakParams) -> Vec<usize> {
    let mut peaks: Vec<usize> = local_maxima(x)
        .into_iter()
        .filter(|&i| x[i] >= params.threshold)
        .collect();

    if let Some(min_prominence) = params.prominence {
        let prominences = peak_prominences(x, &peaks);
        peaks = peaks
            .into_iter()
            .zip(prominences)
            .filter(|&(_, p)| p >= min_prominence)
            .map(|(i, _)| i)
            .collect();
    }
    peaks
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut out = Vec::new();
    if x.len() < 3 {
        return out;
    }
    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                out.push(i);
                i = ahead;
            }
        }
        i += 1;
    }
    out
}

/// Prominence of each peak: its height above the higher of the two lowest
/// points reached before meeting a higher sample on either side.
pub fn peak_prominences(x: &[f64], peaks: &[usize]) -> Vec<f64> {
    peaks
        .iter()
        .map(|&peak| {
            let height = x[peak];

            let mut left_min = height;
            for &v in x[..=peak].iter().rev() {
                if v > height {
                    break;
                }
                left_min = left_min.min(v);
            }

            let mut right_min = height;
            for &v in &x[peak..] {
                if v > height {
                    break;
                }
                right_min = right_min.min(v);
            }

            height - left_min.max(right_min)
        })
        .collect()
}
