use super::stats::std_dev;
use crate::edges::{leading_edges, trailing_edges, PeakParams};
use crate::error::{MetrologyError, Result};
use crate::filter::SmoothingParams;
use crate::profile::{derivative, DEFAULT_DERIVATIVE_SCALE};
use log::debug;
use serde::{Deserialize, Serialize};

/// Minimum number of edges of each kind for a translation estimate.
const MIN_EDGES: usize = 4;

/// Translation values in micrometers and their spread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationMeasurement {
    pub translations_um: Vec<f64>,
    pub std_dev_um: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TranslationParams {
    pub derivative_scale: f64,
    pub smoothing: SmoothingParams,
    pub peaks: PeakParams,
}

impl Default for TranslationParams {
    fn default() -> Self {
        Self {
            derivative_scale: DEFAULT_DERIVATIVE_SCALE,
            smoothing: SmoothingParams::default(),
            peaks: PeakParams::default(),
        }
    }
}

/// Translation of the pattern described by `profile`.
///
/// The derivative of the profile is smoothed before edge detection; the
/// edges then go through [`translation_from_edges`].
pub fn translation(
    profile: &[f64],
    scale: f64,
    params: &TranslationParams,
) -> Result<TranslationMeasurement> {
    let dy = params
        .smoothing
        .apply(&derivative(profile, params.derivative_scale))?;
    let leading = leading_edges(&dy, &params.peaks);
    let trailing = trailing_edges(&dy, &params.peaks);
    debug!(
        "translation: {} leading / {} trailing edges",
        leading.len(),
        trailing.len()
    );
    translation_from_edges(&leading, &trailing, scale)
}

/// Number of translation values produced from `leading_count` leading edges:
/// `floor(leading_count / 2) - 1`.
pub fn translation_count(leading_count: usize) -> usize {
    (leading_count / 2).saturating_sub(1)
}

/// Translation from detected edges.
///
/// The test pattern alternates two line layers, so the drift shows up in the
/// gaps of every second line pair. With `le`/`te` the leading/trailing edges
/// and `i` in `[0, floor(len(le) / 2) - 1)`:
///
/// `T_i = ((le[2i+2] - te[2i+1]) - (le[2i+1] - te[2i])) * scale / 2`
pub fn translation_from_edges(
    leading: &[usize],
    trailing: &[usize],
    scale: f64,
) -> Result<TranslationMeasurement> {
    let n = translation_count(leading.len());
    if leading.len() < MIN_EDGES || trailing.len() < MIN_EDGES.max(2 * n) {
        return Err(MetrologyError::InsufficientEdges {
            required: MIN_EDGES.max(2 * n),
            leading: leading.len(),
            trailing: trailing.len(),
        });
    }

    let at = |edges: &[usize], i: usize| edges[i] as f64;
    let translations_um: Vec<f64> = (0..n)
        .map(|i| {
            let outer_gap = at(leading, 2 * (i + 1)) - at(trailing, 2 * i + 1);
            let inner_gap = at(leading, 2 * i + 1) - at(trailing, 2 * i);
            (outer_gap - inner_gap) * scale / 2.0
        })
        .collect();
    let std_dev_um = std_dev(&translations_um);
    Ok(TranslationMeasurement {
        translations_um,
        std_dev_um,
    })
}
