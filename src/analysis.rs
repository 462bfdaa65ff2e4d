//! End-to-end line measurement.
//!
//! [`LineAnalyzer`] chains the stages on one image:
//!
//! 1. scale from the [`ScaleProvider`] (info bar or a fixed value),
//! 2. crop of the configured margins plus the rows reserved by the provider,
//! 3. mean profile over `mean_rows` and its derivative,
//! 4. leading / trailing edges,
//! 5. line widths, then the optional translation, rotation and dominant
//!    angle estimates.
//!
//! Any stage failure aborts the run; nothing is replaced by defaults.
use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::edges::{Edges, PeakParams};
use crate::error::Result;
use crate::filter::SmoothingParams;
use crate::image::{CropMargins, ImageU8, ImageView};
use crate::metrics::{
    dominant_angle, line_widths, rotation, translation, LineMeasurement, LineWidthParams,
    RotationEstimate, TranslationMeasurement, TranslationParams,
};
use crate::profile::{derivative, mean_profile_oriented, ProfileParams};
use crate::scale::{Scale, ScaleProvider};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisParams {
    /// Margins removed before profiling, on top of the provider's reserved rows.
    pub crop: CropMargins,
    /// Row band `[start, end)` of the cropped image averaged into the mean profile.
    pub mean_rows: (usize, usize),
    pub profile: ProfileParams,
    /// Derivative smoothing; always used by translation and rotation.
    pub smoothing: SmoothingParams,
    pub peaks: PeakParams,
    pub line_width: LineWidthParams,
    /// Smooth the derivative before line-edge detection.
    pub smooth_derivative: bool,
    pub estimate_translation: bool,
    pub estimate_rotation: bool,
    /// Radon-based tilt of the measurement area.
    pub estimate_angle: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            crop: CropMargins::default(),
            mean_rows: (0, 20),
            profile: ProfileParams::default(),
            smoothing: SmoothingParams::default(),
            peaks: PeakParams::default(),
            line_width: LineWidthParams::default(),
            smooth_derivative: false,
            estimate_translation: true,
            estimate_rotation: false,
            estimate_angle: false,
        }
    }
}

impl AnalysisParams {
    pub fn translation_params(&self) -> TranslationParams {
        TranslationParams {
            derivative_scale: self.profile.derivative_scale,
            smoothing: self.smoothing,
            peaks: self.peaks,
        }
    }
}

/// Result of one [`LineAnalyzer::analyze`] run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementReport {
    /// Size of the cropped measurement area.
    pub width: usize,
    pub height: usize,
    pub scale: Scale,
    pub edges: Edges,
    pub lines: Vec<LineMeasurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationMeasurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_angle_deg: Option<f64>,
    pub timing: TimingBreakdown,
}

pub struct LineAnalyzer<S> {
    provider: S,
    params: AnalysisParams,
}

impl<S: ScaleProvider> LineAnalyzer<S> {
    pub fn new(provider: S, params: AnalysisParams) -> Self {
        Self { provider, params }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn provider(&self) -> &S {
        &self.provider
    }

    pub fn analyze(&self, image: &ImageU8<'_>) -> Result<MeasurementReport> {
        let t0 = Instant::now();
        let mut timing = TimingBreakdown::default();
        let params = &self.params;

        let start = Instant::now();
        let scale = self.provider.scale(image)?;
        timing.record_since("scale", start);

        let margins = CropMargins {
            bottom: params.crop.bottom + self.provider.reserved_rows(),
            ..params.crop
        };
        let area = image.crop(margins)?;
        debug!(
            "LineAnalyzer: image {}x{} -> measurement area {}x{}, scale {:.6} um/px",
            image.width(),
            image.height(),
            area.width(),
            area.height(),
            scale.um_per_px
        );

        let start = Instant::now();
        let (row_start, row_end) = params.mean_rows;
        let profile = mean_profile_oriented(&area, row_start..row_end, params.profile.invert)?;
        let mut dy = derivative(&profile, params.profile.derivative_scale);
        if params.smooth_derivative {
            dy = params.smoothing.apply(&dy)?;
        }
        timing.record_since("profile", start);

        let start = Instant::now();
        let edges = Edges::detect(&dy, &params.peaks);
        timing.record_since("edges", start);
        debug!(
            "LineAnalyzer: {} leading / {} trailing edges",
            edges.leading.len(),
            edges.trailing.len()
        );

        let start = Instant::now();
        let width_params = LineWidthParams {
            invert: params.profile.invert,
            ..params.line_width
        };
        let lines = line_widths(
            &area,
            &profile,
            &edges.leading,
            &edges.trailing,
            scale.um_per_px,
            &width_params,
        )?;
        timing.record_since("lineWidths", start);

        let translation = if params.estimate_translation {
            let start = Instant::now();
            let t = translation(&profile, scale.um_per_px, &params.translation_params())?;
            timing.record_since("translation", start);
            Some(t)
        } else {
            None
        };

        let rotation = if params.estimate_rotation {
            let start = Instant::now();
            let r = rotation(
                &area,
                scale.um_per_px,
                params.profile.invert,
                &params.translation_params(),
            )?;
            timing.record_since("rotation", start);
            Some(r)
        } else {
            None
        };

        let dominant_angle_deg = if params.estimate_angle {
            let start = Instant::now();
            let angle = dominant_angle(&area)?;
            timing.record_since("dominantAngle", start);
            Some(angle)
        } else {
            None
        };

        timing.total_ms = elapsed_ms(t0);
        debug!(
            "LineAnalyzer: {} lines in {:.3} ms",
            lines.len(),
            timing.total_ms
        );

        Ok(MeasurementReport {
            width: area.width(),
            height: area.height(),
            scale,
            edges,
            lines,
            translation,
            rotation,
            dominant_angle_deg,
            timing,
        })
    }
}
