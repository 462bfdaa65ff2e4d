//! Pixel-to-micrometer calibration from the SEM info bar.
//!
//! The info bar carries a numeric label (the bar's physical length in µm)
//! and a rendered scale bar. With `L` the detected bar length minus the
//! tick correction:
//!
//! - `scale = label / L` (µm per pixel),
//! - `uncertainty = label / (L - 1) - scale`, the effect of a one-pixel
//!   error in the bar length.
//!
//! A label that does not parse as an integer is a calibration failure and is
//! not retried.
mod collaborators;
mod layout;

pub use collaborators::{FixedText, LineLengthDetector, SegmentLineDetector, TextReader};
pub use layout::InfoBarLayout;

use crate::error::{MetrologyError, Result};
use crate::image::ImageU8;
use log::debug;
use serde::{Deserialize, Serialize};

/// Physical length per pixel with its quantization uncertainty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    pub um_per_px: f64,
    pub uncertainty: f64,
}

impl Scale {
    /// Scale from a bar of `bar_length_px` pixels representing `label_um` µm.
    pub fn from_bar(label_um: u32, bar_length_px: usize) -> Result<Self> {
        if label_um == 0 {
            return Err(MetrologyError::Calibration(
                "scale label must be positive".to_string(),
            ));
        }
        if bar_length_px < 2 {
            return Err(MetrologyError::Calibration(format!(
                "scale bar of {bar_length_px} px is too short"
            )));
        }
        let label = f64::from(label_um);
        let um_per_px = label / bar_length_px as f64;
        let uncertainty = label / (bar_length_px - 1) as f64 - um_per_px;
        Ok(Self {
            um_per_px,
            uncertainty,
        })
    }
}

/// Everything read from the info bar during calibration.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleCalibration {
    /// Raw label text returned by the reader.
    pub label: String,
    pub label_um: u32,
    /// Bar length reported by the detector, before the tick correction.
    pub detected_length_px: usize,
    pub bar_length_px: usize,
    pub scale: Scale,
}

/// Source of the scale for an image.
pub trait ScaleProvider {
    fn scale(&self, image: &ImageU8<'_>) -> Result<Scale>;

    /// Rows at the bottom of the image occupied by calibration data, to be
    /// excluded from measurement.
    fn reserved_rows(&self) -> usize {
        0
    }
}

impl ScaleProvider for Scale {
    fn scale(&self, _image: &ImageU8<'_>) -> Result<Scale> {
        Ok(*self)
    }
}

/// Derives the scale from the info bar using injected collaborators.
pub struct ScaleResolver<R, L> {
    reader: R,
    detector: L,
    layout: InfoBarLayout,
}

impl<R: TextReader, L: LineLengthDetector> ScaleResolver<R, L> {
    pub fn new(reader: R, detector: L, layout: InfoBarLayout) -> Self {
        Self {
            reader,
            detector,
            layout,
        }
    }

    pub fn layout(&self) -> &InfoBarLayout {
        &self.layout
    }

    /// Scale and uncertainty of `image`.
    pub fn resolve_scale(&self, image: &ImageU8<'_>) -> Result<Scale> {
        self.calibrate(image).map(|c| c.scale)
    }

    /// Like [`ScaleResolver::resolve_scale`], keeping the intermediate readings.
    pub fn calibrate(&self, image: &ImageU8<'_>) -> Result<ScaleCalibration> {
        let info_bar = self.layout.info_bar(image)?;

        let label = self
            .reader
            .read_text(&self.layout.label_view(&info_bar)?)?;
        let label_um: u32 = label.trim().parse().map_err(|_| {
            MetrologyError::Calibration(format!("scale label {label:?} is not an integer"))
        })?;

        let detected_length_px = self
            .detector
            .detect_line_length(&self.layout.scale_bar_view(&info_bar)?)?;
        let bar_length_px = detected_length_px
            .checked_sub(self.layout.tick_correction_px)
            .ok_or_else(|| {
                MetrologyError::Calibration(format!(
                    "detected bar of {detected_length_px} px is shorter than the tick correction of {} px",
                    self.layout.tick_correction_px
                ))
            })?;

        let scale = Scale::from_bar(label_um, bar_length_px)?;
        debug!(
            "ScaleResolver: label={label_um} um bar={bar_length_px} px (detected {detected_length_px}) scale={:.6} +/- {:.6} um/px",
            scale.um_per_px, scale.uncertainty
        );
        Ok(ScaleCalibration {
            label,
            label_um,
            detected_length_px,
            bar_length_px,
            scale,
        })
    }
}

impl<R: TextReader, L: LineLengthDetector> ScaleProvider for ScaleResolver<R, L> {
    fn scale(&self, image: &ImageU8<'_>) -> Result<Scale> {
        self.resolve_scale(image)
    }

    fn reserved_rows(&self) -> usize {
        self.layout.bar_height
    }
}
