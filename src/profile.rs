//! Intensity profiles across the line pattern.
//!
//! A profile is one value per pixel column, min-max normalized to `[0, 1]`.
//! SEM images of the test patterns show bright background and dark lines, so
//! profiles are inverted by default: lines come out high.
//!
//! The derivative is a forward difference, one sample shorter than its
//! source, multiplied by a scale factor to widen its range before
//! thresholding.
use crate::error::{MetrologyError, Result};
use crate::image::ImageView;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default multiplier applied before differencing.
pub const DEFAULT_DERIVATIVE_SCALE: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileParams {
    /// Return `1 - normalized` (bright background).
    pub invert: bool,
    pub derivative_scale: f64,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            invert: true,
            derivative_scale: DEFAULT_DERIVATIVE_SCALE,
        }
    }
}

/// Min-max normalize `values` to `[0, 1]`.
///
/// Constant (or empty) input has no range to normalize by and is rejected.
pub fn normalize(values: &[f64]) -> Result<Vec<f64>> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if values.is_empty() {
        return Err(MetrologyError::DegenerateProfile { min: 0.0, max: 0.0 });
    }
    let range = max - min;
    if !(range > 0.0) || !range.is_finite() {
        return Err(MetrologyError::DegenerateProfile { min, max });
    }
    Ok(values.iter().map(|&v| (v - min) / range).collect())
}

/// Normalize raw samples and optionally invert them.
pub(crate) fn oriented_profile(values: &[f64], invert: bool) -> Result<Vec<f64>> {
    let mut profile = normalize(values)?;
    if invert {
        for v in &mut profile {
            *v = 1.0 - *v;
        }
    }
    Ok(profile)
}

/// Normalized profile of a single image row.
pub fn row_profile<I>(image: &I, row: usize, invert: bool) -> Result<Vec<f64>>
where
    I: ImageView,
    I::Pixel: Into<f64>,
{
    if row >= image.height() {
        return Err(MetrologyError::RowOutOfBounds {
            row,
            height: image.height(),
        });
    }
    oriented_profile(&image.row_values(row, 0..image.width()), invert)
}

/// Elementwise mean of the inverted row profiles over `rows` (end exclusive).
pub fn mean_profile<I>(image: &I, rows: Range<usize>) -> Result<Vec<f64>>
where
    I: ImageView,
    I::Pixel: Into<f64>,
{
    mean_profile_oriented(image, rows, true)
}

/// Like [`mean_profile`] with an explicit polarity.
///
/// Each row is normalized on its own before averaging, so a brightness drift
/// between rows does not bias the mean.
pub fn mean_profile_oriented<I>(image: &I, rows: Range<usize>, invert: bool) -> Result<Vec<f64>>
where
    I: ImageView,
    I::Pixel: Into<f64>,
{
    if rows.start >= rows.end {
        return Err(MetrologyError::EmptyRange {
            start: rows.start,
            end: rows.end,
        });
    }
    if rows.end > image.height() {
        return Err(MetrologyError::RowOutOfBounds {
            row: rows.end - 1,
            height: image.height(),
        });
    }

    let count = rows.len() as f64;
    let mut mean = vec![0.0; image.width()];
    for row in rows {
        let profile = row_profile(image, row, invert)?;
        for (acc, v) in mean.iter_mut().zip(profile) {
            *acc += v;
        }
    }
    for acc in &mut mean {
        *acc /= count;
    }
    Ok(mean)
}

/// Forward difference of `profile * scale_factor`; length is `len - 1`.
pub fn derivative(profile: &[f64], scale_factor: f64) -> Vec<f64> {
    profile
        .windows(2)
        .map(|w| w[1] * scale_factor - w[0] * scale_factor)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageU8;
    use approx::assert_abs_diff_eq;

    fn stripes(w: usize, h: usize) -> Vec<u8> {
        let mut buf = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                buf[y * w + x] = if (x / 4) % 2 == 0 { 200 } else { 40 + y as u8 };
            }
        }
        buf
    }

    #[test]
    fn constant_row_is_degenerate() {
        let buf = vec![128u8; 16 * 3];
        let img = ImageU8::new(16, 3, &buf);
        for invert in [true, false] {
            let err = row_profile(&img, 1, invert).unwrap_err();
            assert_eq!(
                err,
                MetrologyError::DegenerateProfile {
                    min: 128.0,
                    max: 128.0
                }
            );
        }
    }

    #[test]
    fn inverted_profile_is_the_complement() {
        let buf = stripes(24, 5);
        let img = ImageU8::new(24, 5, &buf);
        for row in 0..5 {
            let inv = row_profile(&img, row, true).unwrap();
            let raw = row_profile(&img, row, false).unwrap();
            assert_eq!(inv.len(), 24);
            for (a, b) in inv.iter().zip(&raw) {
                assert_abs_diff_eq!(a + b, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn normalized_profile_spans_unit_interval() {
        let p = normalize(&[3.0, 5.0, 4.0, 7.0]).unwrap();
        assert_eq!(p, vec![0.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn mean_profile_averages_normalized_rows() {
        let buf = stripes(16, 6);
        let img = ImageU8::new(16, 6, &buf);
        let mean = mean_profile(&img, 1..4).unwrap();
        assert_eq!(mean.len(), 16);
        // Every row normalizes to the same 0/1 pattern, inverted.
        assert_abs_diff_eq!(mean[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mean[5], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn mean_profile_rejects_bad_ranges() {
        let buf = stripes(16, 6);
        let img = ImageU8::new(16, 6, &buf);
        assert_eq!(
            mean_profile(&img, 3..3).unwrap_err(),
            MetrologyError::EmptyRange { start: 3, end: 3 }
        );
        assert!(matches!(
            mean_profile(&img, 2..9).unwrap_err(),
            MetrologyError::RowOutOfBounds { .. }
        ));
    }

    #[test]
    fn derivative_is_one_shorter() {
        for len in 1..12 {
            let profile: Vec<f64> = (0..len).map(|i| (i * i) as f64).collect();
            assert_eq!(derivative(&profile, 5.0).len(), len - 1);
        }
        assert!(derivative(&[], 5.0).is_empty());
    }

    #[test]
    fn derivative_applies_scale_factor() {
        let d = derivative(&[0.0, 0.2, 0.2, 1.0], 5.0);
        assert_abs_diff_eq!(d[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[2], 4.0, epsilon = 1e-12);
    }
}
