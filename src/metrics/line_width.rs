use super::stats::std_dev;
use crate::error::{MetrologyError, Result};
use crate::filter::SmoothingParams;
use crate::image::ImageView;
use crate::profile::oriented_profile;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Width and spread of one line, in micrometers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMeasurement {
    /// Leading edge, index into the derivative profile.
    pub leading: usize,
    /// Trailing edge, index into the derivative profile.
    pub trailing: usize,
    pub width_um: f64,
    pub std_dev_um: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineWidthParams {
    /// Columns added on both sides of a line for the spread estimate.
    pub margin: usize,
    /// Polarity of the per-row profiles; must match the mean profile.
    pub invert: bool,
    /// Smoothing of each row profile inside the window.
    pub row_smoothing: SmoothingParams,
}

impl Default for LineWidthParams {
    fn default() -> Self {
        Self {
            margin: 10,
            invert: true,
            row_smoothing: SmoothingParams::new(1, 0.1),
        }
    }
}

/// Width and spread of every line.
///
/// Edges are paired index-wise, so `leading` and `trailing` must have the
/// same length and every trailing edge must lie after its leading edge. The
/// window `[leading - margin, trailing + margin)` must fit inside both the
/// image and `mean_profile`.
///
/// For each image row the window is normalized (and inverted per
/// `params.invert`), smoothed, and compared with the mean profile:
/// `d = sqrt(Σ max(mean - smoothed², 0)) * scale`. The spread of a line is the
/// standard deviation of `d` over all rows. Cost is
/// O(lines × rows × window); lines run in parallel.
pub fn line_widths<I>(
    image: &I,
    mean_profile: &[f64],
    leading: &[usize],
    trailing: &[usize],
    scale: f64,
    params: &LineWidthParams,
) -> Result<Vec<LineMeasurement>>
where
    I: ImageView + Sync,
    I::Pixel: Into<f64>,
{
    if leading.len() != trailing.len() {
        return Err(MetrologyError::EdgeCountMismatch {
            leading: leading.len(),
            trailing: trailing.len(),
        });
    }

    let limit = image.width().min(mean_profile.len());
    let windows = leading
        .iter()
        .zip(trailing)
        .enumerate()
        .map(|(index, (&lead, &trail))| {
            if trail <= lead {
                return Err(MetrologyError::MisorderedEdges {
                    index,
                    leading: lead,
                    trailing: trail,
                });
            }
            let start = lead as i64 - params.margin as i64;
            let end = (trail + params.margin) as i64;
            if start < 0 || end > limit as i64 {
                return Err(MetrologyError::WindowBounds { start, end, limit });
            }
            Ok((lead, trail, lead - params.margin, trail + params.margin))
        })
        .collect::<Result<Vec<_>>>()?;

    let lines = windows
        .par_iter()
        .map(|&(lead, trail, start, end)| {
            let spread = row_deviations(image, &mean_profile[start..end], start, end, scale, params)?;
            Ok(LineMeasurement {
                leading: lead,
                trailing: trail,
                width_um: (trail - lead) as f64 * scale,
                std_dev_um: std_dev(&spread),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "line_widths: {} lines over {} rows, margin={}",
        lines.len(),
        image.height(),
        params.margin
    );
    Ok(lines)
}

/// Measurement of line `index` alone.
pub fn single_line_width<I>(
    image: &I,
    mean_profile: &[f64],
    leading: &[usize],
    trailing: &[usize],
    scale: f64,
    params: &LineWidthParams,
    index: usize,
) -> Result<LineMeasurement>
where
    I: ImageView + Sync,
    I::Pixel: Into<f64>,
{
    let lines = line_widths(image, mean_profile, leading, trailing, scale, params)?;
    let count = lines.len();
    lines
        .into_iter()
        .nth(index)
        .ok_or(MetrologyError::LineIndex { index, count })
}

fn row_deviations<I>(
    image: &I,
    mean_slice: &[f64],
    start: usize,
    end: usize,
    scale: f64,
    params: &LineWidthParams,
) -> Result<Vec<f64>>
where
    I: ImageView,
    I::Pixel: Into<f64>,
{
    (0..image.height())
        .map(|row| {
            let profile = oriented_profile(&image.row_values(row, start..end), params.invert)?;
            let smoothed = params.row_smoothing.apply(&profile)?;
            let sum: f64 = mean_slice
                .iter()
                .zip(&smoothed)
                .map(|(m, s)| (m - s * s).max(0.0))
                .sum();
            Ok(sum.sqrt() * scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageU8;
    use crate::profile::{derivative, mean_profile};
    use approx::assert_abs_diff_eq;

    /// Bright background with one dark line covering columns `[x0, x1)`.
    fn single_line(w: usize, h: usize, x0: usize, x1: usize) -> Vec<u8> {
        let mut buf = vec![210u8; w * h];
        for y in 0..h {
            for x in x0..x1 {
                buf[y * w + x] = 35;
            }
        }
        buf
    }

    #[test]
    fn width_of_a_single_line() {
        let buf = single_line(64, 24, 20, 35);
        let img = ImageU8::new(64, 24, &buf);
        let mean = mean_profile(&img, 0..20).unwrap();
        let d = derivative(&mean, 5.0);
        assert_eq!(d[19], 5.0);
        assert_eq!(d[34], -5.0);

        let scale = 0.05;
        let lines =
            line_widths(&img, &mean, &[19], &[34], scale, &LineWidthParams::default()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_abs_diff_eq!(lines[0].width_um, 15.0 * scale, epsilon = 1e-12);
        // Identical rows: no spread.
        assert_abs_diff_eq!(lines[0].std_dev_um, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn removed_edge_is_a_mismatch() {
        let buf = single_line(64, 8, 20, 35);
        let img = ImageU8::new(64, 8, &buf);
        let mean = mean_profile(&img, 0..8).unwrap();
        let err = line_widths(&img, &mean, &[19], &[], 0.1, &LineWidthParams::default())
            .unwrap_err();
        assert_eq!(
            err,
            MetrologyError::EdgeCountMismatch {
                leading: 1,
                trailing: 0
            }
        );
    }

    #[test]
    fn window_must_fit_image() {
        let buf = single_line(64, 8, 5, 20);
        let img = ImageU8::new(64, 8, &buf);
        let mean = mean_profile(&img, 0..8).unwrap();
        let err = line_widths(&img, &mean, &[4], &[19], 0.1, &LineWidthParams::default())
            .unwrap_err();
        assert_eq!(
            err,
            MetrologyError::WindowBounds {
                start: -6,
                end: 29,
                limit: 64
            }
        );
    }

    #[test]
    fn trailing_before_leading_is_rejected() {
        let buf = single_line(64, 8, 20, 35);
        let img = ImageU8::new(64, 8, &buf);
        let mean = mean_profile(&img, 0..8).unwrap();
        let err = line_widths(&img, &mean, &[34], &[19], 0.1, &LineWidthParams::default())
            .unwrap_err();
        assert!(matches!(err, MetrologyError::MisorderedEdges { index: 0, .. }));
    }

    #[test]
    fn noisy_rows_have_spread() {
        let (w, h) = (64, 16);
        let mut buf = single_line(w, h, 20, 35);
        // Shift the line's right border by one pixel on odd rows.
        for y in (1..h).step_by(2) {
            buf[y * w + 35] = 35;
        }
        let img = ImageU8::new(w, h, &buf);
        let mean = mean_profile(&img, 0..h).unwrap();
        let lines =
            line_widths(&img, &mean, &[19], &[34], 1.0, &LineWidthParams::default()).unwrap();
        assert!(lines[0].std_dev_um > 0.0);
    }

    #[test]
    fn single_line_lookup() {
        let (w, h) = (96, 8);
        let mut buf = single_line(w, h, 20, 35);
        for y in 0..h {
            for x in 55..70 {
                buf[y * w + x] = 35;
            }
        }
        let img = ImageU8::new(w, h, &buf);
        let mean = mean_profile(&img, 0..h).unwrap();
        let params = LineWidthParams::default();
        let second = single_line_width(&img, &mean, &[19, 54], &[34, 69], 2.0, &params, 1).unwrap();
        assert_eq!((second.leading, second.trailing), (54, 69));
        assert_abs_diff_eq!(second.width_um, 30.0);
        assert_eq!(
            single_line_width(&img, &mean, &[19, 54], &[34, 69], 2.0, &params, 2).unwrap_err(),
            MetrologyError::LineIndex { index: 2, count: 2 }
        );
    }
}
