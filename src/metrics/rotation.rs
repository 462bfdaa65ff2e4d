//! Experimental rotation estimate.
//!
//! Compares the translation measured on row 10 with the one measured on the
//! last row: `angle_i = |atan2(top_i - bottom_i, height * scale)| / 2` in
//! degrees. Only differences in gap asymmetry between the two rows enter the
//! formula, so a pattern that is sheared uniformly reads as zero rotation.
//!
//! Both rows are profiled with the same polarity as the mean profile, so the
//! edges compared here are the ones the translation estimate uses.
use super::stats::{mean, std_dev};
use super::translation::{translation, TranslationParams};
use crate::error::Result;
use crate::image::ImageView;
use crate::profile::mean_profile_oriented;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// First row of the top band.
const TOP_ROW: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationEstimate {
    pub angle_deg: f64,
    pub std_dev_deg: f64,
    /// Number of translation pairs compared.
    pub samples: usize,
}

/// Rotation estimate of the line pattern in `image`.
///
/// `invert` selects the row polarity, `true` for dark lines on a bright
/// background.
pub fn rotation<I>(
    image: &I,
    scale: f64,
    invert: bool,
    params: &TranslationParams,
) -> Result<RotationEstimate>
where
    I: ImageView,
    I::Pixel: Into<f64>,
{
    let height = image.height();
    let top_row = mean_profile_oriented(image, TOP_ROW..TOP_ROW + 1, invert)?;
    let bottom_row = mean_profile_oriented(image, height.saturating_sub(1)..height, invert)?;
    let top = translation(&top_row, scale, params)?;
    let bottom = translation(&bottom_row, scale, params)?;

    let samples = top.translations_um.len().min(bottom.translations_um.len());
    if top.translations_um.len() != bottom.translations_um.len() {
        warn!(
            "rotation: {} top vs {} bottom translations, comparing the first {samples}",
            top.translations_um.len(),
            bottom.translations_um.len()
        );
    }

    let baseline = height as f64 * scale;
    let angles: Vec<f64> = top
        .translations_um
        .iter()
        .zip(&bottom.translations_um)
        .map(|(t, b)| (t - b).atan2(baseline).to_degrees().abs() / 2.0)
        .collect();

    let estimate = RotationEstimate {
        angle_deg: mean(&angles),
        std_dev_deg: std_dev(&angles),
        samples,
    };
    debug!(
        "rotation: {:.4} +/- {:.4} deg over {} pairs",
        estimate.angle_deg, estimate.std_dev_deg, estimate.samples
    );
    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageU8;
    use approx::assert_abs_diff_eq;

    const DARK: u8 = 30;
    const BRIGHT: u8 = 220;

    /// Lines `(start, width)` drawn with `line` over `background`; rows below
    /// `split` use the `bottom` layout.
    fn two_band(
        w: usize,
        h: usize,
        split: usize,
        top: &[(usize, usize)],
        bottom: &[(usize, usize)],
        line: u8,
        background: u8,
    ) -> Vec<u8> {
        let mut buf = vec![background; w * h];
        for y in 0..h {
            let layout = if y < split { top } else { bottom };
            for &(start, width) in layout {
                for x in start..start + width {
                    buf[y * w + x] = line;
                }
            }
        }
        buf
    }

    /// Eight lines starting at 60; `widths[i]` and gaps alternating `gap_a` / `gap_b`.
    fn layout(widths: [usize; 8], gap_a: usize, gap_b: usize) -> Vec<(usize, usize)> {
        let mut x = 60;
        widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let line = (x, width);
                x += width + if i % 2 == 0 { gap_a } else { gap_b };
                line
            })
            .collect()
    }

    fn shifted(lines: &[(usize, usize)], by: usize) -> Vec<(usize, usize)> {
        lines.iter().map(|&(s, w)| (s + by, w)).collect()
    }

    #[test]
    fn straight_pattern_reads_zero() {
        let (w, h) = (420, 24);
        let lines = layout([14; 8], 14, 20);
        let buf = two_band(w, h, h, &lines, &lines, DARK, BRIGHT);
        let img = ImageU8::new(w, h, &buf);
        let r = rotation(&img, 0.1, true, &TranslationParams::default()).unwrap();
        assert_eq!(r.samples, 3);
        assert_abs_diff_eq!(r.angle_deg, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.std_dev_deg, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn uniform_shift_is_not_detected() {
        let (w, h) = (440, 24);
        let lines = layout([14; 8], 14, 20);
        let buf = two_band(w, h, 12, &lines, &shifted(&lines, 11), DARK, BRIGHT);
        let img = ImageU8::new(w, h, &buf);
        let r = rotation(&img, 0.1, true, &TranslationParams::default()).unwrap();
        assert_eq!(r.samples, 3);
        assert_abs_diff_eq!(r.angle_deg, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn gap_change_gives_literal_angle() {
        // Translation is 3 px on row 10 and 5 px on the last row.
        let (w, h, scale) = (480, 40, 0.1);
        let buf = two_band(
            w,
            h,
            20,
            &layout([14; 8], 14, 20),
            &layout([14; 8], 14, 24),
            DARK,
            BRIGHT,
        );
        let img = ImageU8::new(w, h, &buf);
        let params = TranslationParams::default();

        let top = translation(
            &mean_profile_oriented(&img, TOP_ROW..TOP_ROW + 1, true).unwrap(),
            scale,
            &params,
        )
        .unwrap();
        let bottom = translation(
            &mean_profile_oriented(&img, h - 1..h, true).unwrap(),
            scale,
            &params,
        )
        .unwrap();
        for (t, b) in top.translations_um.iter().zip(&bottom.translations_um) {
            assert_abs_diff_eq!(*t, 3.0 * scale, epsilon = 1e-9);
            assert_abs_diff_eq!(*b, 5.0 * scale, epsilon = 1e-9);
        }

        let r = rotation(&img, scale, true, &params).unwrap();
        let expected = (3.0 * scale - 5.0 * scale)
            .atan2(h as f64 * scale)
            .to_degrees()
            .abs()
            / 2.0;
        assert_eq!(r.samples, 3);
        assert_abs_diff_eq!(r.angle_deg, expected, epsilon = 1e-9);
        assert_abs_diff_eq!(r.std_dev_deg, 0.0, epsilon = 1e-9);
        // atan(0.2 / 4) / 2 in degrees.
        assert_abs_diff_eq!(r.angle_deg, 1.431_202_6, epsilon = 1e-6);
    }

    #[test]
    fn bright_lines_use_their_own_polarity() {
        // Lines 2 and 6 are 4 px wider in the bottom half; later lines move
        // along so every gap is unchanged.
        let (w, h, scale) = (640, 40, 0.1);
        let top = layout([14; 8], 14, 20);
        let mut widths = [14; 8];
        widths[2] = 18;
        widths[6] = 18;
        let bottom = layout(widths, 14, 20);
        let buf = two_band(w, h, 20, &top, &bottom, BRIGHT, DARK);
        let img = ImageU8::new(w, h, &buf);
        let params = TranslationParams::default();

        let r = rotation(&img, scale, false, &params).unwrap();
        assert_eq!(r.samples, 3);
        assert_abs_diff_eq!(r.angle_deg, 0.0, epsilon = 1e-9);

        // Read with the wrong polarity the line widths leak into the estimate.
        let swapped = rotation(&img, scale, true, &params).unwrap();
        assert!(swapped.angle_deg > 1.0, "{swapped:?}");
    }

    #[test]
    fn short_image_has_no_top_band() {
        let buf = vec![0u8; 40 * 8];
        let img = ImageU8::new(40, 8, &buf);
        assert!(rotation(&img, 1.0, true, &TranslationParams::default()).is_err());
    }
}
