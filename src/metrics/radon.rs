//! Dominant pattern angle from a Radon projection sweep.
//!
//! For each angle `θ` in whole degrees over `[0, 180)` the image is projected
//! onto the axis `s = dx·cos θ + dy·sin θ` (offsets from the image centre,
//! `y` pointing down). Only pixels inside the inscribed circle contribute, so
//! every projection sees the same pixels. The projection with the highest
//! RMS is the one taken across the lines.
//!
//! The result is the tilt of the lines from vertical in degrees, in
//! `[-90, 90)`, positive when lines lean right going down the image.
use crate::error::{MetrologyError, Result};
use crate::image::ImageView;
use log::debug;
use rayon::prelude::*;

/// Number of one-degree projection angles.
const ANGLE_STEPS: usize = 180;

/// Tilt of the line pattern in `image`, to the nearest degree.
///
/// Pixel values are taken relative to their mean inside the circle, so the
/// background level does not bias the comparison between angles. A constant
/// image has no dominant direction and is rejected.
pub fn dominant_angle<I>(image: &I) -> Result<f64>
where
    I: ImageView + Sync,
    I::Pixel: Into<f64>,
{
    let (w, h) = (image.width(), image.height());
    let radius = (w.min(h) as f64 - 1.0) / 2.0;
    if radius < 1.0 {
        return Err(MetrologyError::EmptyRange {
            start: 0,
            end: w.min(h),
        });
    }
    let (cx, cy) = ((w as f64 - 1.0) / 2.0, (h as f64 - 1.0) / 2.0);

    // (dx, dy, value) of every pixel inside the circle.
    let mut samples = Vec::new();
    for y in 0..h {
        let dy = y as f64 - cy;
        for (x, v) in image.row_values(y, 0..w).into_iter().enumerate() {
            let dx = x as f64 - cx;
            if dx * dx + dy * dy <= radius * radius {
                samples.push((dx, dy, v));
            }
        }
    }
    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.2), hi.max(s.2))
        });
    if !(max > min) {
        return Err(MetrologyError::DegenerateProfile { min, max });
    }
    let level = samples.iter().map(|s| s.2).sum::<f64>() / samples.len() as f64;

    let bins = 2 * radius.ceil() as usize + 1;
    let offset = radius.ceil();
    let rms: Vec<f64> = (0..ANGLE_STEPS)
        .into_par_iter()
        .map(|step| {
            let (sin, cos) = (step as f64).to_radians().sin_cos();
            let mut projection = vec![0.0; bins];
            for &(dx, dy, v) in &samples {
                let bin = (dx * cos + dy * sin + offset).round() as usize;
                projection[bin.min(bins - 1)] += v - level;
            }
            (projection.iter().map(|p| p * p).sum::<f64>() / bins as f64).sqrt()
        })
        .collect();

    let best = rms
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map_or(0, |(i, _)| i);
    let normal_deg = if best > 90 {
        best as f64 - 180.0
    } else {
        best as f64
    };
    let tilt = -normal_deg;
    debug!(
        "dominant_angle: projection at {best} deg, rms {:.3}, tilt {tilt} deg",
        rms[best]
    );
    Ok(tilt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageU8;

    /// Dark stripes of width 6 every 16 px, leaning `tilt_deg` to the right going down.
    fn tilted_stripes(size: usize, tilt_deg: f64) -> Vec<u8> {
        let t = tilt_deg.to_radians().tan();
        let mut buf = vec![210u8; size * size];
        for y in 0..size {
            for x in 0..size {
                let u = (x as f64 - y as f64 * t).rem_euclid(16.0);
                if u < 6.0 {
                    buf[y * size + x] = 30;
                }
            }
        }
        buf
    }

    #[test]
    fn vertical_lines_read_zero() {
        let buf = tilted_stripes(101, 0.0);
        let img = ImageU8::new(101, 101, &buf);
        assert_eq!(dominant_angle(&img).unwrap(), 0.0);
    }

    #[test]
    fn tilt_sign_follows_the_lines() {
        for tilt in [10.0, -10.0, 25.0] {
            let buf = tilted_stripes(121, tilt);
            let img = ImageU8::new(121, 121, &buf);
            let angle = dominant_angle(&img).unwrap();
            assert!((angle - tilt).abs() <= 1.0, "tilt {tilt}: got {angle}");
        }
    }

    #[test]
    fn constant_image_has_no_direction() {
        let buf = vec![128u8; 32 * 32];
        let img = ImageU8::new(32, 32, &buf);
        assert!(matches!(
            dominant_angle(&img),
            Err(MetrologyError::DegenerateProfile { .. })
        ));
    }
}
