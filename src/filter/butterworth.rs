use super::iir::filtfilt;
use crate::error::{MetrologyError, Result};
use nalgebra::Complex;
use std::f64::consts::PI;

/// Digital Butterworth low-pass in transfer-function form.
///
/// Design: analog prototype poles on the unit circle, frequency pre-warping
/// with `fs = 2`, low-pass scaling to the warped cutoff, then the bilinear
/// transform. All `order` zeros land at `z = -1`. `a[0] == 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Butterworth {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

impl Butterworth {
    pub fn lowpass(order: usize, cutoff: f64) -> Result<Self> {
        if order == 0 {
            return Err(MetrologyError::InvalidFilter(
                "order must be at least 1".to_string(),
            ));
        }
        if !(cutoff > 0.0 && cutoff < 1.0) {
            return Err(MetrologyError::InvalidFilter(format!(
                "cutoff {cutoff} outside (0, 1)"
            )));
        }

        const FS: f64 = 2.0;
        let warped = 2.0 * FS * (PI * cutoff / FS).tan();
        let n = order as f64;

        // Analog prototype, scaled to the warped cutoff.
        let analog_poles: Vec<Complex<f64>> = (0..order)
            .map(|k| {
                let m = -(order as f64) + 1.0 + 2.0 * k as f64;
                let theta = PI * m / (2.0 * n);
                -Complex::new(0.0, theta).exp() * warped
            })
            .collect();
        let analog_gain = warped.powi(order as i32);

        // Bilinear transform.
        let fs2 = 2.0 * FS;
        let mut denom = Complex::new(1.0, 0.0);
        let digital_poles: Vec<Complex<f64>> = analog_poles
            .iter()
            .map(|&p| {
                denom *= Complex::new(fs2, 0.0) - p;
                (Complex::new(fs2, 0.0) + p) / (Complex::new(fs2, 0.0) - p)
            })
            .collect();
        let gain = analog_gain * (Complex::new(1.0, 0.0) / denom).re;

        let b = binomial_row(order).into_iter().map(|c| c * gain).collect();
        let a = poly_from_roots(&digital_poles);
        Ok(Self { b, a })
    }

    /// Samples of odd extension added on each side by [`Butterworth::filtfilt`].
    pub fn padlen(&self) -> usize {
        3 * self.a.len().max(self.b.len())
    }

    pub fn filtfilt(&self, data: &[f64]) -> Result<Vec<f64>> {
        filtfilt(&self.b, &self.a, data)
    }
}

/// Coefficients of `(z + 1)^n`, highest power first.
fn binomial_row(n: usize) -> Vec<f64> {
    let mut row = vec![1.0f64];
    for _ in 0..n {
        let mut next = vec![1.0f64; row.len() + 1];
        for i in 1..row.len() {
            next[i] = row[i - 1] + row[i];
        }
        row = next;
    }
    row
}

/// Real polynomial coefficients (highest power first) with the given roots.
/// Roots come in conjugate pairs, so imaginary parts cancel.
fn poly_from_roots(roots: &[Complex<f64>]) -> Vec<f64> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &r in roots {
        let mut next = vec![Complex::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        coeffs = next;
    }
    coeffs.into_iter().map(|c| c.re).collect()
}
