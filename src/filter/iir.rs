use crate::error::{MetrologyError, Result};
use nalgebra::{DMatrix, DVector};

/// Filter `x` with the IIR transfer function `b / a` (direct form II
/// transposed). Coefficients are normalized by `a[0]`.
///
/// Returns the output and the final filter state. `zi`, when given, must hold
/// `max(len(a), len(b)) - 1` values.
pub fn lfilter(b: &[f64], a: &[f64], x: &[f64], zi: Option<&[f64]>) -> (Vec<f64>, Vec<f64>) {
    let n = a.len().max(b.len());
    let a0 = a[0];
    let mut bn = vec![0.0; n];
    let mut an = vec![0.0; n];
    for (dst, &v) in bn.iter_mut().zip(b) {
        *dst = v / a0;
    }
    for (dst, &v) in an.iter_mut().zip(a) {
        *dst = v / a0;
    }

    let mut z = match zi {
        Some(state) => {
            debug_assert_eq!(state.len(), n - 1, "zi must hold n-1 values");
            state.to_vec()
        }
        None => vec![0.0; n - 1],
    };

    let mut y = Vec::with_capacity(x.len());
    for &xi in x {
        let yi = if n > 1 { bn[0] * xi + z[0] } else { bn[0] * xi };
        for k in 0..n.saturating_sub(1) {
            let carry = if k + 1 < n - 1 { z[k + 1] } else { 0.0 };
            z[k] = bn[k + 1] * xi + carry - an[k + 1] * yi;
        }
        y.push(yi);
    }
    (y, z)
}

/// Steady-state initial conditions of [`lfilter`] for a unit step input.
///
/// Solves `(I - Aᵀ) zi = b[1..] - a[1..] * b[0]`, where `A` is the companion
/// matrix of `a`.
pub fn lfilter_zi(b: &[f64], a: &[f64]) -> Result<Vec<f64>> {
    let n = a.len().max(b.len());
    if n < 2 {
        return Ok(Vec::new());
    }
    let a0 = a[0];
    let coef = |c: &[f64], i: usize| c.get(i).copied().unwrap_or(0.0) / a0;

    let m = n - 1;
    let mut lhs = DMatrix::<f64>::identity(m, m);
    for i in 0..m {
        lhs[(i, 0)] += coef(a, i + 1);
        if i + 1 < m {
            lhs[(i, i + 1)] -= 1.0;
        }
    }
    let b0 = coef(b, 0);
    let rhs = DVector::from_iterator(m, (1..n).map(|i| coef(b, i) - coef(a, i) * b0));

    lhs.lu()
        .solve(&rhs)
        .map(|zi| zi.iter().copied().collect())
        .ok_or_else(|| MetrologyError::InvalidFilter("singular steady-state system".to_string()))
}

/// Forward-backward filtering with odd extension at both ends.
///
/// The output has zero phase and the length of `x`. Requires
/// `x.len() > 3 * max(len(a), len(b))`.
pub fn filtfilt(b: &[f64], a: &[f64], x: &[f64]) -> Result<Vec<f64>> {
    let padlen = 3 * a.len().max(b.len());
    if x.len() <= padlen {
        return Err(MetrologyError::SignalTooShort {
            len: x.len(),
            min: padlen,
        });
    }

    let ext = odd_extension(x, padlen);
    let zi = lfilter_zi(b, a)?;

    let scaled = |v: f64| zi.iter().map(|z| z * v).collect::<Vec<f64>>();

    let (forward, _) = lfilter(b, a, &ext, Some(&scaled(ext[0])));
    let mut reversed: Vec<f64> = forward.into_iter().rev().collect();
    let (backward, _) = lfilter(b, a, &reversed, Some(&scaled(reversed[0])));
    reversed = backward.into_iter().rev().collect();

    Ok(reversed[padlen..reversed.len() - padlen].to_vec())
}

/// `x` with `pad` samples point-reflected about each end sample.
fn odd_extension(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];
    let mut ext = Vec::with_capacity(n + 2 * pad);
    ext.extend((1..=pad).rev().map(|i| 2.0 * first - x[i]));
    ext.extend_from_slice(x);
    ext.extend((1..=pad).map(|i| 2.0 * last - x[n - 1 - i]));
    ext
}
