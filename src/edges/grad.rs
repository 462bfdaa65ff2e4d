//! Sobel image gradients.
//!
//! Convolves the 3×3 Sobel pair with replicated borders and stores `gx`, `gy`
//! and `mag = sqrt(gx² + gy²)`. On a `[0, 1]` image an ideal step edge gives a
//! magnitude of 4 on both pixels adjacent to the step.
//!
//! Complexity: O(W·H); memory: three float buffers.
use crate::image::{ImageF32, ImageView, ImageViewMut};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per‑pixel gradient buffers.
#[derive(Clone, Debug, Default)]
pub struct Grad {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel
    pub mag: ImageF32,
}

impl Grad {
    /// Gradient direction at `(x, y)` in radians, `atan2(gy, gx)`.
    #[inline]
    pub fn angle(&self, x: usize, y: usize) -> f32 {
        self.gy.get(x, y).atan2(self.gx.get(x, y))
    }
}

/// Compute Sobel gradients on a single‑channel float image.
pub fn sobel_gradients(l: &ImageF32) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Grad { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, yy_row) in rows.iter().enumerate() {
                for (kx, &xi) in x_idx.iter().enumerate() {
                    sum_x += yy_row[xi] * SOBEL_KERNEL_X[ky][kx];
                    sum_y += yy_row[xi] * SOBEL_KERNEL_Y[ky][kx];
                }
            }

            out_gx[x] = sum_x;
            out_gy[x] = sum_y;
            out_mag[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    Grad { gx, gy, mag }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_step_has_vertical_gradient() {
        let mut img = ImageF32::new(8, 8);
        for y in 4..8 {
            for x in 0..8 {
                img.set(x, y, 1.0);
            }
        }
        let g = sobel_gradients(&img);
        assert_eq!(g.mag.get(3, 3), 4.0);
        assert_eq!(g.mag.get(3, 4), 4.0);
        assert_eq!(g.mag.get(3, 1), 0.0);
        assert_eq!(g.gx.get(3, 4), 0.0);
        assert!((g.angle(3, 4) - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
