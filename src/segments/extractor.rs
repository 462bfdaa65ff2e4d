use super::options::LsdOptions;
use super::region_accumulator::RegionAccumulator;
use super::segment::Segment;
use crate::angle::{angular_difference, normalize_half_pi};
use crate::edges::{sobel_gradients, Grad};
use crate::image::ImageF32;
use nalgebra::SymmetricEigen;

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub(super) struct LsdExtractor {
    grad: Grad,
    width: usize,
    height: usize,
    options: LsdOptions,
    angle_tol: f32,
    used: Vec<bool>,
    angle_cache: Vec<f32>,
    stack: Vec<usize>,
    region: RegionAccumulator,
    segments: Vec<Segment>,
}

impl LsdExtractor {
    pub(super) fn new(l: &ImageF32, options: LsdOptions) -> Self {
        let grad = sobel_gradients(l);
        let n = l.w * l.h;
        Self {
            grad,
            width: l.w,
            height: l.h,
            options,
            angle_tol: options.angle_tolerance_deg.to_radians(),
            used: vec![false; n],
            angle_cache: vec![f32::NAN; n],
            stack: Vec::with_capacity(64),
            region: RegionAccumulator::with_capacity(256),
            segments: Vec::new(),
        }
    }

    pub(super) fn extract(mut self) -> Vec<Segment> {
        for idx in 0..(self.width * self.height) {
            self.process_seed(idx);
        }
        self.segments
    }

    fn process_seed(&mut self, idx: usize) {
        if self.used[idx] {
            return;
        }
        let x = idx % self.width;
        let y = idx / self.width;
        if self.grad.mag.get(x, y) < self.options.magnitude_threshold {
            return;
        }

        self.region.reset();
        self.stack.clear();

        let seed_angle = self.angle_at(idx);
        self.used[idx] = true;
        self.stack.push(idx);

        self.grow_region(seed_angle);

        if let Some(segment) = self.build_segment() {
            self.segments.push(segment);
        } else {
            self.region.release(&mut self.used);
        }
        self.region.reset();
    }

    fn grow_region(&mut self, seed_angle: f32) {
        let half_tol = self.angle_tol * 0.5;
        while let Some(idx) = self.stack.pop() {
            let x = idx % self.width;
            let y = idx / self.width;
            let angle = self.angle_at(idx);
            let aligned = angular_difference(angle, seed_angle) <= half_tol;
            let mag = self.grad.mag.get(x, y);
            self.region.push(idx, x, y, mag, aligned);

            for (dx, dy) in NEIGH_OFFSETS {
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0 || yn < 0 || xn >= self.width as isize || yn >= self.height as isize {
                    continue;
                }
                let (nx, ny) = (xn as usize, yn as usize);
                let neighbor_idx = ny * self.width + nx;
                if self.used[neighbor_idx] {
                    continue;
                }
                if self.grad.mag.get(nx, ny) < self.options.magnitude_threshold {
                    continue;
                }
                let neighbor_angle = self.angle_at(neighbor_idx);
                if angular_difference(neighbor_angle, seed_angle) <= self.angle_tol {
                    self.used[neighbor_idx] = true;
                    self.stack.push(neighbor_idx);
                }
            }
        }
    }

    fn build_segment(&self) -> Option<Segment> {
        if self.region.len() < self.options.min_region_px {
            return None;
        }
        if self.region.aligned_fraction() < self.options.min_aligned_fraction {
            return None;
        }

        let [cx, cy] = self.region.centroid();
        let eig = SymmetricEigen::new(self.region.covariance());
        let major = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
            0
        } else {
            1
        };
        if !eig.eigenvalues[major].is_finite() || eig.eigenvalues[major] <= 0.0 {
            return None;
        }

        let tangent = eig.eigenvectors.column(major);
        let norm = tangent.norm();
        if !norm.is_finite() || norm < 1e-6 {
            return None;
        }
        let (tx, ty) = (tangent[0] / norm, tangent[1] / norm);

        let (smin, smax) = self.region.indices.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), &idx| {
                let dx = (idx % self.width) as f32 - cx;
                let dy = (idx / self.width) as f32 - cy;
                let s = dx * tx + dy * ty;
                (lo.min(s), hi.max(s))
            },
        );
        let len = smax - smin;
        if !len.is_finite() || len < self.options.min_length_px {
            return None;
        }

        let avg_mag = self.region.avg_mag();
        Some(Segment {
            p0: [cx + smin * tx, cy + smin * ty],
            p1: [cx + smax * tx, cy + smax * ty],
            dir: [tx, ty],
            len,
            avg_mag,
            strength: len * avg_mag.max(1e-3),
        })
    }

    fn angle_at(&mut self, idx: usize) -> f32 {
        let cached = self.angle_cache[idx];
        if !cached.is_nan() {
            return cached;
        }
        let angle = normalize_half_pi(self.grad.angle(idx % self.width, idx / self.width));
        self.angle_cache[idx] = angle;
        angle
    }
}
