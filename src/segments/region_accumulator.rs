use nalgebra::Matrix2;

/// Pixels of a grown region with their running first and second moments.
///
/// Moments are summed in `f64`; scale-bar regions span a thousand pixels and
/// `f32` sums of `x²` lose the centroid offset.
pub(crate) struct RegionAccumulator {
    pub indices: Vec<usize>,
    sum: [f64; 2],
    sum_sq: [f64; 3],
    aligned: usize,
    sum_mag: f64,
}

impl RegionAccumulator {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            sum: [0.0; 2],
            sum_sq: [0.0; 3],
            aligned: 0,
            sum_mag: 0.0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.indices.clear();
        self.sum = [0.0; 2];
        self.sum_sq = [0.0; 3];
        self.aligned = 0;
        self.sum_mag = 0.0;
    }

    pub(crate) fn push(&mut self, idx: usize, x: usize, y: usize, mag: f32, aligned: bool) {
        let (x, y) = (x as f64, y as f64);
        self.indices.push(idx);
        self.sum[0] += x;
        self.sum[1] += y;
        self.sum_sq[0] += x * x;
        self.sum_sq[1] += x * y;
        self.sum_sq[2] += y * y;
        self.aligned += usize::from(aligned);
        self.sum_mag += f64::from(mag);
    }

    pub(crate) fn len(&self) -> usize {
        self.indices.len()
    }

    pub(crate) fn aligned_fraction(&self) -> f32 {
        match self.len() {
            0 => 0.0,
            n => self.aligned as f32 / n as f32,
        }
    }

    pub(crate) fn avg_mag(&self) -> f32 {
        match self.len() {
            0 => 0.0,
            n => (self.sum_mag / n as f64) as f32,
        }
    }

    pub(crate) fn centroid(&self) -> [f32; 2] {
        let n = self.len().max(1) as f64;
        [(self.sum[0] / n) as f32, (self.sum[1] / n) as f32]
    }

    /// Population covariance of the pixel coordinates.
    pub(crate) fn covariance(&self) -> Matrix2<f32> {
        let n = self.len().max(1) as f64;
        let (cx, cy) = (self.sum[0] / n, self.sum[1] / n);
        let cxx = self.sum_sq[0] / n - cx * cx;
        let cxy = self.sum_sq[1] / n - cx * cy;
        let cyy = self.sum_sq[2] / n - cy * cy;
        Matrix2::new(cxx as f32, cxy as f32, cxy as f32, cyy as f32)
    }

    /// Return the region's pixels to the pool of unvisited seeds.
    pub(crate) fn release(&self, used: &mut [bool]) {
        for &idx in &self.indices {
            used[idx] = false;
        }
    }
}
