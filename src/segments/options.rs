use serde::{Deserialize, Serialize};

/// Thresholds of the LSD-like extractor, in pixels of the processed image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LsdOptions {
    /// Minimum Sobel magnitude for seed and region pixels (`[0, 1]` input).
    pub magnitude_threshold: f32,
    /// Orientation tolerance around the seed orientation in degrees.
    pub angle_tolerance_deg: f32,
    /// Minimum accepted segment length.
    pub min_length_px: f32,
    /// Minimum number of pixels in a grown region.
    pub min_region_px: usize,
    /// Minimum share of region pixels within half the angle tolerance.
    pub min_aligned_fraction: f32,
}

impl Default for LsdOptions {
    fn default() -> Self {
        Self {
            magnitude_threshold: 0.5,
            angle_tolerance_deg: 22.5,
            min_length_px: 20.0,
            min_region_px: 12,
            min_aligned_fraction: 0.6,
        }
    }
}
